#![allow(dead_code)]

use std::{collections::HashMap, env, io::Cursor};
use tbed::{encode_frame, ByteOrder, Connection, HostConfig, Protocol};
use tempfile::TempDir;

/// Env guard that restores previous env vars on drop.
pub struct EnvGuard {
    old: HashMap<String, Option<String>>,
}

impl EnvGuard {
    pub fn set(vars: &[(&str, String)]) -> Self {
        let mut old = HashMap::new();
        for (k, v) in vars {
            old.insert((*k).to_string(), env::var(k).ok());
            env::set_var(k, v);
        }
        Self { old }
    }

    pub fn unset(vars: &[&str]) -> Self {
        let mut old = HashMap::new();
        for k in vars {
            old.insert((*k).to_string(), env::var(k).ok());
            env::remove_var(k);
        }
        Self { old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (k, prev) in self.old.drain() {
            match prev {
                Some(v) => env::set_var(k, v),
                None => env::remove_var(k),
            }
        }
    }
}

/// Temp sandbox with HOME/APPDATA/... pointing inside it, so manifest
/// installs never touch the real profile.
pub fn sandbox_env() -> (TempDir, EnvGuard) {
    let td = TempDir::new().expect("tempdir");
    let root = td.path().to_path_buf();

    let home = root.join("home");
    let appdata = root.join("appdata_roaming");
    let localappdata = root.join("appdata_local");
    let programdata = root.join("programdata");

    for dir in [&home, &appdata, &localappdata, &programdata] {
        std::fs::create_dir_all(dir).unwrap();
    }

    let guard = EnvGuard::set(&[
        ("HOME", home.to_string_lossy().to_string()),
        ("APPDATA", appdata.to_string_lossy().to_string()),
        ("LOCALAPPDATA", localappdata.to_string_lossy().to_string()),
        ("PROGRAMDATA", programdata.to_string_lossy().to_string()),
    ]);

    (td, guard)
}

pub fn config() -> HostConfig {
    HostConfig::new(ByteOrder::detect().expect("byte order"))
}

/// Wire bytes for a sequence of plain strings, one frame each.
pub fn wire(frames: &[&str]) -> Vec<u8> {
    let order = config().byte_order;
    let mut out = Vec::new();
    for text in frames {
        let json = serde_json::to_string(text).unwrap();
        out.extend(encode_frame(&json, order, usize::MAX).unwrap());
    }
    out
}

/// Split wire bytes back into decoded frame strings.
pub fn frames(mut bytes: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    while !bytes.is_empty() {
        let len = u32::from_ne_bytes(bytes[..4].try_into().unwrap()) as usize;
        let body = &bytes[4..4 + len];
        out.push(serde_json::from_slice(body).unwrap());
        bytes = &bytes[4 + len..];
    }
    out
}

pub type MemProtocol = Protocol<Cursor<Vec<u8>>, Vec<u8>>;

pub fn protocol(input: Vec<u8>, config: &HostConfig) -> MemProtocol {
    Protocol::new(Connection::new(Cursor::new(input), Vec::new(), config), config)
}

/// Everything written to the protocol's output so far.
pub fn written(protocol: MemProtocol) -> Vec<u8> {
    protocol.into_connection().into_inner().1
}
