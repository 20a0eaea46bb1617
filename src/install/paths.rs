use once_cell::sync::Lazy;
use serde::Deserialize;
use std::{collections::BTreeMap, env, io, path::PathBuf};

static CLIENTS_TOML: &str = include_str!("clients.toml");

static CLIENTS: Lazy<Result<BTreeMap<String, ClientInfo>, String>> =
    Lazy::new(|| toml::from_str(CLIENTS_TOML).map_err(|e| e.to_string()));

/// Install for the current user or machine-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    User,
    System,
}

/// Which manifest allowlist field a client understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Mozilla,
    Chromium,
}

/// One entry of the embedded `clients.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub family: Family,
    pub linux_user: Option<String>,
    pub linux_system: Option<String>,
    pub macos_user: Option<String>,
    pub macos_system: Option<String>,
    pub windows_user: Option<String>,
    pub windows_system: Option<String>,
    pub winreg_key: Option<String>,
}

impl ClientInfo {
    fn template(&self, scope: Scope) -> Option<&str> {
        let t = if cfg!(target_os = "macos") {
            match scope {
                Scope::User => &self.macos_user,
                Scope::System => &self.macos_system,
            }
        } else if cfg!(windows) {
            match scope {
                Scope::User => &self.windows_user,
                Scope::System => &self.windows_system,
            }
        } else {
            match scope {
                Scope::User => &self.linux_user,
                Scope::System => &self.linux_system,
            }
        };
        t.as_deref()
    }
}

fn clients() -> io::Result<&'static BTreeMap<String, ClientInfo>> {
    CLIENTS
        .as_ref()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("clients.toml: {e}")))
}

/// Every client key known to the installer, sorted.
pub fn known_clients() -> io::Result<Vec<&'static str>> {
    Ok(clients()?.keys().map(String::as_str).collect())
}

pub fn client_info(client: &str) -> io::Result<&'static ClientInfo> {
    clients()?.get(client).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("unknown client {client:?}"),
        )
    })
}

fn env_dir(var: &str) -> io::Result<String> {
    env::var(var).map_err(|_| {
        io::Error::new(io::ErrorKind::NotFound, format!("{var} is not set"))
    })
}

fn expand(template: &str, name: &str) -> io::Result<String> {
    let mut out = template.replace("{name}", name);
    for (placeholder, var) in [
        ("{home}", "HOME"),
        ("{appdata}", "APPDATA"),
        ("{localappdata}", "LOCALAPPDATA"),
        ("{programdata}", "PROGRAMDATA"),
    ] {
        if out.contains(placeholder) {
            out = out.replace(placeholder, &env_dir(var)?);
        }
    }
    Ok(out)
}

/// Where `client` expects the manifest for host `name` in `scope`.
///
/// Fails with `NotFound` when the client has no location for this OS/scope.
pub fn manifest_path(client: &str, scope: Scope, name: &str) -> io::Result<PathBuf> {
    let info = client_info(client)?;
    let template = info.template(scope).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{client} has no {scope:?} manifest location on this OS"),
        )
    })?;
    expand(template, name).map(PathBuf::from)
}

/// Registry key pointing at the manifest, Windows only.
///
/// The same key path is used under HKCU and HKLM; `_scope` picks the hive at
/// write time.
pub fn winreg_key_path(client: &str, _scope: Scope, name: &str) -> io::Result<String> {
    let info = client_info(client)?;
    let key = info.winreg_key.as_deref().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{client} has no registry key template"),
        )
    })?;
    Ok(key.replace("{name}", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let keys = known_clients().unwrap();
        assert!(keys.contains(&"thunderbird"));
        assert!(keys.contains(&"firefox"));
        assert_eq!(client_info("thunderbird").unwrap().family, Family::Mozilla);
        assert_eq!(client_info("chrome").unwrap().family, Family::Chromium);
    }

    #[test]
    fn unknown_client_is_not_found() {
        let err = manifest_path("netscape", Scope::User, "tbed").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn registry_key_names_the_host() {
        let key = winreg_key_path("thunderbird", Scope::User, "tbed").unwrap();
        assert_eq!(key, r"Software\Mozilla\NativeMessagingHosts\tbed");
    }
}
