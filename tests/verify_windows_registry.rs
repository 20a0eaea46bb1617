#![cfg(all(windows, feature = "install", feature = "windows-registry"))]

mod common;

use serial_test::serial;
use std::path::PathBuf;
use tbed::install::manifest::{install, remove, verify_installed};
use tbed::install::{paths, winreg};
use tbed::Scope;

#[test]
#[serial]
fn verify_is_registry_aware_on_windows() {
    let (_td, _env) = common::sandbox_env();

    let host = "tbed_winregverify";
    let exe = PathBuf::from(r"C:\Windows\System32\cmd.exe");
    let clients = &["thunderbird", "chrome"];

    install(
        host,
        "test host",
        &exe,
        &["chrome-extension://test/".to_string()],
        &["tbed@example.org".to_string()],
        clients,
        Scope::User,
    )
    .unwrap();

    assert!(verify_installed(host, Some(clients), Scope::User).unwrap());

    let key_path = paths::winreg_key_path("thunderbird", Scope::User, host).unwrap();
    let p = winreg::read_manifest_path_from_reg(Scope::User, &key_path)
        .unwrap()
        .expect("registry key should exist");
    assert!(p.exists(), "registry should point to existing manifest: {p:?}");

    remove(host, clients, Scope::User).unwrap();
    assert!(!verify_installed(host, Some(clients), Scope::User).unwrap());
    assert!(winreg::read_manifest_path_from_reg(Scope::User, &key_path)
        .unwrap()
        .is_none());
}
