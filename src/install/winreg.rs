use crate::install::paths::Scope;
use std::{io, path::Path, path::PathBuf};
use winreg::{
    enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE},
    RegKey,
};

fn hive(scope: Scope) -> RegKey {
    match scope {
        Scope::User => RegKey::predef(HKEY_CURRENT_USER),
        Scope::System => RegKey::predef(HKEY_LOCAL_MACHINE),
    }
}

/// Point the registry key's default value at the manifest file.
pub fn write_manifest_reg(scope: Scope, key_path: &str, manifest: &Path) -> io::Result<()> {
    let (key, _) = hive(scope).create_subkey(key_path)?;
    key.set_value("", &manifest.to_string_lossy().as_ref())?;
    Ok(())
}

/// Remove the key; a missing key is not an error.
pub fn remove_manifest_reg(scope: Scope, key_path: &str) -> io::Result<()> {
    match hive(scope).delete_subkey(key_path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Manifest path stored under `key_path`, if the key exists.
pub fn read_manifest_path_from_reg(scope: Scope, key_path: &str) -> io::Result<Option<PathBuf>> {
    match hive(scope).open_subkey(key_path) {
        Ok(key) => {
            let value: String = key.get_value("")?;
            Ok(Some(PathBuf::from(value)))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
