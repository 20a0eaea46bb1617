use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::install::paths::{self, Family, Scope};

/// A native messaging host manifest as the client reads it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub description: String,
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_extensions: Option<Vec<String>>,
}

impl Manifest {
    /// Manifest for one client family: Mozilla clients get
    /// `allowed_extensions`, Chromium clients `allowed_origins`.
    pub fn for_family(
        family: Family,
        name: &str,
        description: &str,
        exe_path: &Path,
        allowed_origins: &[String],
        allowed_extensions: &[String],
    ) -> Self {
        let (origins, extensions) = match family {
            Family::Mozilla => (None, Some(allowed_extensions.to_vec())),
            Family::Chromium => (Some(allowed_origins.to_vec()), None),
        };
        Self {
            name: name.to_string(),
            description: description.to_string(),
            path: exe_path.to_path_buf(),
            kind: "stdio".to_string(),
            allowed_origins: origins,
            allowed_extensions: extensions,
        }
    }
}

fn write_manifest(path: &Path, manifest: &Manifest) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())
}

/// Install the host manifest for each listed client.
///
/// On macOS/Linux the client refuses relative executable paths, so `exe_path`
/// must be absolute there.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tbed::{install, Scope};
///
/// install(
///     "tbed",
///     "External editor for compose windows",
///     Path::new("/usr/local/bin/tbed"),
///     &[],
///     &["tbed@example.org".to_string()],
///     &["thunderbird"],
///     Scope::User,
/// )
/// .unwrap();
/// ```
pub fn install(
    name: &str,
    description: &str,
    exe_path: &Path,
    allowed_origins: &[String],
    allowed_extensions: &[String],
    clients: &[&str],
    scope: Scope,
) -> io::Result<()> {
    if cfg!(unix) && !exe_path.is_absolute() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("executable path must be absolute: {}", exe_path.display()),
        ));
    }

    for &client in clients {
        let info = paths::client_info(client)?;
        let target = paths::manifest_path(client, scope, name)?;
        let manifest = Manifest::for_family(
            info.family,
            name,
            description,
            exe_path,
            allowed_origins,
            allowed_extensions,
        );
        write_manifest(&target, &manifest)?;

        #[cfg(all(windows, feature = "windows-registry"))]
        {
            let key = paths::winreg_key_path(client, scope, name)?;
            crate::install::winreg::write_manifest_reg(scope, &key, &target)?;
        }
    }
    Ok(())
}

/// Whether the manifest is present for every listed client (all known
/// clients when `clients` is `None`, in which case any one suffices).
///
/// Clients with no location on this OS are skipped.
pub fn verify_installed(name: &str, clients: Option<&[&str]>, scope: Scope) -> io::Result<bool> {
    let all;
    let (clients, require_all) = match clients {
        Some(list) => (list, true),
        None => {
            all = paths::known_clients()?;
            (all.as_slice(), false)
        }
    };

    let mut seen = 0usize;
    let mut checked = 0usize;
    for &client in clients {
        let target = match paths::manifest_path(client, scope, name) {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };
        checked += 1;
        if is_registered(client, scope, name, &target)? {
            seen += 1;
        }
    }

    Ok(if require_all {
        checked > 0 && seen == checked
    } else {
        seen > 0
    })
}

#[cfg(all(windows, feature = "windows-registry"))]
fn is_registered(client: &str, scope: Scope, name: &str, target: &Path) -> io::Result<bool> {
    let key = paths::winreg_key_path(client, scope, name)?;
    let pointed = crate::install::winreg::read_manifest_path_from_reg(scope, &key)?;
    Ok(target.exists() && pointed.is_some_and(|p| p.exists()))
}

#[cfg(not(all(windows, feature = "windows-registry")))]
fn is_registered(_client: &str, _scope: Scope, _name: &str, target: &Path) -> io::Result<bool> {
    Ok(target.exists())
}

/// Remove the manifest for each listed client. Missing files are ignored.
pub fn remove(name: &str, clients: &[&str], scope: Scope) -> io::Result<()> {
    for &client in clients {
        let target = match paths::manifest_path(client, scope, name) {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };
        match fs::remove_file(&target) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
            _ => {}
        }

        #[cfg(all(windows, feature = "windows-registry"))]
        {
            let key = paths::winreg_key_path(client, scope, name)?;
            crate::install::winreg::remove_manifest_reg(scope, &key)?;
        }
    }
    Ok(())
}
