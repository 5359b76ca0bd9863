// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Locally installed kubectl versions
//!
//! Every installed version lives in its own `v<version>` directory below the
//! install root. The directory existing is what makes a version installed.

use std::fs;
use std::path::PathBuf;

use semver::Version;

use crate::error::{IoContext, Result};
use crate::settings::Settings;
use crate::version::{clean, sort_descending};

/// Get the install root, creating it if it doesn't exist
///
/// # Errors
/// Returns error if the directory cannot be created
pub fn ensure_install_root(settings: &Settings) -> Result<PathBuf> {
    let root = settings.install_root();
    fs::create_dir_all(&root).at(&root)?;
    Ok(root)
}

/// List all locally installed kubectl versions
///
/// Only directories named `v<version>` count. Files next to them (such as the
/// version cache), symlinks and directories with any other name are ignored.
///
/// # Returns
/// Installed versions sorted newest first
///
/// # Errors
/// Returns error if the install root cannot be created or read
pub fn local_versions(settings: &Settings) -> Result<Vec<Version>> {
    let root = ensure_install_root(settings)?;
    let mut versions = vec![];

    for entry in fs::read_dir(&root).at(&root)? {
        let entry = entry.at(&root)?;
        if !entry.file_type().at(&entry.path())?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        // Only `v<version>` exactly, the name version_dir builds
        if let Some(version) = name.strip_prefix('v').and_then(clean)
            && name == format!("v{version}")
        {
            versions.push(version);
        }
    }

    sort_descending(&mut versions);

    Ok(versions)
}

/// Directory of one installed version, `<root>/v<version>`
pub fn version_dir(settings: &Settings, version: &Version) -> PathBuf {
    settings.install_root().join(format!("v{version}"))
}

/// Path of the kubectl binary inside a version directory
pub fn binary_path(settings: &Settings, version: &Version) -> PathBuf {
    version_dir(settings, version).join(settings.platform.binary_name)
}

pub fn is_installed(settings: &Settings, version: &Version) -> bool {
    version_dir(settings, version).is_dir()
}
