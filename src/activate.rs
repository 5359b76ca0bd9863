// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Activation of an installed kubectl version
//!
//! The active version is whatever the activation symlink points at. Nothing else
//! records it, so switching versions is a matter of replacing that one link.

use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use tracing::debug;

use crate::error::{Error, IoContext, Result};
use crate::registry::{binary_path, ensure_install_root, local_versions};
use crate::settings::Settings;
use crate::version::{VersionRange, clean, max_satisfying};

/// Outcome of pointing the activation link at a binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The link now points at `target`
    Linked { link: PathBuf, target: PathBuf },
    /// Symlinks are not supported on this platform, nothing was changed
    Unsupported,
}

/// A version selected by [`activate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activated {
    pub version: Version,
    pub activation: Activation,
}

/// Resolve `range` against the installed versions and make the match active
///
/// # Errors
/// Returns [`Error::NotInstalledLocally`] if no installed version satisfies the
/// range, or an I/O error if the link cannot be replaced
pub fn activate(settings: &Settings, range: &VersionRange) -> Result<Activated> {
    ensure_install_root(settings)?;
    let versions = local_versions(settings)?;
    let version = max_satisfying(&versions, range)
        .ok_or_else(|| Error::NotInstalledLocally(range.to_string()))?;

    debug!("Redirect the symlink to v{version}");
    let activation = set_active(settings.link_path(), &binary_path(settings, &version))?;

    Ok(Activated {
        version,
        activation,
    })
}

/// Point `link` at `target`, replacing any previous link
///
/// # Errors
/// Returns error if the old link cannot be removed or the new one created
#[cfg(unix)]
pub fn set_active(link: &Path, target: &Path) -> Result<Activation> {
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent).at(parent)?;
    }
    remove_if_exists(link)?;
    std::os::unix::fs::symlink(target, link).at(link)?;

    Ok(Activation::Linked {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
    })
}

/// Symlinks need elevated rights on Windows, so activation is not attempted
///
/// # Errors
/// Never fails on this platform
#[cfg(not(unix))]
pub fn set_active(_link: &Path, _target: &Path) -> Result<Activation> {
    Ok(Activation::Unsupported)
}

/// Remove a file or symlink if it exists
///
/// # Returns
/// `true` if something was removed
///
/// # Errors
/// Returns error if the path exists but cannot be removed
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    // is_symlink also catches broken links, for which exists() is false
    if path.exists() || path.is_symlink() {
        fs::remove_file(path).at(path)?;
        return Ok(true);
    }
    Ok(false)
}

/// Version the activation link currently points at
///
/// # Returns
/// `None` if there is no link or it does not point into a version directory
pub fn active_version(settings: &Settings) -> Option<Version> {
    let target = fs::read_link(settings.link_path()).ok()?;
    let version_dir = target.parent()?;
    if version_dir.parent()? != settings.install_root() {
        return None;
    }
    version_dir.file_name()?.to_str().and_then(clean)
}

/// First `kubectl` on `PATH` when it is not the activation link
///
/// # Returns
/// `Some(path)` if running `kubectl` would not use the activated version
pub fn shadowing_kubectl(link: &Path) -> Option<PathBuf> {
    let found = which::which("kubectl").ok()?;
    let same = match (found.canonicalize(), link.canonicalize()) {
        (Ok(found), Ok(link)) => found == link,
        _ => found == link,
    };
    (!same).then_some(found)
}
