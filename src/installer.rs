// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Downloading and installing kubectl versions
//!
//! Installing resolves the requested range against the remote versions, downloads
//! the binary into its version directory unless it is already there, and then
//! activates it.

use std::fs;
use std::path::{Path, PathBuf};

use attohttpc::header::USER_AGENT;
use semver::Version;
use tracing::{debug, info};

use crate::KUBY_USER_AGENT;
use crate::activate::{Activated, activate};
use crate::cache::get_remote_versions;
use crate::error::{Error, IoContext, Result};
use crate::prompt::Prompt;
use crate::registry::{binary_path, ensure_install_root, is_installed, version_dir};
use crate::settings::Settings;
use crate::version::{VersionRange, max_satisfying};

#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Download again even if the version is already installed
    pub force: bool,
    /// Ask before downloading
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The version is installed and active
    Installed {
        activated: Activated,
        /// `false` when an existing installation was reused
        downloaded: bool,
    },
    /// The user declined the download, nothing was changed
    Declined { version: Version },
}

/// Install the highest remote version satisfying `range` and activate it
///
/// # Errors
/// Returns [`Error::NotAvailableRemotely`] if no remote version matches, or any
/// network, filesystem or prompt error
pub fn install(
    settings: &Settings,
    range: &VersionRange,
    options: InstallOptions,
    prompt: &dyn Prompt,
) -> Result<InstallOutcome> {
    ensure_install_root(settings)?;

    let versions = get_remote_versions(settings)?;
    let version = max_satisfying(&versions, range)
        .ok_or_else(|| Error::NotAvailableRemotely(range.to_string()))?;

    if range.to_string() != version.to_string() {
        debug!("Resolved {range} to {version}");
    }

    let downloaded = if is_installed(settings, &version) && !options.force {
        info!("Version v{version} is already installed");
        false
    } else {
        if options.interactive
            && !options.force
            && !prompt.confirm(&format!("Found version v{version}. Proceed with install?"), true)?
        {
            info!("Aborting");
            return Ok(InstallOutcome::Declined { version });
        }
        download(settings, &version)?;
        true
    };

    let activated = activate(settings, &VersionRange::exact(&version))?;
    Ok(InstallOutcome::Installed {
        activated,
        downloaded,
    })
}

/// Download a version's binary into a fresh version directory
///
/// Any previous content of the directory is discarded. If the download fails the
/// directory is removed again so a partial download is never taken for an
/// installed version.
///
/// # Errors
/// Returns error if the request fails, the server answers with a non-success
/// status, or the binary cannot be written
pub fn download(settings: &Settings, version: &Version) -> Result<PathBuf> {
    let dir = version_dir(settings, version);
    empty_dir(&dir)?;

    let url = settings
        .platform
        .build_download_url(&settings.download_base_url, &version.to_string());
    let destination = binary_path(settings, version);

    info!("Downloading v{version}");
    if let Err(e) = fetch_binary(&url, &destination) {
        let _ = fs::remove_dir_all(&dir);
        return Err(e);
    }

    set_executable(&destination)?;
    info!("Downloaded v{version}");
    Ok(destination)
}

fn fetch_binary(url: &str, destination: &Path) -> Result<()> {
    debug!("Downloading from: {url}");
    let response = attohttpc::get(url)
        .header(USER_AGENT, KUBY_USER_AGENT)
        .send()?;

    if !response.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let mut file = fs::File::create(destination).at(destination)?;
    let written = response.write_to(&mut file)?;
    debug!("Wrote {written} bytes to {}", destination.display());
    Ok(())
}

/// Remove a directory's content, creating it if missing
fn empty_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).at(dir)?;
    }
    fs::create_dir_all(dir).at(dir)?;
    Ok(())
}

/// Set executable permissions on a file
#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).at(path)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
