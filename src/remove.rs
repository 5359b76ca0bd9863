// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Removal of installed kubectl versions

use std::fs;

use semver::Version;
use tracing::debug;

use crate::activate::remove_if_exists;
use crate::error::{IoContext, Result};
use crate::registry::{local_versions, version_dir};
use crate::settings::Settings;
use crate::version::{VersionRange, max_satisfying};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed {
        version: Version,
        /// Whether an activation link existed and was deleted
        unlinked: bool,
    },
    /// Nothing installed satisfies the range, nothing was touched
    NotInstalled,
}

/// Delete the highest installed version satisfying `range`
///
/// The activation link is deleted along with the version, whether or not it
/// pointed at the removed version.
///
/// # Errors
/// Returns error if the version directory or the link cannot be deleted
pub fn remove(settings: &Settings, range: &VersionRange) -> Result<RemoveOutcome> {
    let versions = local_versions(settings)?;
    let Some(version) = max_satisfying(&versions, range) else {
        return Ok(RemoveOutcome::NotInstalled);
    };

    let dir = version_dir(settings, &version);
    debug!("Delete folder {}", dir.display());
    fs::remove_dir_all(&dir).at(&dir)?;

    let unlinked = if cfg!(unix) {
        debug!("Delete symlink {}", settings.link_path().display());
        remove_if_exists(settings.link_path())?
    } else {
        false
    };

    Ok(RemoveOutcome::Removed { version, unlinked })
}
