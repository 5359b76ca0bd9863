// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Error type shared by every kubectl management operation

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors reported by the version store, registry, installer, activator and remover
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "The given semver `{0}` is not available. Use another version or run `kuby kubectl refresh`."
    )]
    NotAvailableRemotely(String),

    #[error("The given semver `{0}` is not locally available. Use the install command.")]
    NotInstalledLocally(String),

    #[error("Invalid version range `{range}`: {source}")]
    InvalidRange {
        range: String,
        #[source]
        source: semver::Error,
    },

    #[error("Request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Network error: {0}")]
    Http(#[from] attohttpc::Error),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Could not determine the home directory, set KUBY_HOME")]
    NoHomeDirectory,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach a path to an `io::Error`
pub(crate) trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
