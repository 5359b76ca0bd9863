// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Paths and endpoints used by the kubectl management commands
//!
//! Every location the operations touch is carried by [`Settings`]; the binary
//! fills it from flags and environment variables.

use std::path::{Path, PathBuf};

use chrono::Duration;

use crate::error::{Error, Result};
use crate::platform::{KUBECTL_DOWNLOAD_BASE, Platform};

/// Base directory for kuby data relative to the user's home directory
pub const KUBY_HOME_DIR: &str = ".kube/k8s-helpers";

/// Directory below the base directory holding installed kubectl versions
pub const KUBECTL_DIR: &str = "kubectl";

/// File name of the remote version cache inside [`KUBECTL_DIR`]
pub const VERSIONS_FILE: &str = "versions";

/// Well-known location of the active kubectl
pub const KUBECTL_LINK: &str = "/usr/local/bin/kubectl";

/// First page of the Kubernetes releases listing
pub const KUBERNETES_RELEASES_URL: &str =
    "https://api.github.com/repos/kubernetes/kubernetes/releases?per_page=100";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Base directory, `~/.kube/k8s-helpers` by default
    pub base_dir: PathBuf,
    /// Activation symlink path
    pub link_path: PathBuf,
    /// First page of the paginated releases API
    pub releases_url: String,
    /// Base URL binaries are downloaded from
    pub download_base_url: String,
    /// Maximum age of the remote version cache, `None` never expires it
    pub cache_ttl: Option<Duration>,
    /// Platform binaries are downloaded for
    pub platform: Platform,
}

impl Settings {
    /// Settings rooted at `base_dir` with every other value at its default
    ///
    /// A relative `base_dir` is resolved against the current directory, as the
    /// activation link must point at an absolute target.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            base_dir: std::path::absolute(&base_dir).unwrap_or(base_dir),
            link_path: PathBuf::from(KUBECTL_LINK),
            releases_url: KUBERNETES_RELEASES_URL.to_string(),
            download_base_url: KUBECTL_DOWNLOAD_BASE.to_string(),
            cache_ttl: None,
            platform: Platform::detect(),
        }
    }

    /// Default base directory below the user's home directory
    ///
    /// # Errors
    /// Returns [`Error::NoHomeDirectory`] if the home directory cannot be determined
    pub fn default_base_dir() -> Result<PathBuf> {
        home::home_dir()
            .map(|home| home.join(KUBY_HOME_DIR))
            .ok_or(Error::NoHomeDirectory)
    }

    #[must_use]
    pub fn with_link_path(mut self, link_path: impl Into<PathBuf>) -> Self {
        self.link_path = link_path.into();
        self
    }

    #[must_use]
    pub fn with_releases_url(mut self, url: impl Into<String>) -> Self {
        self.releases_url = url.into();
        self
    }

    #[must_use]
    pub fn with_download_base_url(mut self, url: impl Into<String>) -> Self {
        self.download_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Root directory of installed versions, `<base>/kubectl`
    pub fn install_root(&self) -> PathBuf {
        self.base_dir.join(KUBECTL_DIR)
    }

    /// Path of the remote version cache, `<base>/kubectl/versions`
    pub fn versions_file(&self) -> PathBuf {
        self.install_root().join(VERSIONS_FILE)
    }

    pub fn link_path(&self) -> &Path {
        &self.link_path
    }
}
