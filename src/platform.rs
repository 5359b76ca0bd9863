// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Platform detection and URL building for kubectl binaries
//!
//! Kubernetes publishes one kubectl binary per version, OS and architecture. Only
//! the amd64 builds are used; the OS is taken from the running host.

/// Base URL of the Kubernetes release bucket holding kubectl binaries
pub const KUBECTL_DOWNLOAD_BASE: &str = "https://storage.googleapis.com/kubernetes-release/release";

/// Architecture segment used in download URLs
pub const KUBECTL_ARCH: &str = "amd64";

/// Represents a target platform for kubectl binaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// OS segment used by the release bucket ("linux", "darwin", "windows")
    pub os: &'static str,
    /// File name of the binary inside a version directory
    pub binary_name: &'static str,
}

impl Platform {
    pub const LINUX: Platform = Platform {
        os: "linux",
        binary_name: "kubectl",
    };

    pub const DARWIN: Platform = Platform {
        os: "darwin",
        binary_name: "kubectl",
    };

    pub const WINDOWS: Platform = Platform {
        os: "windows",
        binary_name: "kubectl.exe",
    };

    /// Detect the platform of the running host
    ///
    /// Anything that is neither macOS nor Windows is treated as linux.
    pub fn detect() -> Platform {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a platform
    pub fn from_os(os: &str) -> Platform {
        match os {
            "macos" => Self::DARWIN,
            "windows" => Self::WINDOWS,
            _ => Self::LINUX,
        }
    }

    /// Build the download URL for a specific version on this platform
    ///
    /// # Arguments
    /// * `base` - Release bucket base URL, normally [`KUBECTL_DOWNLOAD_BASE`]
    /// * `version` - Version without the leading `v` (e.g. "1.12.1")
    pub fn build_download_url(&self, base: &str, version: &str) -> String {
        format!(
            "{}/v{}/bin/{}/{}/{}",
            base.trim_end_matches('/'),
            version,
            self.os,
            KUBECTL_ARCH,
            self.binary_name
        )
    }
}
