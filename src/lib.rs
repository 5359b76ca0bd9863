// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! kuby kubectl management library
//!
//! This library resolves, downloads, activates and removes kubectl versions. Remote
//! versions come from the Kubernetes GitHub releases and are cached locally;
//! installed versions live in one directory per version and the active one is
//! selected through a single symlink.

pub mod activate;
pub mod cache;
pub mod error;
pub mod installer;
pub mod kubectl;
pub mod platform;
pub mod prompt;
pub mod registry;
pub mod remove;
pub mod settings;
pub mod version;

// Re-export commonly used items at the crate root for convenience
pub use activate::{Activated, Activation, activate, active_version};
pub use cache::{get_remote_versions, refresh};
pub use error::{Error, Result};
pub use installer::{InstallOptions, InstallOutcome, install};
pub use platform::Platform;
pub use registry::local_versions;
pub use remove::{RemoveOutcome, remove};
pub use settings::Settings;
pub use version::{VersionRange, clean, max_satisfying};

/// User agent sent with every HTTP request
pub const KUBY_USER_AGENT: &str = concat!("kuby/", env!("CARGO_PKG_VERSION"));
