// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Querying the kubectl binary that is currently in use

use std::path::{Path, PathBuf};
use std::process::Command;

use semver::Version;
use serde::Deserialize;

use crate::error::{IoContext, Result};
use crate::version::clean;

/// Client version and platform reported by a kubectl binary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientVersion {
    pub version: Option<Version>,
    /// e.g. "linux/amd64"
    pub platform: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionOutput {
    client_version: ClientInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo {
    git_version: String,
    platform: Option<String>,
}

/// Locate the kubectl to query: the activation link if present, else `PATH`
pub fn locate_kubectl(link: &Path) -> Option<PathBuf> {
    if link.exists() {
        return Some(link.to_path_buf());
    }
    which::which("kubectl").ok()
}

/// Run `kubectl version --client` and parse what it reports
///
/// # Errors
/// Returns error if the binary cannot be executed
pub fn client_version(kubectl: &Path) -> Result<ClientVersion> {
    let output = Command::new(kubectl)
        .args(["version", "--client", "--output=json"])
        .output()
        .at(kubectl)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_client_version(&stdout))
}

/// Parse the output of `kubectl version --client`
///
/// Understands the JSON output as well as the plain text of both current
/// (`Client Version: v1.28.2`) and old (`GitVersion:"v1.12.1"`) releases.
///
/// # Examples
/// ```
/// use kuby::kubectl::parse_client_version;
///
/// let info = parse_client_version("Client Version: v1.28.2\nKustomize Version: v5.0.4");
/// assert_eq!(info.version.map(|v| v.to_string()), Some("1.28.2".to_string()));
/// ```
pub fn parse_client_version(output: &str) -> ClientVersion {
    if let Ok(parsed) = serde_json::from_str::<VersionOutput>(output) {
        return ClientVersion {
            version: clean(&parsed.client_version.git_version),
            platform: parsed.client_version.platform,
        };
    }

    for line in output.lines() {
        let Some(rest) = line.strip_prefix("Client Version:") else {
            continue;
        };
        if let Some(git_version) = quoted_field(rest, "GitVersion") {
            return ClientVersion {
                version: clean(git_version),
                platform: quoted_field(rest, "Platform").map(String::from),
            };
        }
        return ClientVersion {
            version: clean(rest),
            platform: None,
        };
    }

    ClientVersion::default()
}

/// Value of `name:"value"` inside a Go struct dump
fn quoted_field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let start = line.find(&format!("{name}:\""))? + name.len() + 2;
    let rest = &line[start..];
    rest.find('"').map(|end| &rest[..end])
}
