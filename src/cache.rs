// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Cache management for remote kubectl versions
//!
//! The list of Kubernetes releases is fetched page by page from the GitHub releases
//! API and stored as a JSON array of version strings. The cache is a one-shot memo:
//! once written it is used as-is until `refresh` overwrites it, unless a maximum
//! age is configured.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use attohttpc::header::{ACCEPT, LINK, USER_AGENT};
use chrono::{DateTime, Utc};
use semver::Version;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Error, IoContext, Result};
use crate::settings::Settings;
use crate::version::clean;
use crate::KUBY_USER_AGENT;

/// One entry of the releases listing, only the tag is of interest
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Load the cached remote versions if the cache exists
///
/// Entries that are not valid versions are skipped. A cache that is not a JSON
/// array of strings is deleted and treated as missing, as is a cache older than
/// the configured TTL.
///
/// # Errors
/// Returns error if the cache file exists but cannot be read
pub fn load_cached_versions(settings: &Settings) -> Result<Option<Vec<Version>>> {
    let cache_file = settings.versions_file();

    if !cache_file.exists() {
        return Ok(None);
    }

    if let Some(ttl) = settings.cache_ttl
        && let Some(updated) = cache_timestamp(&cache_file)?
        && Utc::now().signed_duration_since(updated) > ttl
    {
        debug!(
            "Version cache expired (last updated: {})",
            format_cache_age(&updated)
        );
        return Ok(None);
    }

    let content = fs::read_to_string(&cache_file).at(&cache_file)?;
    match serde_json::from_str::<Vec<String>>(&content) {
        Ok(tags) => Ok(Some(tags.iter().filter_map(|tag| clean(tag)).collect())),
        Err(e) => {
            warn!("Ignoring corrupted version cache {}: {e}", cache_file.display());
            let _ = fs::remove_file(&cache_file);
            Ok(None)
        }
    }
}

/// Save versions to the cache, replacing whatever was stored before
///
/// # Errors
/// Returns error if the cache file cannot be written
pub fn save_cached_versions(settings: &Settings, versions: &[Version]) -> Result<()> {
    let cache_file = settings.versions_file();
    if let Some(parent) = cache_file.parent() {
        fs::create_dir_all(parent).at(parent)?;
    }

    let tags: Vec<String> = versions.iter().map(Version::to_string).collect();
    let content = serde_json::to_string_pretty(&tags)?;
    fs::write(&cache_file, content).at(&cache_file)?;
    Ok(())
}

/// Extract the `rel="next"` target from an HTTP `Link` header
///
/// # Examples
/// ```
/// use kuby::cache::next_page_link;
///
/// let header = r#"<https://api.github.com/x?page=2>; rel="next", <https://api.github.com/x?page=9>; rel="last""#;
/// assert_eq!(next_page_link(header), Some("https://api.github.com/x?page=2".to_string()));
/// assert_eq!(next_page_link(r#"<https://api.github.com/x?page=1>; rel="prev""#), None);
/// assert_eq!(next_page_link(""), None);
/// ```
pub fn next_page_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if is_next {
            target
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .map(String::from)
        } else {
            None
        }
    })
}

/// Fetch every release tag from the paginated releases API
///
/// Pages are followed through the `Link` header until no `next` page is announced
/// or the announced page was already fetched.
/// Tags are returned in the order received, with invalid versions dropped.
///
/// # Errors
/// Returns error if a request fails, a page has a non-success status, or a body
/// is not a JSON array of releases
pub fn fetch_remote_versions(url: &str) -> Result<Vec<Version>> {
    let mut versions = Vec::new();
    let mut visited = HashSet::new();
    let mut next_url = Some(url.to_string());

    while let Some(page_url) = next_url {
        if !visited.insert(page_url.clone()) {
            warn!("Releases page {page_url} was already fetched, stopping");
            break;
        }
        debug!("Downloading from: {page_url}");
        let response = attohttpc::get(&page_url)
            .header(USER_AGENT, KUBY_USER_AGENT)
            .header(ACCEPT, "application/vnd.github+json")
            .send()?;

        if !response.is_success() {
            return Err(Error::HttpStatus {
                url: page_url,
                status: response.status().as_u16(),
            });
        }

        next_url = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_link);

        let releases: Vec<Release> = serde_json::from_str(&response.text()?)?;
        versions.extend(releases.iter().filter_map(|release| clean(&release.tag_name)));
    }

    Ok(versions)
}

/// Fetch all versions from the releases API and overwrite the cache
///
/// # Errors
/// Returns error if the API request fails or the cache cannot be written
pub fn refresh(settings: &Settings) -> Result<Vec<Version>> {
    let versions = fetch_remote_versions(&settings.releases_url)?;
    save_cached_versions(settings, &versions)?;
    info!("Cached {} versions", versions.len());
    Ok(versions)
}

/// Get the remote versions, from the cache when possible
///
/// Only contacts the API when there is no usable cache.
///
/// # Errors
/// Returns error if the cache cannot be read or the API request fails
pub fn get_remote_versions(settings: &Settings) -> Result<Vec<Version>> {
    if let Some(versions) = load_cached_versions(settings)? {
        if let Some(updated) = cache_timestamp(&settings.versions_file())? {
            debug!(
                "Using cached versions (last updated: {})",
                format_cache_age(&updated)
            );
        }
        return Ok(versions);
    }

    info!("No version cache found, fetching versions from the releases API...");
    refresh(settings)
}

/// When a cache file was last written, based on its modification time
///
/// # Returns
/// `None` if the file does not exist or its modification time is unavailable
///
/// # Errors
/// Returns error if the file metadata cannot be read
pub fn cache_timestamp(path: &Path) -> Result<Option<DateTime<Utc>>> {
    if !path.exists() {
        return Ok(None);
    }
    let metadata = fs::metadata(path).at(path)?;
    Ok(metadata.modified().ok().map(DateTime::<Utc>::from))
}

/// Format cache age in human-readable format
///
/// # Returns
/// Human-readable age (e.g. "2h ago" or "30m ago")
#[must_use]
pub fn format_cache_age(timestamp: &DateTime<Utc>) -> String {
    let age = Utc::now().signed_duration_since(*timestamp);

    if age.num_hours() > 0 {
        format!("{}h ago", age.num_hours())
    } else if age.num_minutes() > 0 {
        format!("{}m ago", age.num_minutes())
    } else {
        format!("{}s ago", age.num_seconds().max(0))
    }
}
