// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Version parsing and range resolution for kubectl releases
//!
//! Release tags and directory names are normalized into `semver::Version` values.
//! Requested versions are parsed into a [`VersionRange`], which accepts the loose
//! range syntax people type on the command line (`1.8`, `v1.12.1`, `>= 1.10 < 1.12`,
//! `1.2 - 1.4`, `1.x || 2`) and maps it onto `semver::VersionReq`.

use std::fmt;

use semver::{Comparator, Op, Version, VersionReq};

use crate::error::{Error, Result};

/// Normalize a release tag or directory name into a version
///
/// Surrounding whitespace, a leading `=` and a leading `v` are removed. Anything
/// that is not a valid semantic version afterwards is rejected.
///
/// # Examples
/// ```
/// use kuby::version::clean;
/// assert_eq!(clean("v1.12.1").map(|v| v.to_string()), Some("1.12.1".to_string()));
/// assert_eq!(clean(" =v1.20.0-rc.1 ").map(|v| v.to_string()), Some("1.20.0-rc.1".to_string()));
/// assert!(clean("miepmiep").is_none());
/// assert!(clean("v1.12").is_none());
/// ```
pub fn clean(tag: &str) -> Option<Version> {
    let trimmed = tag.trim().trim_start_matches('=').trim_start();
    let trimmed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

/// Sort versions newest first
pub fn sort_descending(versions: &mut [Version]) {
    versions.sort_by(|a, b| b.cmp(a));
}

/// Find the highest version satisfying a range
///
/// # Returns
/// `Some(version)` for the maximum matching candidate, `None` if the candidate list is
/// empty or nothing matches
///
/// # Examples
/// ```
/// use kuby::version::{clean, max_satisfying, VersionRange};
///
/// let candidates: Vec<_> = ["1.10.0", "1.12.0", "1.13.0"].iter().filter_map(|v| clean(v)).collect();
/// let range = VersionRange::parse("1").unwrap();
/// assert_eq!(max_satisfying(&candidates, &range), clean("1.13.0"));
/// ```
pub fn max_satisfying(candidates: &[Version], range: &VersionRange) -> Option<Version> {
    candidates.iter().filter(|v| range.matches(v)).max().cloned()
}

/// A requested version expression, possibly a union of alternatives
#[derive(Debug, Clone)]
pub struct VersionRange {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    /// Parse a range expression
    ///
    /// Bare versions are matched the way a person expects: a full version matches
    /// exactly, a partial one (`1.8`) matches every patch release of it. An empty
    /// expression matches everything.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRange`] when an alternative cannot be parsed
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim().to_string();
        let alternatives = raw
            .split("||")
            .map(|alternative| {
                VersionReq::parse(&normalize_alternative(alternative)).map_err(|source| {
                    Error::InvalidRange {
                        range: raw.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { raw, alternatives })
    }

    /// A range matching exactly one version
    #[must_use]
    pub fn exact(version: &Version) -> Self {
        let comparator = Comparator {
            op: Op::Exact,
            major: version.major,
            minor: Some(version.minor),
            patch: Some(version.patch),
            pre: version.pre.clone(),
        };
        Self {
            raw: version.to_string(),
            alternatives: vec![VersionReq {
                comparators: vec![comparator],
            }],
        }
    }

    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn is_operator(token: &str) -> bool {
    matches!(token, "=" | ">" | ">=" | "<" | "<=" | "~" | "^")
}

/// Rewrite one `||` alternative into comma separated `VersionReq` syntax
fn normalize_alternative(alternative: &str) -> String {
    let tokens: Vec<&str> = alternative
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return "*".to_string();
    }

    let mut comparators = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];

        // Hyphen range: "1.2 - 1.4"
        if tokens.get(i + 1) == Some(&"-") && i + 2 < tokens.len() {
            comparators.push(format!(">={}", strip_v(token)));
            comparators.push(format!("<={}", strip_v(tokens[i + 2])));
            i += 3;
            continue;
        }

        // Operator separated from its version: ">= 1.10"
        if is_operator(token) && i + 1 < tokens.len() {
            comparators.push(normalize_comparator(&format!("{token}{}", tokens[i + 1])));
            i += 2;
            continue;
        }

        comparators.push(normalize_comparator(token));
        i += 1;
    }

    comparators.join(", ")
}

fn strip_v(version: &str) -> &str {
    version.strip_prefix(['v', 'V']).unwrap_or(version)
}

fn normalize_comparator(token: &str) -> String {
    let op_len = token
        .find(|c: char| !matches!(c, '=' | '>' | '<' | '~' | '^'))
        .unwrap_or(token.len());
    let (op, version) = token.split_at(op_len);
    let version = strip_v(version)
        .split('.')
        .map(|part| if matches!(part, "x" | "X") { "*" } else { part })
        .collect::<Vec<_>>()
        .join(".");

    if op.is_empty() {
        // A bare partial version is an X-range, a bare full version is exact
        if version.contains('*') {
            version
        } else {
            format!("={version}")
        }
    } else if let Some(pos) = version.find('*') {
        // ">=1.x" means ">=1"
        let prefix = version[..pos].trim_end_matches('.');
        if prefix.is_empty() {
            "*".to_string()
        } else {
            format!("{op}{prefix}")
        }
    } else {
        format!("{op}{version}")
    }
}
