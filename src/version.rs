//! Build and package metadata reported by `GET /version` and `GET /health`.

use std::sync::OnceLock;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Commit reported when `GIT_COMMIT` is not set.
pub const UNKNOWN_COMMIT: &str = "unknown";

/// Version information for the running service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub build_date: String,
    pub rust_version: String,
    pub git_commit: String,
}

impl VersionInfo {
    /// Combine package metadata with the optional build-time overrides.
    ///
    /// `build_date` falls back to `now` and `git_commit` to `"unknown"`.
    pub fn from_parts(
        build_date: Option<String>,
        git_commit: Option<String>,
        now: chrono::DateTime<Utc>,
    ) -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: env!("CARGO_PKG_DESCRIPTION").to_string(),
            build_date: build_date
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            rust_version: env!("CARGO_PKG_RUST_VERSION").to_string(),
            git_commit: git_commit
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_COMMIT.to_string()),
        }
    }
}

/// Version information, computed on first use and cached for the process.
pub fn version_info() -> &'static VersionInfo {
    static INFO: OnceLock<VersionInfo> = OnceLock::new();
    INFO.get_or_init(|| {
        VersionInfo::from_parts(
            std::env::var("BUILD_DATE").ok(),
            std::env::var("GIT_COMMIT").ok(),
            Utc::now(),
        )
    })
}
