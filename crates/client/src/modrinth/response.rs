//! Modrinth API response types and normalization.

use amble_core::UNKNOWN;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Project summary from `GET /project/{slug}`.
///
/// Only the fields amble reads; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub downloads: Option<serde_json::Value>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Embedded version list, newest first.
    #[serde(default)]
    pub versions: Option<Vec<String>>,
}

impl Project {
    /// Download count, if present as a non-negative whole number.
    pub fn download_count(&self) -> Option<u64> {
        let value = self.downloads.as_ref()?;
        value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
                .map(|n| n as u64)
        })
    }

    /// First non-empty of the icon fields the API has used over time.
    pub fn icon_reference(&self) -> Option<String> {
        [&self.icon_url, &self.icon, &self.logo, &self.logo_url]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .cloned()
    }

    /// Label of the first embedded version, used when the version list
    /// endpoint is unavailable.
    pub fn embedded_version(&self) -> Option<&str> {
        self.versions
            .as_deref()?
            .first()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// One entry of `GET /project/{slug}/version`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Version {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version_number: Option<String>,
    #[serde(default)]
    pub date_published: Option<String>,
}

impl Version {
    /// `version_number`, else `name`, else `id`; empty strings are skipped.
    pub fn label(&self) -> Option<&str> {
        [&self.version_number, &self.name, &self.id]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }

    /// Publish time; accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.date_published.as_deref()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// Sort newest first. Versions without a readable date go last; ties keep
/// their original order.
pub fn sort_newest_first(versions: &mut [Version]) {
    versions.sort_by_key(|v| std::cmp::Reverse(v.published_at()));
}

/// Label of the newest version, or the unknown sentinel.
pub fn newest_label(mut versions: Vec<Version>) -> String {
    sort_newest_first(&mut versions);
    versions
        .first()
        .and_then(Version::label)
        .unwrap_or(UNKNOWN)
        .to_string()
}
