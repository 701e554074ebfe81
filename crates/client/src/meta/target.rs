//! Display targets and slug resolution.

use serde::{Deserialize, Serialize};

/// One place on a page that shows a project's metadata.
///
/// The slug comes from the explicit `slug` when present, otherwise from the
/// last path segment of `link`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl Target {
    pub fn from_slug(slug: impl Into<String>) -> Self {
        Self { slug: Some(slug.into()), link: None }
    }

    pub fn from_link(link: impl Into<String>) -> Self {
        Self { slug: None, link: Some(link.into()) }
    }

    /// Interpret a command-line argument: anything with a path separator is a link.
    pub fn parse(arg: &str) -> Self {
        if arg.contains('/') { Self::from_link(arg) } else { Self::from_slug(arg) }
    }

    /// The slug to look up, if one can be determined.
    pub fn resolve_slug(&self) -> Option<String> {
        if let Some(slug) = self.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return Some(slug.to_string());
        }
        self.link.as_deref().and_then(slug_from_link)
    }

    /// Short name for logs and terminal output.
    pub fn label(&self) -> String {
        self.resolve_slug()
            .or_else(|| self.link.clone())
            .unwrap_or_else(|| "<unnamed>".to_string())
    }
}

/// Last non-empty path segment of `link`.
///
/// Links without a scheme are read as `https://`. Returns `None` for
/// unparsable links and links with an empty path.
pub fn slug_from_link(link: &str) -> Option<String> {
    let trimmed = link.trim();
    if trimmed.is_empty() {
        return None;
    }

    let with_scheme = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };
    let url = url::Url::parse(&with_scheme).ok()?;

    url.path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_slug_wins() {
        let target = Target { slug: Some("  ait ".into()), link: Some("https://modrinth.com/mod/other".into()) };
        assert_eq!(target.resolve_slug().as_deref(), Some("ait"));
    }

    #[test]
    fn test_slug_from_link_last_segment() {
        assert_eq!(slug_from_link("https://modrinth.com/mod/sample-mod").as_deref(), Some("sample-mod"));
        assert_eq!(slug_from_link("https://modrinth.com/mod/sample-mod/").as_deref(), Some("sample-mod"));
        assert_eq!(slug_from_link("https://modrinth.com/mod/sample-mod?tab=versions#top").as_deref(), Some("sample-mod"));
        assert_eq!(slug_from_link("modrinth.com/mod/ait").as_deref(), Some("ait"));
    }

    #[test]
    fn test_unresolvable_links() {
        assert_eq!(slug_from_link("https://modrinth.com/"), None);
        assert_eq!(slug_from_link("   "), None);
        assert_eq!(slug_from_link("http://[bad"), None);
    }

    #[test]
    fn test_blank_slug_falls_back_to_link() {
        let target = Target { slug: Some("".into()), link: Some("https://modrinth.com/mod/ait".into()) };
        assert_eq!(target.resolve_slug().as_deref(), Some("ait"));
        assert_eq!(Target::default().resolve_slug(), None);
    }

    #[test]
    fn test_parse_argument() {
        assert_eq!(Target::parse("ait"), Target::from_slug("ait"));
        assert_eq!(Target::parse("https://modrinth.com/mod/ait"), Target::from_link("https://modrinth.com/mod/ait"));
    }

    #[test]
    fn test_parse_schemeless_link() {
        let target = Target::parse("modrinth.com/mod/ait");
        assert_eq!(target, Target::from_link("modrinth.com/mod/ait"));
        assert_eq!(target.resolve_slug().as_deref(), Some("ait"));
    }
}
