//! Team member cards built from a static roster.

use crate::config::ConfigError;
use figment::{
    Figment,
    providers::{Format, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const WEBSITE_BADGE: &str = "https://img.shields.io/badge/goto_website-white?style=flat-square&color=white";

/// One team member as declared in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    /// Portrait or logo image.
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// GitHub user name.
    #[serde(default)]
    pub github: Option<String>,
}

impl Member {
    pub fn new(name: &str, bio: &str, logo: &str, website: &str, github: &str) -> Self {
        Self {
            name: name.to_string(),
            bio: Some(bio.to_string()),
            logo: Some(logo.to_string()),
            website: Some(website.to_string()),
            github: Some(github.to_string()),
        }
    }
}

/// An image link: where it points and the badge it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeLink {
    pub href: String,
    pub badge: String,
}

/// Display model of a member card, in the order it is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberCard {
    pub logo: Option<String>,
    pub heading: String,
    pub description: Option<String>,
    pub website: Option<BadgeLink>,
    pub github: Option<BadgeLink>,
}

impl From<&Member> for MemberCard {
    fn from(member: &Member) -> Self {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        MemberCard {
            logo: non_empty(&member.logo),
            heading: member.name.clone(),
            description: non_empty(&member.bio),
            website: non_empty(&member.website).map(|href| BadgeLink { href, badge: WEBSITE_BADGE.to_string() }),
            github: non_empty(&member.github).map(|user| BadgeLink {
                href: format!("https://github.com/{user}"),
                badge: format!(
                    "https://img.shields.io/github/stars/{user}?logo=github&logoColor=black&style=flat-square&labelColor=white&color=white"
                ),
            }),
        }
    }
}

/// The built-in roster.
pub fn default_roster() -> Vec<Member> {
    vec![
        Member::new("duzo", "hi", "https://duzo.is-a.dev/img/self.jpg", "https://duzo.is-a.dev/", "duzos"),
        Member::new(
            "loqor",
            "LOQOR WRITE SOMETHING HERE PLEASE TODO",
            "https://loqor.dev/img/self.png",
            "https://loqor.dev/",
            "loqor",
        ),
        Member::new(
            "theo",
            "theo theo theo",
            "https://theo.is-a.dev/assets/portrait.png",
            "https://theo.is-a.dev/",
            "DrTheodor",
        ),
        Member::new(
            "maketendo",
            "i tried to put the perfectest face",
            "img/team/maketendo.png",
            "https://modrinth.com/user/Maketendo",
            "MaketendoDev",
        ),
    ]
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    member: Vec<Member>,
}

fn extract_roster(figment: Figment) -> Result<Vec<Member>, ConfigError> {
    let roster: RosterFile = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
    if let Some(unnamed) = roster.member.iter().position(|m| m.name.trim().is_empty()) {
        return Err(ConfigError::Invalid { field: format!("member[{unnamed}].name"), reason: "must not be empty".into() });
    }
    Ok(roster.member)
}

/// Parse a roster from TOML text made of `[[member]]` tables.
pub fn parse_roster(toml: &str) -> Result<Vec<Member>, ConfigError> {
    extract_roster(Figment::from(Toml::string(toml)))
}

/// Load a roster from a TOML file made of `[[member]]` tables.
pub fn load_roster(path: &Path) -> Result<Vec<Member>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::LoadFailed(format!("roster file not found: {}", path.display())));
    }
    extract_roster(Figment::from(Toml::file(path)))
}

/// Cards for every member, in roster order.
pub fn cards(roster: &[Member]) -> Vec<MemberCard> {
    roster.iter().map(MemberCard::from).collect()
}
