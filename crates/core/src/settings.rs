//! Stored user preferences: tilt, saturn mode and party mode.
//!
//! Each preference is an independent boolean flag persisted as the literal
//! string `"true"` or `"false"` under its own key. A missing key means the
//! preference's default.

use crate::Error;
use crate::store::KeyValueStore;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Stylesheet injected while saturn mode is on.
pub const SATURN_FONT_HREF: &str = "https://fonts.googleapis.com/css2?family=Comic+Relief:wght@400;700&display=swap";

/// Warning that must be acknowledged before party mode turns on.
pub const PARTY_WARNING: &str =
    "Party Mode enables flashing colors. If you have photosensitive epilepsy, do not enable it. Continue?";

/// Element a preference class is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassTarget {
    /// The document root (`<html>`).
    Root,
    /// The document body.
    Body,
}

/// One of the three stored preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Tilt,
    Saturn,
    Party,
}

impl Preference {
    pub const ALL: [Preference; 3] = [Preference::Tilt, Preference::Saturn, Preference::Party];

    /// Storage key for this flag.
    pub fn key(self) -> &'static str {
        match self {
            Preference::Tilt => "amblelabs.tiltEnabled",
            Preference::Saturn => "amblelabs.saturnMode",
            Preference::Party => "amblelabs.partyMode",
        }
    }

    pub fn default_value(self) -> bool {
        matches!(self, Preference::Tilt)
    }

    /// CSS class toggled by this preference and where it goes.
    ///
    /// Tilt is inverted: `tilt-disabled` is present while tilt is off.
    pub fn class(self) -> (&'static str, ClassTarget) {
        match self {
            Preference::Tilt => ("tilt-disabled", ClassTarget::Root),
            Preference::Saturn => ("saturn-mode", ClassTarget::Body),
            Preference::Party => ("party-mode", ClassTarget::Root),
        }
    }

    /// Whether the class is applied when the flag has value `enabled`.
    fn class_applies(self, enabled: bool) -> bool {
        match self {
            Preference::Tilt => !enabled,
            Preference::Saturn | Preference::Party => enabled,
        }
    }

    /// Whether switching to `enabled` needs the user to acknowledge [`PARTY_WARNING`].
    pub fn requires_confirmation(self, enabled: bool) -> bool {
        self == Preference::Party && enabled
    }

    /// Decode a stored flag value; anything but `"true"` is off.
    fn decode(self, stored: Option<&str>) -> bool {
        match stored {
            None => self.default_value(),
            Some(value) => value == "true",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Preference::Tilt => "tilt",
            Preference::Saturn => "saturn",
            Preference::Party => "party",
        };
        f.write_str(name)
    }
}

impl FromStr for Preference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tilt" => Ok(Preference::Tilt),
            "saturn" => Ok(Preference::Saturn),
            "party" => Ok(Preference::Party),
            other => Err(Error::UnknownPreference(other.to_string())),
        }
    }
}

/// Snapshot of all three preference flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub tilt_enabled: bool,
    pub saturn_mode: bool,
    pub party_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tilt_enabled: Preference::Tilt.default_value(),
            saturn_mode: Preference::Saturn.default_value(),
            party_mode: Preference::Party.default_value(),
        }
    }
}

impl Settings {
    /// Hydrate all flags from `store`.
    pub async fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, Error> {
        let mut settings = Self::default();
        for pref in Preference::ALL {
            let stored = store.get(pref.key()).await?;
            settings.assign(pref, pref.decode(stored.as_deref()));
        }
        tracing::debug!(?settings, "loaded settings");
        Ok(settings)
    }

    pub fn get(&self, pref: Preference) -> bool {
        match pref {
            Preference::Tilt => self.tilt_enabled,
            Preference::Saturn => self.saturn_mode,
            Preference::Party => self.party_mode,
        }
    }

    fn assign(&mut self, pref: Preference, enabled: bool) {
        match pref {
            Preference::Tilt => self.tilt_enabled = enabled,
            Preference::Saturn => self.saturn_mode = enabled,
            Preference::Party => self.party_mode = enabled,
        }
    }

    /// Persist `enabled` for `pref` and update this record.
    pub async fn set<S: KeyValueStore + ?Sized>(
        &mut self, store: &S, pref: Preference, enabled: bool,
    ) -> Result<(), Error> {
        store.set(pref.key(), if enabled { "true" } else { "false" }).await?;
        self.assign(pref, enabled);
        tracing::debug!(preference = %pref, enabled, "preference updated");
        Ok(())
    }

    /// Flip the tilt flag, returning the new value.
    pub async fn toggle_tilt<S: KeyValueStore + ?Sized>(&mut self, store: &S) -> Result<bool, Error> {
        let enabled = !self.tilt_enabled;
        self.set(store, Preference::Tilt, enabled).await?;
        Ok(enabled)
    }

    fn classes_for(&self, target: ClassTarget) -> Vec<&'static str> {
        Preference::ALL
            .into_iter()
            .filter(|pref| pref.class().1 == target && pref.class_applies(self.get(*pref)))
            .map(|pref| pref.class().0)
            .collect()
    }

    /// Classes to apply to the document root.
    pub fn root_classes(&self) -> Vec<&'static str> {
        self.classes_for(ClassTarget::Root)
    }

    /// Classes to apply to the document body.
    pub fn body_classes(&self) -> Vec<&'static str> {
        self.classes_for(ClassTarget::Body)
    }

    /// Extra stylesheets the current settings need.
    pub fn stylesheets(&self) -> Vec<&'static str> {
        if self.saturn_mode { vec![SATURN_FONT_HREF] } else { Vec::new() }
    }

    /// Label of the native tilt toggle button.
    pub fn tilt_label(&self) -> &'static str {
        if self.tilt_enabled { "Tilt: On" } else { "Tilt: Off" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SqliteStore};

    #[tokio::test]
    async fn test_defaults_when_store_empty() {
        let store = MemoryStore::new();
        let settings = Settings::load(&store).await.unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.tilt_enabled);
        assert!(!settings.saturn_mode);
        assert!(!settings.party_mode);
    }

    #[tokio::test]
    async fn test_non_true_values_are_off() {
        let store = MemoryStore::new();
        store.set("amblelabs.tiltEnabled", "yes").await.unwrap();
        store.set("amblelabs.saturnMode", "TRUE").await.unwrap();
        store.set("amblelabs.partyMode", "true").await.unwrap();

        let settings = Settings::load(&store).await.unwrap();
        assert!(!settings.tilt_enabled);
        assert!(!settings.saturn_mode);
        assert!(settings.party_mode);
    }

    #[tokio::test]
    async fn test_set_writes_literal_strings() {
        let store = MemoryStore::new();
        let mut settings = Settings::default();

        settings.set(&store, Preference::Saturn, true).await.unwrap();
        settings.set(&store, Preference::Tilt, false).await.unwrap();

        assert_eq!(store.get("amblelabs.saturnMode").await.unwrap().as_deref(), Some("true"));
        assert_eq!(store.get("amblelabs.tiltEnabled").await.unwrap().as_deref(), Some("false"));
        assert_eq!(Settings::load(&store).await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_toggle_tilt_round_trips_through_sqlite() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let mut settings = Settings::load(&store).await.unwrap();

        assert!(!settings.toggle_tilt(&store).await.unwrap());
        assert_eq!(settings.tilt_label(), "Tilt: Off");
        assert!(!Settings::load(&store).await.unwrap().tilt_enabled);

        assert!(settings.toggle_tilt(&store).await.unwrap());
        assert_eq!(settings.tilt_label(), "Tilt: On");
    }

    #[test]
    fn test_classes_follow_flags() {
        let settings = Settings { tilt_enabled: false, saturn_mode: true, party_mode: true };
        assert_eq!(settings.root_classes(), vec!["tilt-disabled", "party-mode"]);
        assert_eq!(settings.body_classes(), vec!["saturn-mode"]);
        assert_eq!(settings.stylesheets(), vec![SATURN_FONT_HREF]);

        let defaults = Settings::default();
        assert!(defaults.root_classes().is_empty());
        assert!(defaults.body_classes().is_empty());
        assert!(defaults.stylesheets().is_empty());
    }

    #[test]
    fn test_party_needs_confirmation_only_when_enabling() {
        assert!(Preference::Party.requires_confirmation(true));
        assert!(!Preference::Party.requires_confirmation(false));
        assert!(!Preference::Saturn.requires_confirmation(true));
    }

    #[test]
    fn test_preference_from_str() {
        assert_eq!("Tilt".parse::<Preference>().unwrap(), Preference::Tilt);
        assert_eq!(" party ".parse::<Preference>().unwrap(), Preference::Party);
        assert!(matches!("disco".parse::<Preference>(), Err(Error::UnknownPreference(_))));
    }
}
