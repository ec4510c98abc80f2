#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone source record types.
//!
//! Source geometry carries loosely-typed property bags whose naming keys
//! differ between datasets. [`ZoneProperties`] narrows them down to the
//! handful of keys that can name a zone, and [`NameKey::PRIORITY`] fixes
//! the order in which they are consulted.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A property key that may carry a zone's display name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NameKey {
    /// Official name (`nom`)
    Nom,
    /// Generic `name` property
    Name,
    /// Short label (`l_ar`)
    #[serde(rename = "l_ar")]
    #[strum(serialize = "l_ar")]
    LAr,
    /// Long official label (`l_aroff`)
    #[serde(rename = "l_aroff")]
    #[strum(serialize = "l_aroff")]
    LAroff,
}

impl NameKey {
    /// Keys in the order they are consulted when naming a zone.
    pub const PRIORITY: &'static [Self] = &[Self::Nom, Self::Name, Self::LAr, Self::LAroff];
}

/// The naming properties of one source zone record.
///
/// Each field is `None` when the key is absent or not a usable string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneProperties {
    pub nom: Option<String>,
    pub name: Option<String>,
    pub l_ar: Option<String>,
    pub l_aroff: Option<String>,
}

impl ZoneProperties {
    /// Returns the trimmed, non-empty value stored under `key`.
    #[must_use]
    pub fn get(&self, key: NameKey) -> Option<&str> {
        let value = match key {
            NameKey::Nom => self.nom.as_deref(),
            NameKey::Name => self.name.as_deref(),
            NameKey::LAr => self.l_ar.as_deref(),
            NameKey::LAroff => self.l_aroff.as_deref(),
        };
        value.map(str::trim).filter(|s| !s.is_empty())
    }

    /// Stores `value` under `key`.
    pub fn set(&mut self, key: NameKey, value: String) {
        let slot = match key {
            NameKey::Nom => &mut self.nom,
            NameKey::Name => &mut self.name,
            NameKey::LAr => &mut self.l_ar,
            NameKey::LAroff => &mut self.l_aroff,
        };
        *slot = Some(value);
    }

    /// Returns the first usable name in [`NameKey::PRIORITY`] order.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        NameKey::PRIORITY.iter().find_map(|key| self.get(*key))
    }
}

/// Synthetic name for the zone at 0-based position `index` when no naming
/// property is usable.
#[must_use]
pub fn fallback_name(index: usize) -> String {
    format!("zone-{}", index + 1)
}

/// Disambiguated name for a zone at 0-based position `index` whose
/// resolved name is already taken.
#[must_use]
pub fn disambiguated_name(name: &str, index: usize) -> String {
    format!("{name}-{}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_follows_priority() {
        let props = ZoneProperties {
            nom: None,
            name: Some("Louvre".to_string()),
            l_ar: Some("1er Ardt".to_string()),
            l_aroff: None,
        };
        assert_eq!(props.display_name(), Some("Louvre"));

        let props = ZoneProperties {
            nom: Some("Bourse".to_string()),
            ..props
        };
        assert_eq!(props.display_name(), Some("Bourse"));
    }

    #[test]
    fn blank_values_are_skipped() {
        let props = ZoneProperties {
            nom: Some("   ".to_string()),
            name: Some(String::new()),
            l_ar: None,
            l_aroff: Some(" Temple ".to_string()),
        };
        assert_eq!(props.display_name(), Some("Temple"));
    }

    #[test]
    fn empty_properties_have_no_name() {
        assert_eq!(ZoneProperties::default().display_name(), None);
    }

    #[test]
    fn set_fills_matching_slot() {
        let mut props = ZoneProperties::default();
        props.set(NameKey::LAr, "2e Ardt".to_string());
        assert_eq!(props.l_ar.as_deref(), Some("2e Ardt"));
        assert_eq!(props.get(NameKey::LAr), Some("2e Ardt"));
    }

    #[test]
    fn key_labels_match_source_properties() {
        let labels: Vec<&str> = NameKey::PRIORITY.iter().map(AsRef::as_ref).collect();
        assert_eq!(labels, vec!["nom", "name", "l_ar", "l_aroff"]);
    }

    #[test]
    fn synthetic_names_are_one_based() {
        assert_eq!(fallback_name(0), "zone-1");
        assert_eq!(disambiguated_name("Centre", 4), "Centre-5");
    }
}
