//! Read-only skin catalog: which skins exist for which character.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::SkinError;

/// Identifier of a playable character.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Reflect, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CharacterId(pub u32);

/// Identifier of a skin, unique per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkinId(pub i32);

impl SkinId {
    /// The built-in look every character starts with. Always unlocked.
    pub const DEFAULT: SkinId = SkinId(-1);

    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }
}

impl Default for SkinId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "character#{}", self.0)
    }
}

impl fmt::Display for SkinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            f.write_str("skin#default")
        } else {
            write!(f, "skin#{}", self.0)
        }
    }
}

/// An authored presentation sequence played before a skin swap.
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct TimelineSpec {
    pub name: String,
    /// Total length of the sequence
    pub duration_secs: f32,
    /// Point in the sequence where the visual swap happens
    pub signal_at_secs: f32,
}

impl TimelineSpec {
    /// Finite, positive duration and a finite, non-negative signal point. The signal
    /// may sit past the end.
    pub fn has_valid_timing(&self) -> bool {
        self.duration_secs.is_finite()
            && self.duration_secs > 0.0
            && self.signal_at_secs.is_finite()
            && self.signal_at_secs >= 0.0
    }
}

/// Static description of one skin
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct SkinRecord {
    pub id: SkinId,
    pub name: String,
    #[serde(default)]
    pub presentation: Option<TimelineSpec>,
    #[serde(default)]
    pub unlocked_by_default: bool,
    #[serde(default)]
    pub unlock_cost: u32,
    #[serde(default)]
    pub unlock_level: u32,
}

impl SkinRecord {
    pub fn has_presentation(&self) -> bool {
        self.presentation.is_some()
    }

    /// Record used for [`SkinId::DEFAULT`], which is never listed in the catalog file.
    pub fn default_skin() -> Self {
        Self {
            id: SkinId::DEFAULT,
            name: "Default".to_string(),
            presentation: None,
            unlocked_by_default: true,
            unlock_cost: 0,
            unlock_level: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: CharacterId,
    pub name: String,
    pub skins: Vec<SkinRecord>,
}

static DEFAULT_SKIN: LazyLock<SkinRecord> = LazyLock::new(SkinRecord::default_skin);

/// Skin catalog loaded from RON
#[derive(Asset, Resource, TypePath, Clone, Debug, Serialize, Deserialize)]
pub struct SkinCatalog {
    pub characters: Vec<CharacterRecord>,
    /// Number of showcase regions spawned in the menu scene
    #[serde(default = "default_showcase_regions")]
    pub showcase_regions: u32,
    /// Showcase region entered when a presentation starts
    #[serde(default)]
    pub default_showcase: u32,
}

fn default_showcase_regions() -> u32 {
    1
}

impl SkinCatalog {
    /// Path to the catalog file, relative to `assets/`
    pub const PATH: &'static str = "config/skin_catalog.ron";

    pub fn new(characters: Vec<CharacterRecord>) -> Self {
        Self {
            characters,
            showcase_regions: default_showcase_regions(),
            default_showcase: 0,
        }
    }

    pub fn character(&self, id: CharacterId) -> Result<&CharacterRecord, SkinError> {
        self.characters
            .iter()
            .find(|character| character.id == id)
            .ok_or(SkinError::UnknownCharacter(id))
    }

    pub fn get_skin(&self, character: CharacterId, skin: SkinId) -> Result<&SkinRecord, SkinError> {
        let record = self.character(character)?;
        if skin.is_default() {
            return Ok(&DEFAULT_SKIN);
        }
        record
            .skins
            .iter()
            .find(|candidate| candidate.id == skin)
            .ok_or(SkinError::UnknownSkin { character, skin })
    }

    pub fn first_character(&self) -> Option<CharacterId> {
        self.characters.first().map(|character| character.id)
    }

    /// Character after `current` in catalog order, wrapping around.
    pub fn next_character(&self, current: CharacterId) -> Option<CharacterId> {
        let index = self
            .characters
            .iter()
            .position(|character| character.id == current);
        match index {
            Some(index) => self
                .characters
                .get((index + 1) % self.characters.len())
                .map(|character| character.id),
            None => self.first_character(),
        }
    }

    pub fn validate(&self) -> Result<(), SkinError> {
        let mut characters = HashSet::new();
        for character in &self.characters {
            if !characters.insert(character.id) {
                return Err(SkinError::InvalidCatalog(format!(
                    "duplicate character id {}",
                    character.id
                )));
            }
            let mut skins = HashSet::new();
            for skin in &character.skins {
                if skin.id.is_default() {
                    return Err(SkinError::InvalidCatalog(format!(
                        "{} lists the reserved default skin id",
                        character.id
                    )));
                }
                if !skins.insert(skin.id) {
                    return Err(SkinError::InvalidCatalog(format!(
                        "duplicate {} for {}",
                        skin.id, character.id
                    )));
                }
                if let Some(timeline) = &skin.presentation {
                    if !timeline.has_valid_timing() {
                        return Err(SkinError::InvalidCatalog(format!(
                            "timeline '{}' of {} has invalid timing",
                            timeline.name, skin.id
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skin(id: i32) -> SkinRecord {
        SkinRecord {
            id: SkinId(id),
            name: format!("Skin {id}"),
            presentation: None,
            unlocked_by_default: false,
            unlock_cost: 0,
            unlock_level: 0,
        }
    }

    fn catalog() -> SkinCatalog {
        SkinCatalog::new(vec![
            CharacterRecord {
                id: CharacterId(1),
                name: "Runner".to_string(),
                skins: vec![skin(3), skin(5)],
            },
            CharacterRecord {
                id: CharacterId(2),
                name: "Climber".to_string(),
                skins: vec![skin(3)],
            },
        ])
    }

    #[test]
    fn test_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.get_skin(CharacterId(1), SkinId(5)).unwrap().id, SkinId(5));
        assert_eq!(
            catalog.get_skin(CharacterId(1), SkinId(9)),
            Err(SkinError::UnknownSkin {
                character: CharacterId(1),
                skin: SkinId(9)
            })
        );
        assert_eq!(
            catalog.get_skin(CharacterId(7), SkinId(3)),
            Err(SkinError::UnknownCharacter(CharacterId(7)))
        );
    }

    #[test]
    fn test_default_skin_resolves_for_known_characters() {
        let catalog = catalog();
        let record = catalog.get_skin(CharacterId(2), SkinId::DEFAULT).unwrap();
        assert!(record.unlocked_by_default);
        assert!(!record.has_presentation());
        assert!(catalog.get_skin(CharacterId(7), SkinId::DEFAULT).is_err());
    }

    #[test]
    fn test_next_character_wraps() {
        let catalog = catalog();
        assert_eq!(catalog.next_character(CharacterId(1)), Some(CharacterId(2)));
        assert_eq!(catalog.next_character(CharacterId(2)), Some(CharacterId(1)));
        assert_eq!(catalog.next_character(CharacterId(42)), Some(CharacterId(1)));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_bad_timelines() {
        assert!(catalog().validate().is_ok());

        let mut duplicate = catalog();
        duplicate.characters[0].skins.push(skin(3));
        assert!(duplicate.validate().is_err());

        let mut reserved = catalog();
        reserved.characters[1].skins.push(skin(-1));
        assert!(reserved.validate().is_err());

        let mut timing = catalog();
        timing.characters[0].skins[0].presentation = Some(TimelineSpec {
            name: "spin".to_string(),
            duration_secs: 0.0,
            signal_at_secs: 0.0,
        });
        assert!(timing.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_timing() {
        for (duration_secs, signal_at_secs) in [
            (f32::NAN, 1.0),
            (2.0, f32::NAN),
            (f32::INFINITY, 1.0),
            (2.0, f32::INFINITY),
        ] {
            let mut timing = catalog();
            timing.characters[0].skins[0].presentation = Some(TimelineSpec {
                name: "spin".to_string(),
                duration_secs,
                signal_at_secs,
            });
            assert!(timing.validate().is_err());
        }

        let mut late_signal = catalog();
        late_signal.characters[0].skins[0].presentation = Some(TimelineSpec {
            name: "spin".to_string(),
            duration_secs: 1.0,
            signal_at_secs: 3.0,
        });
        assert!(late_signal.validate().is_ok());
    }

    #[test]
    fn test_nan_timeline_in_ron_is_rejected() {
        let source = r#"(
            characters: [
                (
                    id: 1,
                    name: "Runner",
                    skins: [
                        (
                            id: 3,
                            name: "Ember",
                            presentation: Some((name: "ember_reveal", duration_secs: NaN, signal_at_secs: 1.0)),
                        ),
                    ],
                ),
            ],
        )"#;
        let catalog: SkinCatalog = ron::from_str(source).unwrap();
        assert!(matches!(catalog.validate(), Err(SkinError::InvalidCatalog(_))));
    }

    #[test]
    fn test_parse_catalog_ron() {
        let source = r#"(
            characters: [
                (
                    id: 1,
                    name: "Runner",
                    skins: [
                        (id: 3, name: "Ember", unlock_cost: 200, unlock_level: 4),
                        (
                            id: 5,
                            name: "Aurora",
                            unlocked_by_default: true,
                            presentation: Some((name: "aurora_reveal", duration_secs: 2.5, signal_at_secs: 1.2)),
                        ),
                    ],
                ),
            ],
            showcase_regions: 2,
        )"#;
        let catalog: SkinCatalog = ron::from_str(source).unwrap();
        assert_eq!(catalog.showcase_regions, 2);
        assert_eq!(catalog.default_showcase, 0);
        let ember = catalog.get_skin(CharacterId(1), SkinId(3)).unwrap();
        assert_eq!(ember.unlock_cost, 200);
        assert!(!ember.has_presentation());
        assert!(catalog.get_skin(CharacterId(1), SkinId(5)).unwrap().has_presentation());
        assert_eq!(
            catalog.get_skin(CharacterId(1), SkinId::DEFAULT).unwrap().name,
            "Default"
        );
    }
}
