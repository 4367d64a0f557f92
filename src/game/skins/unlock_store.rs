//! Persisted unlock and selection state, behind the [`SkinPersistence`] port.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{CharacterId, PersistenceError, SkinId};

/// Currency and progression used to gate purchases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub coins: u32,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterUnlocks {
    #[serde(default)]
    pub unlocked: BTreeSet<SkinId>,
    #[serde(default)]
    pub selected: SkinId,
}

/// Everything the save file holds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnlockState {
    #[serde(default)]
    pub characters: BTreeMap<CharacterId, CharacterUnlocks>,
    #[serde(default)]
    pub profile: PlayerProfile,
}

impl UnlockState {
    pub fn with_profile(profile: PlayerProfile) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }

    pub fn is_unlocked(&self, character: CharacterId, skin: SkinId) -> bool {
        skin.is_default()
            || self
                .characters
                .get(&character)
                .is_some_and(|entry| entry.unlocked.contains(&skin))
    }

    pub fn set_unlocked(&mut self, character: CharacterId, skin: SkinId) {
        if skin.is_default() {
            return;
        }
        self.characters
            .entry(character)
            .or_default()
            .unlocked
            .insert(skin);
    }

    pub fn selected(&self, character: CharacterId) -> SkinId {
        self.characters
            .get(&character)
            .map(|entry| entry.selected)
            .unwrap_or_default()
    }

    pub fn set_selected(&mut self, character: CharacterId, skin: SkinId) {
        self.characters.entry(character).or_default().selected = skin;
    }
}

/// Storage port consumed by the coordinator.
///
/// Mutations only touch memory; `save` flushes them. The coordinator calls `save`
/// after every mutation.
pub trait SkinPersistence: Send + Sync {
    fn is_unlocked(&self, character: CharacterId, skin: SkinId) -> bool;
    fn set_unlocked(&mut self, character: CharacterId, skin: SkinId);
    fn selected(&self, character: CharacterId) -> SkinId;
    fn set_selected(&mut self, character: CharacterId, skin: SkinId);
    fn profile(&self) -> PlayerProfile;
    fn set_profile(&mut self, profile: PlayerProfile);
    fn save(&mut self) -> Result<(), PersistenceError>;
}

/// Save data kept in memory only.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub state: UnlockState,
    pub save_count: usize,
}

impl InMemoryStore {
    pub fn new(state: UnlockState) -> Self {
        Self {
            state,
            save_count: 0,
        }
    }
}

impl SkinPersistence for InMemoryStore {
    fn is_unlocked(&self, character: CharacterId, skin: SkinId) -> bool {
        self.state.is_unlocked(character, skin)
    }

    fn set_unlocked(&mut self, character: CharacterId, skin: SkinId) {
        self.state.set_unlocked(character, skin);
    }

    fn selected(&self, character: CharacterId) -> SkinId {
        self.state.selected(character)
    }

    fn set_selected(&mut self, character: CharacterId, skin: SkinId) {
        self.state.set_selected(character, skin);
    }

    fn profile(&self) -> PlayerProfile {
        self.state.profile
    }

    fn set_profile(&mut self, profile: PlayerProfile) {
        self.state.profile = profile;
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        self.save_count += 1;
        Ok(())
    }
}

/// Save data backed by a RON file.
#[derive(Debug)]
pub struct SaveFileStore {
    path: PathBuf,
    state: UnlockState,
}

impl SaveFileStore {
    /// Opens the save at `path`. A missing file starts from `fresh`.
    pub fn open(path: impl Into<PathBuf>, fresh: UnlockState) -> Result<Self, PersistenceError> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(text) => ron::from_str(&text).map_err(|source| PersistenceError::Deserialize {
                path: path.clone(),
                source,
            })?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No skin save found, starting fresh");
                fresh
            }
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };
        Ok(Self { path, state })
    }
}

impl SkinPersistence for SaveFileStore {
    fn is_unlocked(&self, character: CharacterId, skin: SkinId) -> bool {
        self.state.is_unlocked(character, skin)
    }

    fn set_unlocked(&mut self, character: CharacterId, skin: SkinId) {
        self.state.set_unlocked(character, skin);
    }

    fn selected(&self, character: CharacterId) -> SkinId {
        self.state.selected(character)
    }

    fn set_selected(&mut self, character: CharacterId, skin: SkinId) {
        self.state.set_selected(character, skin);
    }

    fn profile(&self) -> PlayerProfile {
        self.state.profile
    }

    fn set_profile(&mut self, profile: PlayerProfile) {
        self.state.profile = profile;
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        let text = ron::ser::to_string_pretty(&self.state, PrettyConfig::default())?;
        write_atomic(&self.path, text.as_bytes()).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "Skin save written");
        Ok(())
    }
}

/// Opens the file store, falling back to memory if the save is unreadable.
pub fn open_store(path: &Path, fresh: UnlockState) -> Box<dyn SkinPersistence> {
    match SaveFileStore::open(path, fresh.clone()) {
        Ok(store) => Box::new(store),
        Err(error) => {
            warn!("Skin save unavailable, progress will not persist: {error}");
            Box::new(InMemoryStore::new(fresh))
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("save");
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));
    fs::write(&tmp_path, bytes)?;
    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(())
}
