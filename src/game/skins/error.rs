use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::{CharacterId, SkinId};

/// Lookup and catalog failures. These abort the single requested operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkinError {
    #[error("unknown {0}")]
    UnknownCharacter(CharacterId),
    #[error("unknown {skin} for {character}")]
    UnknownSkin { character: CharacterId, skin: SkinId },
    #[error("invalid skin catalog: {0}")]
    InvalidCatalog(String),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access save file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode save data: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to decode save file {path}: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}
