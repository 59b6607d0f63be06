//! Player persistence adapters.
//!
//! The rules never touch storage. Callers load a [`Player`], run operations on
//! it and hand it back to a [`PlayerRepository`].

use super::types::{Player, PlayerId};
use crate::core::constants::SAVE_VERSION_MAGIC;
use crate::core::error::GameError;
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid save version: expected 0x{expected:016X}, got 0x{found:016X}")]
    VersionMismatch { expected: u64, found: u64 },

    #[error("save file truncated")]
    Truncated,

    #[error("checksum verification failed")]
    ChecksumMismatch,

    #[error("no save for player {0}")]
    NotFound(PlayerId),

    #[error("could not determine data directory")]
    NoDataDir,

    #[error("rejected by the rules engine: {0}")]
    Rules(#[from] GameError),
}

pub trait PlayerRepository {
    fn load(&self, id: PlayerId) -> Result<Player, SaveError>;
    fn save(&mut self, player: &Player) -> Result<(), SaveError>;
    fn delete(&mut self, id: PlayerId) -> Result<(), SaveError>;
    fn exists(&self, id: PlayerId) -> bool;
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    players: HashMap<PlayerId, Player>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlayerRepository for InMemoryRepository {
    fn load(&self, id: PlayerId) -> Result<Player, SaveError> {
        self.players.get(&id).cloned().ok_or(SaveError::NotFound(id))
    }

    fn save(&mut self, player: &Player) -> Result<(), SaveError> {
        self.players.insert(player.id, player.clone());
        Ok(())
    }

    fn delete(&mut self, id: PlayerId) -> Result<(), SaveError> {
        self.players
            .remove(&id)
            .map(|_| ())
            .ok_or(SaveError::NotFound(id))
    }

    fn exists(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }
}

/// One checksummed binary file per player.
///
/// File format:
/// - Version magic (8 bytes)
/// - Data length (4 bytes)
/// - bincode-serialized player (variable length)
/// - SHA256 checksum over all of the above (32 bytes)
#[derive(Debug, Clone)]
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Repository in the platform data directory.
    pub fn in_default_dir() -> Result<Self, SaveError> {
        let project_dirs = ProjectDirs::from("", "", "idle-hero").ok_or(SaveError::NoDataDir)?;
        Ok(Self::new(project_dirs.data_dir().join("players"))?)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: PlayerId) -> PathBuf {
        self.dir.join(format!("{}.sav", id))
    }
}

impl PlayerRepository for FileRepository {
    fn load(&self, id: PlayerId) -> Result<Player, SaveError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(SaveError::NotFound(id));
        }
        let bytes = fs::read(&path)?;
        decode_player(&bytes)
            .inspect_err(|e| warn!(player = %id, error = %e, "failed to load save"))
    }

    fn save(&mut self, player: &Player) -> Result<(), SaveError> {
        let bytes = encode_player(player)?;
        // Write to a sibling temp file, then rename over the old save
        let path = self.path_for(player.id);
        let tmp = path.with_extension("sav.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        debug!(player = %player.id, path = %path.display(), "saved player");
        Ok(())
    }

    fn delete(&mut self, id: PlayerId) -> Result<(), SaveError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(SaveError::NotFound(id));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn exists(&self, id: PlayerId) -> bool {
        self.path_for(id).exists()
    }
}

pub fn encode_player(player: &Player) -> Result<Vec<u8>, SaveError> {
    let data = bincode::serialize(player).map_err(|e| SaveError::Serialization(e.to_string()))?;
    let data_len = data.len() as u32;

    let mut hasher = Sha256::new();
    hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
    hasher.update(data_len.to_le_bytes());
    hasher.update(&data);
    let checksum = hasher.finalize();

    let mut out = Vec::with_capacity(8 + 4 + data.len() + 32);
    out.extend_from_slice(&SAVE_VERSION_MAGIC.to_le_bytes());
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(&data);
    out.extend_from_slice(&checksum);
    Ok(out)
}

pub fn decode_player(bytes: &[u8]) -> Result<Player, SaveError> {
    if bytes.len() < 12 {
        return Err(SaveError::Truncated);
    }
    let (version_bytes, rest) = bytes.split_at(8);
    let version = u64::from_le_bytes(version_bytes.try_into().map_err(|_| SaveError::Truncated)?);
    if version != SAVE_VERSION_MAGIC {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION_MAGIC,
            found: version,
        });
    }

    let (length_bytes, rest) = rest.split_at(4);
    let data_len =
        u32::from_le_bytes(length_bytes.try_into().map_err(|_| SaveError::Truncated)?) as usize;
    if rest.len() != data_len + 32 {
        return Err(SaveError::Truncated);
    }
    let (data, stored_checksum) = rest.split_at(data_len);

    let mut hasher = Sha256::new();
    hasher.update(version_bytes);
    hasher.update(length_bytes);
    hasher.update(data);
    if hasher.finalize().as_slice() != stored_checksum {
        return Err(SaveError::ChecksumMismatch);
    }

    bincode::deserialize(data).map_err(|e| SaveError::Serialization(e.to_string()))
}
