use std::fs;
use std::io::Write;
use chrono::{DateTime, Utc};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;
use crate::core::types::MovieRecord;
use crate::storage::layout::StorageLayout;
use crate::core::error::{Error, Result};

/// Full image of the collection, valid up to the start of WAL `sequence`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub sequence: u64,
    pub records: Vec<MovieRecord>,
    pub timestamp: DateTime<Utc>,
    pub record_count: usize,
    pub checksum: u32,
}

impl Checkpoint {
    pub fn new(sequence: u64, records: Vec<MovieRecord>) -> Result<Self> {
        let checksum = Self::checksum_of(&records)?;
        Ok(Checkpoint {
            sequence,
            record_count: records.len(),
            records,
            timestamp: Utc::now(),
            checksum,
        })
    }

    /// An empty store before its first checkpoint
    pub fn empty() -> Self {
        Checkpoint {
            sequence: 0,
            records: Vec::new(),
            timestamp: Utc::now(),
            record_count: 0,
            checksum: 0,
        }
    }

    /// Load checkpoint from disk
    pub fn load(storage: &StorageLayout) -> Result<Option<Self>> {
        let path = storage.checkpoint_path();
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read(path)?;
        let checkpoint: Checkpoint = bincode::deserialize(&data)?;

        if checkpoint.record_count != checkpoint.records.len()
            || checkpoint.checksum != Self::checksum_of(&checkpoint.records)?
        {
            return Err(Error::corrupted(format!(
                "checkpoint at sequence {} failed verification",
                checkpoint.sequence
            )));
        }

        Ok(Some(checkpoint))
    }

    /// Save checkpoint to disk; readers see either the old or the new file
    pub fn save(&self, storage: &StorageLayout) -> Result<()> {
        let data = bincode::serialize(self)?;

        let mut tmp = NamedTempFile::new_in(&storage.meta_dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(storage.checkpoint_path())?;

        info!(
            sequence = self.sequence,
            records = self.record_count,
            "checkpoint written"
        );
        Ok(())
    }

    fn checksum_of(records: &[MovieRecord]) -> Result<u32> {
        let mut hasher = Hasher::new();
        hasher.update(&bincode::serialize(records)?);
        Ok(hasher.finalize())
    }
}
