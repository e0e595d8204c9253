use std::fs::{self, File, OpenOptions};
use std::io::{Write, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::core::types::{MovieRecord, Rating};
use crate::storage::layout::StorageLayout;
use crate::core::error::{Error, ErrorKind, Result};

/// Frame header: payload length + CRC32 of the payload
const FRAME_HEADER_LEN: usize = 8;
const MAX_ENTRY_LEN: usize = 1024 * 1024;
const BATCH_SYNC_BYTES: u64 = 64 * 1024;

/// Write-ahead log for durability
pub struct WAL {
    pub file: File,
    pub path: PathBuf,
    pub position: u64,
    pub sync_mode: SyncMode,
    pub sequence: u64,          // generation, matches the checkpoint it follows
    pub entry_count: usize,     // records in this generation
    unsynced_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Immediate,  // fsync after every write
    Batch,      // fsync periodically
    None,       // Let OS handle it
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WALEntry {
    pub sequence: u64,
    pub operation: Operation,
    pub timestamp: DateTime<Utc>,
}

/// One store mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    AddMovie(MovieRecord),
    DeleteMovie { title: String },
    UpdateRating { title: String, rating: Rating },
}

/// Entries recovered from a log file plus the byte length they cover
#[derive(Debug, Default)]
pub struct WALReplay {
    pub entries: Vec<WALEntry>,
    pub valid_len: u64,
    pub torn_tail: bool,
}

impl WAL {
    /// Open (or create) the log for `sequence`, dropping any torn tail
    pub fn open(storage: &StorageLayout, sequence: u64, sync_mode: SyncMode) -> Result<Self> {
        let path = storage.wal_path(sequence);
        let replay = Self::read_entries(&path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;

        if replay.torn_tail {
            warn!(path = %path.display(), valid_len = replay.valid_len, "truncating torn WAL tail");
            file.set_len(replay.valid_len)?;
            file.sync_all()?;
        }
        let position = file.seek(SeekFrom::Start(replay.valid_len))?;

        Ok(WAL {
            file,
            path,
            position,
            sync_mode,
            sequence,
            entry_count: replay.entries.len(),
            unsynced_bytes: 0,
        })
    }

    pub fn append(&mut self, operation: Operation) -> Result<()> {
        let entry = WALEntry {
            sequence: self.sequence,
            operation,
            timestamp: Utc::now(),
        };

        let data = bincode::serialize(&entry)?;
        if data.len() > MAX_ENTRY_LEN {
            return Err(Error::new(ErrorKind::InvalidInput, "WAL entry too large".to_string()));
        }

        let mut hasher = Hasher::new();
        hasher.update(&data);

        // One buffer so the frame reaches the file in a single write
        let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + data.len());
        frame.extend_from_slice(&(data.len() as u32).to_le_bytes());
        frame.extend_from_slice(&hasher.finalize().to_le_bytes());
        frame.extend_from_slice(&data);

        // Bytes past `position` belong to no acknowledged entry
        if self.file.stream_position()? != self.position {
            warn!(path = %self.path.display(), position = self.position, "discarding bytes past last WAL entry");
            self.rewind_to_position()?;
        }

        if let Err(e) = self.file.write_all(&frame) {
            self.rewind_to_position()?;
            return Err(e.into());
        }

        self.position += frame.len() as u64;
        self.unsynced_bytes += frame.len() as u64;
        self.entry_count += 1;

        match self.sync_mode {
            SyncMode::Immediate => self.sync()?,
            SyncMode::Batch if self.unsynced_bytes >= BATCH_SYNC_BYTES => self.sync()?,
            _ => {}
        }

        debug!(sequence = self.sequence, position = self.position, "appended WAL entry");
        Ok(())
    }

    /// Drop everything after the last complete entry
    fn rewind_to_position(&mut self) -> Result<()> {
        self.file.set_len(self.position)?;
        self.file.seek(SeekFrom::Start(self.position))?;
        Ok(())
    }

    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        self.unsynced_bytes = 0;
        Ok(())
    }

    /// Read every intact entry; stops at the first short or corrupt frame
    pub fn read_entries(path: &Path) -> Result<WALReplay> {
        if !path.exists() {
            return Ok(WALReplay::default());
        }

        let data = fs::read(path)?;
        let mut replay = WALReplay::default();
        let mut offset = 0usize;

        while offset < data.len() {
            if data.len() - offset < FRAME_HEADER_LEN {
                replay.torn_tail = true;
                break;
            }

            let len = u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]]) as usize;
            let checksum = u32::from_le_bytes([data[offset + 4], data[offset + 5], data[offset + 6], data[offset + 7]]);

            // Sanity check - entry shouldn't be too large
            if len > MAX_ENTRY_LEN || data.len() - offset - FRAME_HEADER_LEN < len {
                replay.torn_tail = true;
                break;
            }

            let payload = &data[offset + FRAME_HEADER_LEN..offset + FRAME_HEADER_LEN + len];
            let mut hasher = Hasher::new();
            hasher.update(payload);
            if hasher.finalize() != checksum {
                warn!(path = %path.display(), offset, "WAL checksum mismatch");
                replay.torn_tail = true;
                break;
            }

            match bincode::deserialize::<WALEntry>(payload) {
                Ok(entry) => replay.entries.push(entry),
                Err(e) => {
                    warn!(path = %path.display(), offset, error = %e, "failed to decode WAL entry");
                    replay.torn_tail = true;
                    break;
                }
            }

            offset += FRAME_HEADER_LEN + len;
            replay.valid_len = offset as u64;
        }

        Ok(replay)
    }

    /// Find all WAL generations on disk, oldest first
    pub fn find_wal_files(storage: &StorageLayout) -> Result<Vec<u64>> {
        let mut sequences = Vec::new();
        let wal_dir = storage.wal_dir();

        if wal_dir.exists() {
            for entry in fs::read_dir(wal_dir)? {
                let path = entry?.path();

                if path.extension().and_then(|s| s.to_str()) != Some("log") {
                    continue;
                }

                // Format: wal_00000000.log
                let seq = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(|stem| stem.strip_prefix("wal_"))
                    .and_then(|seq| seq.parse::<u64>().ok());

                if let Some(seq) = seq {
                    sequences.push(seq);
                }
            }
        }

        sequences.sort();
        Ok(sequences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn add(title: &str) -> Operation {
        Operation::AddMovie(MovieRecord::new(title, 2000, None, None).unwrap())
    }

    #[test]
    fn entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let storage = StorageLayout::new(dir.path().to_path_buf()).unwrap();

        let mut wal = WAL::open(&storage, 0, SyncMode::Immediate).unwrap();
        wal.append(add("Alien")).unwrap();
        wal.append(Operation::DeleteMovie { title: "alien".to_string() }).unwrap();
        drop(wal);

        let wal = WAL::open(&storage, 0, SyncMode::Immediate).unwrap();
        assert_eq!(wal.entry_count, 2);

        let replay = WAL::read_entries(&storage.wal_path(0)).unwrap();
        assert_eq!(replay.entries[0].operation, add("Alien"));
        assert!(!replay.torn_tail);
    }

    #[test]
    fn torn_tail_is_dropped_on_open() {
        let dir = TempDir::new().unwrap();
        let storage = StorageLayout::new(dir.path().to_path_buf()).unwrap();

        let mut wal = WAL::open(&storage, 0, SyncMode::Immediate).unwrap();
        wal.append(add("Alien")).unwrap();
        let intact = wal.position;
        drop(wal);

        // Half-written frame
        let mut file = OpenOptions::new().append(true).open(storage.wal_path(0)).unwrap();
        file.write_all(&[42, 0, 0, 0, 1, 2]).unwrap();
        drop(file);

        let mut wal = WAL::open(&storage, 0, SyncMode::Immediate).unwrap();
        assert_eq!(wal.position, intact);
        assert_eq!(wal.entry_count, 1);

        wal.append(add("Aliens")).unwrap();
        let replay = WAL::read_entries(&storage.wal_path(0)).unwrap();
        assert_eq!(replay.entries.len(), 2);
    }

    #[test]
    fn stray_bytes_after_last_entry_are_overwritten() {
        let dir = TempDir::new().unwrap();
        let storage = StorageLayout::new(dir.path().to_path_buf()).unwrap();

        let mut wal = WAL::open(&storage, 0, SyncMode::Immediate).unwrap();
        wal.append(add("Alien")).unwrap();

        // Leftover of a write that failed halfway
        wal.file.write_all(&[42, 0, 0, 0, 1, 2]).unwrap();

        wal.append(add("Aliens")).unwrap();

        let replay = WAL::read_entries(&storage.wal_path(0)).unwrap();
        assert!(!replay.torn_tail);
        assert_eq!(replay.entries.len(), 2);
        assert_eq!(replay.entries[1].operation, add("Aliens"));
        assert_eq!(replay.valid_len, wal.position);
    }

    #[test]
    fn batch_mode_defers_sync_until_threshold() {
        let dir = TempDir::new().unwrap();
        let storage = StorageLayout::new(dir.path().to_path_buf()).unwrap();

        let mut wal = WAL::open(&storage, 0, SyncMode::Batch).unwrap();
        wal.append(add("Alien")).unwrap();
        assert_eq!(wal.unsynced_bytes, wal.position);

        wal.sync().unwrap();
        assert_eq!(wal.unsynced_bytes, 0);
    }

    #[test]
    fn generations_are_listed_oldest_first() {
        let dir = TempDir::new().unwrap();
        let storage = StorageLayout::new(dir.path().to_path_buf()).unwrap();

        for sequence in [3, 1, 2] {
            WAL::open(&storage, sequence, SyncMode::None).unwrap();
        }
        fs::write(storage.wal_dir().join("notes.txt"), b"x").unwrap();

        assert_eq!(WAL::find_wal_files(&storage).unwrap(), vec![1, 2, 3]);
    }
}
