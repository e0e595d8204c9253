use std::fs;
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::types::{titles_match, validate_title, Collection, MovieRecord, Rating};
use crate::storage::checkpoint::Checkpoint;
use crate::storage::file_lock::FileLock;
use crate::storage::layout::StorageLayout;
use crate::storage::wal::{Operation, WAL};

/// Durable movie collection.
///
/// Every read rebuilds the collection from disk (checkpoint + WAL), so the
/// files are the only source of truth. Mutations are serialized through the
/// writer mutex and each one is a single WAL record.
pub struct MovieDatabase {
    config: Config,
    storage: StorageLayout,
    writer: Mutex<WAL>,
    _lock: FileLock,
}

impl MovieDatabase {
    pub fn open(config: Config) -> Result<Self> {
        let storage = StorageLayout::new(config.storage_path.clone())?;
        let lock = FileLock::acquire(&storage)?;

        let checkpoint = Checkpoint::load(&storage)?.unwrap_or_else(Checkpoint::empty);

        for sequence in WAL::find_wal_files(&storage)? {
            let path = storage.wal_path(sequence);

            if sequence < checkpoint.sequence {
                // Already folded into the checkpoint
                debug!(sequence, "removing stale WAL generation");
                fs::remove_file(&path)?;
            } else if sequence > checkpoint.sequence {
                // Left behind by a checkpoint that never landed; only harmless if empty
                if !WAL::read_entries(&path)?.entries.is_empty() {
                    return Err(Error::corrupted(format!(
                        "WAL generation {} is newer than checkpoint {}",
                        sequence, checkpoint.sequence
                    )));
                }
                warn!(sequence, "removing empty WAL generation ahead of checkpoint");
                fs::remove_file(&path)?;
            }
        }

        let wal = WAL::open(&storage, checkpoint.sequence, config.sync_mode)?;

        info!(
            path = %storage.base_dir.display(),
            checkpoint_records = checkpoint.record_count,
            wal_entries = wal.entry_count,
            "movie database opened"
        );

        Ok(MovieDatabase {
            config,
            storage,
            writer: Mutex::new(wal),
            _lock: lock,
        })
    }

    /// Full snapshot of the collection, in insertion order
    pub fn list(&self) -> Result<Collection> {
        let wal = self.writer.lock();
        self.load_snapshot(wal.sequence)
    }

    /// Case-insensitive lookup of a single record
    pub fn find(&self, title: &str) -> Result<Option<MovieRecord>> {
        let snapshot = self.list()?;
        Ok(snapshot
            .into_iter()
            .find(|(stored, _)| titles_match(stored, title))
            .map(|(title, details)| MovieRecord { title, details }))
    }

    /// Insert a new record; titles collide only on an exact (case-sensitive) match
    pub fn add(&self, record: MovieRecord) -> Result<()> {
        validate_title(&record.title)?;

        let mut wal = self.writer.lock();
        let mut snapshot = self.load_snapshot(wal.sequence)?;

        if snapshot.contains_key(&record.title) {
            debug!(title = %record.title, "duplicate title rejected");
            return Err(Error::duplicate_title(&record.title));
        }

        let title = record.title.clone();
        let operation = Operation::AddMovie(record);
        apply(&mut snapshot, &operation);
        wal.append(operation)?;

        debug!(%title, "movie added");
        self.maybe_checkpoint(&mut wal, snapshot);
        Ok(())
    }

    /// Remove every record whose title matches case-insensitively
    pub fn delete(&self, title: &str) -> Result<bool> {
        validate_title(title)?;

        let mut wal = self.writer.lock();
        let mut snapshot = self.load_snapshot(wal.sequence)?;

        if !snapshot.keys().any(|stored| titles_match(stored, title)) {
            debug!(title, "delete: no matching movie");
            return Ok(false);
        }

        let operation = Operation::DeleteMovie { title: title.to_string() };
        apply(&mut snapshot, &operation);
        wal.append(operation)?;

        debug!(title, "movie deleted");
        self.maybe_checkpoint(&mut wal, snapshot);
        Ok(true)
    }

    /// Set the rating of every record whose title matches case-insensitively
    pub fn update(&self, title: &str, rating: Rating) -> Result<bool> {
        validate_title(title)?;

        let mut wal = self.writer.lock();
        let mut snapshot = self.load_snapshot(wal.sequence)?;

        if !snapshot.keys().any(|stored| titles_match(stored, title)) {
            debug!(title, "update: no matching movie");
            return Ok(false);
        }

        let operation = Operation::UpdateRating { title: title.to_string(), rating };
        apply(&mut snapshot, &operation);
        wal.append(operation)?;

        debug!(title, %rating, "movie rating updated");
        self.maybe_checkpoint(&mut wal, snapshot);
        Ok(true)
    }

    /// Fold the WAL into a new checkpoint regardless of its length
    pub fn checkpoint(&self) -> Result<()> {
        let mut wal = self.writer.lock();
        let snapshot = self.load_snapshot(wal.sequence)?;
        self.write_checkpoint(&mut wal, snapshot)
    }

    /// Flush the log and release the directory lock
    pub fn close(self) -> Result<()> {
        self.writer.lock().sync()?;
        info!(path = %self.storage.base_dir.display(), "movie database closed");
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn load_snapshot(&self, sequence: u64) -> Result<Collection> {
        let checkpoint = Checkpoint::load(&self.storage)?.unwrap_or_else(Checkpoint::empty);
        if checkpoint.sequence != sequence {
            return Err(Error::corrupted(format!(
                "checkpoint sequence {} does not match WAL generation {}",
                checkpoint.sequence, sequence
            )));
        }

        let mut collection: Collection = checkpoint
            .records
            .into_iter()
            .map(|record| (record.title, record.details))
            .collect();

        let replay = WAL::read_entries(&self.storage.wal_path(sequence))?;
        for entry in &replay.entries {
            apply(&mut collection, &entry.operation);
        }

        Ok(collection)
    }

    /// The mutation is already in the log, so a failed checkpoint only
    /// postpones folding; the next mutation tries again
    fn maybe_checkpoint(&self, wal: &mut WAL, snapshot: Collection) {
        if wal.entry_count < self.config.checkpoint_interval.max(1) {
            return;
        }
        if let Err(e) = self.write_checkpoint(wal, snapshot) {
            warn!(error = %e, sequence = wal.sequence, "checkpoint failed, keeping current WAL");
        }
    }

    /// Leaves `wal` on the generation matching the checkpoint on disk,
    /// whichever step fails
    fn write_checkpoint(&self, wal: &mut WAL, snapshot: Collection) -> Result<()> {
        let next = wal.sequence + 1;
        let records = snapshot
            .into_iter()
            .map(|(title, details)| MovieRecord { title, details })
            .collect();

        wal.sync()?;
        let next_wal = WAL::open(&self.storage, next, wal.sync_mode)?;

        if let Err(e) = Checkpoint::new(next, records).and_then(|checkpoint| checkpoint.save(&self.storage)) {
            if let Err(cleanup) = fs::remove_file(&next_wal.path) {
                warn!(error = %cleanup, sequence = next, "could not remove unused WAL generation");
            }
            return Err(e);
        }

        let previous = std::mem::replace(wal, next_wal);
        // open() removes it later if this fails
        if let Err(e) = fs::remove_file(&previous.path) {
            warn!(error = %e, sequence = previous.sequence, "could not remove folded WAL generation");
        }
        Ok(())
    }
}

fn apply(collection: &mut Collection, operation: &Operation) {
    match operation {
        Operation::AddMovie(record) => {
            collection.insert(record.title.clone(), record.details.clone());
        }
        Operation::DeleteMovie { title } => {
            collection.retain(|stored, _| !titles_match(stored, title));
        }
        Operation::UpdateRating { title, rating } => {
            collection
                .iter_mut()
                .filter(|(stored, _)| titles_match(stored, title))
                .for_each(|(_, details)| details.rating = Some(*rating));
        }
    }
}
