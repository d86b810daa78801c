//! Tagged non-volatile parameter storage.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::EngineError;

/// Buffered tag/value storage.
///
/// `put` stages values in memory; nothing is durable until `commit`, which
/// is expensive and stops the audio path, so callers batch writes and
/// commit through [`crate::EngineHandle::commit_store`].
pub trait TagStore {
    /// Read the committed value of a tag, if present.
    fn get(&self, tag: u8) -> Option<i16>;

    /// Stage a value for a tag.
    fn put(&mut self, tag: u8, value: i16);

    /// Make all staged values durable.
    fn commit(&mut self) -> Result<(), EngineError>;
}

/// In-memory [`TagStore`], used in tests and as a stand-in backend.
#[derive(Debug, Default)]
pub struct MemoryTagStore {
    committed: BTreeMap<u8, i16>,
    staged: BTreeMap<u8, i16>,
    commits: usize,
    /// When set, the next commit fails (for exercising error paths).
    pub fail_next_commit: bool,
}

impl MemoryTagStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commits performed.
    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl TagStore for MemoryTagStore {
    fn get(&self, tag: u8) -> Option<i16> {
        self.committed.get(&tag).copied()
    }

    fn put(&mut self, tag: u8, value: i16) {
        self.staged.insert(tag, value);
    }

    fn commit(&mut self) -> Result<(), EngineError> {
        if self.fail_next_commit {
            self.fail_next_commit = false;
            return Err(EngineError::Store("simulated commit failure".into()));
        }
        let staged = std::mem::take(&mut self.staged);
        debug!(tags = staged.len(), "committing staged tags");
        self.committed.extend(staged);
        self.commits += 1;
        Ok(())
    }
}
