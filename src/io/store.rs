use std::collections::HashMap;

use anyhow::Result;

use crate::models::{ProtocolPart, Roster};

/// Storage for the parts of each meeting
///
/// Parts are never merged: storing a meeting's parts replaces whatever was
/// stored for it before. Implementations backed by a database should perform
/// the delete and insert in one transaction.
pub trait PartStore {
    /// Replace all stored parts of `meeting_id` with `parts`
    fn replace_parts(&mut self, meeting_id: u64, parts: Vec<ProtocolPart>) -> Result<()>;

    /// Parts currently stored for a meeting, in order
    fn parts(&self, meeting_id: u64) -> Option<&[ProtocolPart]>;
}

/// Supplies the roster used for attribution
///
/// Queried once per reparse; the returned snapshot is not refreshed while a
/// protocol is being segmented.
pub trait RosterSource {
    fn snapshot(&self) -> Result<Roster>;
}

impl RosterSource for Roster {
    fn snapshot(&self) -> Result<Roster> {
        Ok(self.clone())
    }
}

/// In-memory part storage
#[derive(Debug, Default)]
pub struct MemoryPartStore {
    meetings: HashMap<u64, Vec<ProtocolPart>>,
}

impl MemoryPartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meetings with stored parts
    pub fn meeting_count(&self) -> usize {
        self.meetings.len()
    }
}

impl PartStore for MemoryPartStore {
    fn replace_parts(&mut self, meeting_id: u64, mut parts: Vec<ProtocolPart>) -> Result<()> {
        parts.sort_by_key(|p| p.order);
        self.meetings.insert(meeting_id, parts);
        Ok(())
    }

    fn parts(&self, meeting_id: u64) -> Option<&[ProtocolPart]> {
        self.meetings.get(&meeting_id).map(Vec::as_slice)
    }
}
