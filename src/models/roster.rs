use serde::{Deserialize, Serialize};

/// A known person that may be identified as a speaker or attendee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Identifier of the person in the calling system
    pub person_id: u64,
    /// Canonical display name
    pub name: String,
    /// Alternative spellings or forms the person may appear under
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl RosterEntry {
    pub fn new(person_id: u64, name: impl Into<String>) -> Self {
        Self {
            person_id,
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// The canonical name followed by every alias
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Read-only snapshot of known names used for attribution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up an entry by person id
    pub fn get(&self, person_id: u64) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.person_id == person_id)
    }

    /// Build a roster from a comma-separated list of names
    ///
    /// Person ids are assigned sequentially from 1 in list order.
    pub fn from_names_string(input: &str) -> Self {
        let entries = split_names(input)
            .into_iter()
            .enumerate()
            .map(|(i, name)| RosterEntry::new(i as u64 + 1, name))
            .collect();
        Self { entries }
    }
}

/// Split a comma-separated name list, dropping blanks
pub fn split_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
