use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{speaker_label, ProtocolPart, Roster, SpeakerRef};

/// Configuration for roster-based speaker attribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionConfig {
    /// Also match when the header names only part of a longer roster name,
    /// e.g. a header of just the family name
    pub match_partial_names: bool,
    /// Shortest label (in characters) allowed to match part of a name
    pub min_partial_chars: usize,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            match_partial_names: true,
            min_partial_chars: 2,
        }
    }
}

#[derive(Debug, Clone)]
struct NameCandidate {
    person_id: u64,
    /// Name as written in the roster
    display: String,
    /// Case-folded, whitespace-collapsed form
    normalized: String,
    words: Vec<String>,
    char_len: usize,
}

/// Resolves header lines to roster entries
#[derive(Debug, Clone)]
pub struct SpeakerMatcher {
    candidates: Vec<NameCandidate>,
    config: AttributionConfig,
}

impl SpeakerMatcher {
    /// Snapshot the roster's names and aliases, in roster order
    pub fn new(roster: &Roster, config: &AttributionConfig) -> Self {
        let candidates = roster
            .entries
            .iter()
            .flat_map(|entry| {
                entry.names().filter_map(move |name| {
                    let normalized = normalize_name(name);
                    if normalized.is_empty() {
                        return None;
                    }
                    Some(NameCandidate {
                        person_id: entry.person_id,
                        display: name.trim().to_string(),
                        words: normalized.split(' ').map(str::to_string).collect(),
                        char_len: normalized.chars().count(),
                        normalized,
                    })
                })
            })
            .collect();

        Self {
            candidates,
            config: config.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Find the roster entry a header refers to
    ///
    /// The longest matching name wins; equal lengths keep roster order.
    pub fn resolve(&self, header: &str) -> Option<SpeakerRef> {
        let label = normalize_name(speaker_label(header));
        if label.is_empty() {
            return None;
        }
        let label_words: Vec<&str> = label.split(' ').collect();
        let allow_partial =
            self.config.match_partial_names && label.chars().count() >= self.config.min_partial_chars;

        let mut best: Option<&NameCandidate> = None;
        for candidate in &self.candidates {
            let matched = label.contains(candidate.normalized.as_str())
                || (allow_partial && contains_word_sequence(&candidate.words, &label_words));
            if !matched {
                continue;
            }
            if best.is_none_or(|b| candidate.char_len > b.char_len) {
                best = Some(candidate);
            }
        }

        best.map(|c| SpeakerRef {
            person_id: c.person_id,
            matched_name: c.display.clone(),
        })
    }

    /// Fill in `speaker` for every part; returns how many were attributed
    pub fn attribute(&self, parts: &mut [ProtocolPart]) -> usize {
        let mut attributed = 0;
        for part in parts.iter_mut() {
            part.speaker = if part.has_header() {
                self.resolve(&part.header)
            } else {
                None
            };
            if let Some(speaker) = &part.speaker {
                debug!(
                    "Part {} attributed to {} ({})",
                    part.order, speaker.matched_name, speaker.person_id
                );
                attributed += 1;
            }
        }
        attributed
    }
}

/// Case-fold and collapse runs of whitespace to a single space
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `needle` occurs as a contiguous run of whole words in `haystack`
fn contains_word_sequence(haystack: &[String], needle: &[&str]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|w| w.iter().zip(needle).all(|(a, b)| a == b))
}
