use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{ProtocolPart, SpeakerRef};

/// Machine-readable output format
#[derive(Debug, Clone, Serialize)]
pub struct MachineProtocol {
    /// Meeting the parts belong to, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_id: Option<u64>,
    /// Parts in protocol order
    pub parts: Vec<ProtocolPart>,
    /// Summary of the segmentation
    pub metadata: ProtocolMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProtocolMetadata {
    pub total_parts: usize,
    pub header_parts: usize,
    pub attributed_parts: usize,
    /// Distinct speakers, ordered by person id
    pub speakers: Vec<SpeakerSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SpeakerSummary {
    pub person_id: u64,
    pub name: String,
}

impl MachineProtocol {
    /// Create from segmented parts
    pub fn from_parts(meeting_id: Option<u64>, parts: &[ProtocolPart]) -> Self {
        let speakers: BTreeSet<SpeakerSummary> = parts
            .iter()
            .filter_map(|p| p.speaker.as_ref())
            .map(|s: &SpeakerRef| SpeakerSummary {
                person_id: s.person_id,
                name: s.matched_name.clone(),
            })
            .collect();

        let metadata = ProtocolMetadata {
            total_parts: parts.len(),
            header_parts: parts.iter().filter(|p| p.has_header()).count(),
            attributed_parts: parts.iter().filter(|p| p.speaker.is_some()).count(),
            speakers: speakers.into_iter().collect(),
        };

        Self {
            meeting_id,
            parts: parts.to_vec(),
            metadata,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable protocol format
pub struct HumanProtocol<'a> {
    parts: &'a [ProtocolPart],
}

impl<'a> HumanProtocol<'a> {
    pub fn new(parts: &'a [ProtocolPart]) -> Self {
        Self { parts }
    }

    /// Format the parts as human-readable text
    pub fn format(&self) -> String {
        let mut output = String::new();

        for part in self.parts {
            output.push_str(&format!("[{}]", part.order));
            if part.has_header() {
                output.push(' ');
                output.push_str(&part.header);
            }
            if let Some(speaker) = &part.speaker {
                output.push_str(&format!(" ({})", speaker.matched_name));
            }
            output.push('\n');

            if !part.body.is_empty() {
                output.push_str(&part.body);
                output.push('\n');
            }
            output.push('\n');
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}
