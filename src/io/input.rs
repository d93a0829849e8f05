use std::path::Path;

use anyhow::{Context, Result};

use crate::error::InputError;
use crate::heuristics::HeuristicsConfig;
use crate::models::Roster;

/// Decode protocol bytes as UTF-8 text
///
/// Rejects invalid UTF-8 and input carrying NUL bytes, which only appear in
/// binary files (e.g. a PDF or DOC fetched instead of the text export).
pub fn decode_protocol_bytes(bytes: &[u8]) -> Result<&str, InputError> {
    let text = std::str::from_utf8(bytes).map_err(|e| InputError::InvalidEncoding {
        valid_up_to: e.valid_up_to(),
    })?;
    if let Some(offset) = text.find('\0') {
        return Err(InputError::NotText { offset });
    }
    Ok(text)
}

/// Read a protocol text file
pub fn read_protocol_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let text = decode_protocol_bytes(&bytes)
        .with_context(|| format!("Failed to decode protocol: {:?}", path))?;
    Ok(text.to_string())
}

/// Read a roster from a JSON file
///
/// Expected format:
/// ```json
/// [
///   {"person_id": 1, "name": "ראובן כהן", "aliases": ["רובי כהן"]},
///   {"person_id": 2, "name": "שמעון לוי"}
/// ]
/// ```
pub fn read_roster_file(path: &Path) -> Result<Roster> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_roster_json(&content)
}

/// Parse a roster JSON string
pub fn parse_roster_json(json: &str) -> Result<Roster> {
    serde_json::from_str(json).context("Failed to parse roster JSON")
}

/// Read heuristics rules from a JSON file; omitted fields keep their defaults
pub fn read_heuristics_file(path: &Path) -> Result<HeuristicsConfig> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    serde_json::from_str(&content).context("Failed to parse heuristics rules JSON")
}
