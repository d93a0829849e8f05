use serde::{Deserialize, Serialize};
use tracing::debug;

use super::speakers::normalize_name;
use crate::models::Roster;

/// Markers delimiting the attendance block of a protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceConfig {
    /// A line beginning with one of these opens an attendance block
    pub section_start_markers: Vec<String>,
    /// A line beginning with one of these closes the current block
    pub section_end_markers: Vec<String>,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            section_start_markers: ["חברי הוועדה:", "חברי הכנסת:", "נכחו:"]
                .into_iter()
                .map(String::from)
                .collect(),
            section_end_markers: [
                "מוזמנים:",
                "ייעוץ משפטי:",
                "יועץ משפטי:",
                "יועצת משפטית:",
                "מנהלת הוועדה:",
                "מנהל הוועדה:",
                "רישום פרלמנטרי:",
                "קצרנית פרלמנטרית:",
                "סדר היום:",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Byte length of the first marker the line starts with
fn starts_with_any(line: &str, markers: &[String]) -> Option<usize> {
    markers
        .iter()
        .find(|m| !m.is_empty() && line.starts_with(m.as_str()))
        .map(|m| m.len())
}

/// Collect the text of every attendance block, lines joined with '\n'
fn attendance_blocks(text: &str, config: &AttendanceConfig) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(marker_len) = starts_with_any(trimmed, &config.section_start_markers) {
            if let Some(lines) = current.take() {
                blocks.push(lines.join("\n"));
            }
            // Names may follow the marker on the same line
            current = Some(vec![&trimmed[marker_len..]]);
            continue;
        }

        // An agenda marker such as "<פתיחה>" also ends the block
        let agenda_marker = trimmed.starts_with('<') && trimmed.ends_with('>');
        if agenda_marker || starts_with_any(trimmed, &config.section_end_markers).is_some() {
            if let Some(lines) = current.take() {
                blocks.push(lines.join("\n"));
            }
            continue;
        }

        if let Some(lines) = current.as_mut() {
            lines.push(trimmed);
        }
    }

    if let Some(lines) = current {
        blocks.push(lines.join("\n"));
    }

    blocks
}

/// Where a roster name was found inside an attendance block
#[derive(Debug)]
struct NameOccurrence {
    person_id: u64,
    block: usize,
    start: usize,
    end: usize,
}

impl NameOccurrence {
    /// Whether `self` is a longer match of another member spanning `other`
    fn covers(&self, other: &NameOccurrence) -> bool {
        self.person_id != other.person_id
            && self.block == other.block
            && self.start <= other.start
            && other.end <= self.end
            && self.end - self.start > other.end - other.start
    }
}

/// Find roster members listed as present in the protocol
///
/// Returns person ids in roster order, without duplicates. A protocol with no
/// attendance block yields an empty list.
pub fn find_attending_members(text: &str, roster: &Roster, config: &AttendanceConfig) -> Vec<u64> {
    let blocks: Vec<String> = attendance_blocks(text, config)
        .iter()
        .map(|b| normalize_name(b))
        .collect();

    if blocks.is_empty() {
        debug!("No attendance block found");
        return Vec::new();
    }

    let mut occurrences = Vec::new();
    for (block, block_text) in blocks.iter().enumerate() {
        for entry in &roster.entries {
            for name in entry.names() {
                let name = normalize_name(name);
                if name.is_empty() {
                    continue;
                }
                occurrences.extend(block_text.match_indices(name.as_str()).map(|(start, m)| {
                    NameOccurrence {
                        person_id: entry.person_id,
                        block,
                        start,
                        end: start + m.len(),
                    }
                }));
            }
        }
    }

    // A name found only inside a longer listed name credits the longer entry
    let mut attended = Vec::new();
    for entry in &roster.entries {
        if attended.contains(&entry.person_id) {
            continue;
        }
        let present = occurrences
            .iter()
            .filter(|o| o.person_id == entry.person_id)
            .any(|o| !occurrences.iter().any(|other| other.covers(o)));
        if present {
            attended.push(entry.person_id);
        }
    }

    debug!("{} roster members found in attendance blocks", attended.len());
    attended
}
