use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use super::segment::Segmenter;
use crate::heuristics::{collect_insights, HeuristicsConfig, ProtocolInsights};
use crate::io::{PartStore, RosterSource};
use crate::models::Meeting;

/// Result of reparsing one meeting
#[derive(Debug, Clone)]
pub struct ReparseResult {
    /// Number of parts stored for the meeting
    pub parts_stored: usize,
    /// Number of stored parts attributed to a roster entry
    pub attributed_parts: usize,
    /// Attendance and plenum facts found in the protocol
    pub insights: ProtocolInsights,
}

/// Regenerate the stored parts of a meeting from its protocol text
///
/// This stage:
/// 1. Takes one snapshot of the roster
/// 2. Segments the protocol and attributes speakers
/// 3. Records attendance on the meeting
/// 4. Replaces the meeting's stored parts
///
/// A meeting without protocol text is skipped and `Ok(None)` is returned.
pub fn reparse_meeting(
    meeting: &mut Meeting,
    roster_source: &dyn RosterSource,
    store: &mut dyn PartStore,
    config: &HeuristicsConfig,
    today: NaiveDate,
) -> Result<Option<ReparseResult>> {
    let Some(text) = meeting.protocol_text.as_deref().filter(|t| !t.trim().is_empty()) else {
        warn!("Meeting {} has no protocol text, skipping", meeting.meeting_id);
        return Ok(None);
    };

    let roster = roster_source
        .snapshot()
        .context("Failed to load roster snapshot")?;
    let segmenter =
        Segmenter::from_config(config, Some(&roster)).context("Invalid header rules")?;

    let segmentation = segmenter.segment(text);
    let insights = collect_insights(text, &segmentation.parts, &roster, config);

    let parts_stored = segmentation.parts.len();
    store
        .replace_parts(meeting.meeting_id, segmentation.parts)
        .with_context(|| format!("Failed to store parts of meeting {}", meeting.meeting_id))?;

    meeting.attended = insights.attended.clone();
    meeting.protocol_parts_update_date = Some(today);

    info!(
        "Meeting {}: stored {} parts, {} attendees",
        meeting.meeting_id,
        parts_stored,
        meeting.attended.len()
    );

    Ok(Some(ReparseResult {
        parts_stored,
        attributed_parts: segmentation.attributed_parts,
        insights,
    }))
}

/// Attach submitted protocol text and parse it, unless the meeting already has a protocol
///
/// Returns `Ok(None)` when an existing protocol was kept.
pub fn submit_protocol(
    meeting: &mut Meeting,
    text: &str,
    roster_source: &dyn RosterSource,
    store: &mut dyn PartStore,
    config: &HeuristicsConfig,
    today: NaiveDate,
) -> Result<Option<ReparseResult>> {
    if !meeting.attach_protocol_text(text) {
        info!(
            "Meeting {} already has a protocol, keeping it",
            meeting.meeting_id
        );
        return Ok(None);
    }
    reparse_meeting(meeting, roster_source, store, config, today)
}
