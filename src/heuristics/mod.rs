pub mod attendance;
pub mod headers;
pub mod mentions;
pub mod plenum;
pub mod speakers;

pub use attendance::*;
pub use headers::*;
pub use mentions::*;
pub use plenum::*;
pub use speakers::*;

use serde::{Deserialize, Serialize};

use crate::models::{ProtocolPart, Roster};

/// Configuration for all heuristics
///
/// Loaded from a JSON rules file; sections that are omitted keep their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// Header detection rules
    pub headers: HeaderRules,
    /// Speaker attribution settings
    pub attribution: AttributionConfig,
    /// Attendance block markers
    pub attendance: AttendanceConfig,
    /// Plenum session and vote markers
    pub plenum: PlenumMarkers,
}

/// Facts derived from a protocol beyond its parts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProtocolInsights {
    /// Roster members listed as present
    pub attended: Vec<u64>,
    /// Plenum session number, if the protocol states one
    pub plenum_meeting_number: Option<u32>,
    /// Numbered votes recorded in part headers
    pub votes: Vec<VoteReference>,
}

/// Derive attendance and plenum facts from a protocol and its parts
///
/// This runs after segmentation:
/// 1. Attendance blocks are matched against the roster
/// 2. The plenum session number is read from the parts' bodies
/// 3. Vote headers are collected with their numbers
pub fn collect_insights(
    text: &str,
    parts: &[ProtocolPart],
    roster: &Roster,
    config: &HeuristicsConfig,
) -> ProtocolInsights {
    ProtocolInsights {
        attended: find_attending_members(text, roster, &config.attendance),
        plenum_meeting_number: plenum_meeting_number(parts, &config.plenum),
        votes: vote_references(parts, &config.plenum),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RosterEntry;

    #[test]
    fn test_config_sections_default() {
        let json = r#"{"headers": {"max_header_chars": 40}, "plenum": {"vote_marker": "vote"}}"#;
        let config: HeuristicsConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.headers.max_header_chars, 40);
        assert_eq!(config.headers.first_person_prefixes, vec!["אני ".to_string()]);
        assert_eq!(config.plenum.vote_marker, "vote");
        assert_eq!(config.plenum.session_marker, "ישיבה");
        assert_eq!(config.attribution, AttributionConfig::default());
    }

    #[test]
    fn test_collect_insights() {
        let text = "נכחו:\nראובן כהן\n<הצבעה מס' 2>\nבעד - 3";
        let parts = vec![
            ProtocolPart::new(1, "נכחו:", "ראובן כהן"),
            ProtocolPart::new(2, "<הצבעה מס' 2>", "בעד - 3"),
        ];
        let roster = Roster::new(vec![RosterEntry::new(4, "ראובן כהן")]);

        let insights = collect_insights(text, &parts, &roster, &HeuristicsConfig::default());

        assert_eq!(insights.attended, vec![4]);
        assert_eq!(insights.plenum_meeting_number, None);
        assert_eq!(insights.votes, vec![VoteReference { order: 2, vote_number: 2 }]);
    }
}
