use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::ProtocolPart;

static TRAILING_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" (\d+)$").expect("valid trailing number regex"));

/// Words marking plenum session numbers and votes in a protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlenumMarkers {
    /// Precedes the session number written in Hebrew numerals
    pub session_marker: String,
    /// Appears in the header of a part describing a vote
    pub vote_marker: String,
}

impl Default for PlenumMarkers {
    fn default() -> Self {
        Self {
            session_marker: "ישיבה".to_string(),
            vote_marker: "הצבעה".to_string(),
        }
    }
}

/// A protocol part that records a numbered vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteReference {
    /// Order of the part holding the vote
    pub order: u32,
    /// Vote number as written at the end of the header
    pub vote_number: u32,
}

/// Value of a Hebrew letter used as a numeral
fn letter_value(c: char) -> Option<u32> {
    let value = match c {
        'א' => 1,
        'ב' => 2,
        'ג' => 3,
        'ד' => 4,
        'ה' => 5,
        'ו' => 6,
        'ז' => 7,
        'ח' => 8,
        'ט' => 9,
        'י' => 10,
        'כ' | 'ך' => 20,
        'ל' => 30,
        'מ' | 'ם' => 40,
        'נ' | 'ן' => 50,
        'ס' => 60,
        'ע' => 70,
        'פ' | 'ף' => 80,
        'צ' | 'ץ' => 90,
        'ק' => 100,
        'ר' => 200,
        'ש' => 300,
        'ת' => 400,
        _ => return None,
    };
    Some(value)
}

/// Read a number written in Hebrew numerals, e.g. `ק"ג` = 103
///
/// Geresh, gershayim and quote marks are ignored. Any other non-letter makes
/// the input invalid.
pub fn gematria_to_int(text: &str) -> Option<u32> {
    let mut total = 0u32;
    let mut letters = 0usize;
    for c in text.trim().chars() {
        if matches!(c, '"' | '\'' | '׳' | '״' | '”' | '’' | '`') {
            continue;
        }
        total = total.checked_add(letter_value(c)?)?;
        letters += 1;
    }
    (letters > 0).then_some(total)
}

/// Session number of a plenum meeting, read from the first part mentioning it
pub fn plenum_meeting_number(parts: &[ProtocolPart], markers: &PlenumMarkers) -> Option<u32> {
    if markers.session_marker.is_empty() {
        return None;
    }
    let needle = format!("{} ", markers.session_marker);
    let part = parts.iter().find(|p| p.body.contains(&markers.session_marker))?;

    part.body.lines().find_map(|line| {
        let (_, rest) = line.split_once(needle.as_str())?;
        let token = rest.split_whitespace().next()?;
        gematria_to_int(token)
    })
}

/// Parts whose header names a vote and ends with its number
pub fn vote_references(parts: &[ProtocolPart], markers: &PlenumMarkers) -> Vec<VoteReference> {
    if markers.vote_marker.is_empty() {
        return Vec::new();
    }
    parts
        .iter()
        .filter(|p| p.header.contains(&markers.vote_marker))
        .filter_map(|p| {
            let caps = TRAILING_NUMBER_RE.captures(p.speaker_label())?;
            let vote_number = caps[1].parse().ok()?;
            Some(VoteReference {
                order: p.order,
                vote_number,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gematria() {
        assert_eq!(gematria_to_int("קג"), Some(103));
        assert_eq!(gematria_to_int("ק\"ג"), Some(103));
        assert_eq!(gematria_to_int("תשע״ה"), Some(775));
        assert_eq!(gematria_to_int("ט\"ו"), Some(15));
        assert_eq!(gematria_to_int("ך"), Some(20));
        assert_eq!(gematria_to_int(""), None);
        assert_eq!(gematria_to_int("\"\""), None);
        assert_eq!(gematria_to_int("12"), None);
    }

    #[test]
    fn test_plenum_meeting_number() {
        let parts = vec![
            ProtocolPart::new(1, "", "הכנסת העשרים\nהישיבה ק\"ג של הכנסת העשרים\nיום שני"),
            ProtocolPart::new(2, "היו\"ר:", "ישיבה רגילה"),
        ];
        assert_eq!(
            plenum_meeting_number(&parts, &PlenumMarkers::default()),
            Some(103)
        );
    }

    #[test]
    fn test_plenum_meeting_number_missing() {
        let parts = vec![ProtocolPart::new(1, "היו\"ר:", "שלום לכולם")];
        assert_eq!(plenum_meeting_number(&parts, &PlenumMarkers::default()), None);
    }

    #[test]
    fn test_vote_references() {
        let parts = vec![
            ProtocolPart::new(1, "<פתיחה>", ""),
            ProtocolPart::new(2, "הצבעה מס' 3", "בעד - 40"),
            ProtocolPart::new(3, "<הצבעה מס' 4>", "בעד - 12"),
            ProtocolPart::new(4, "הצבעה:", "ללא מספר"),
            ProtocolPart::new(5, "היו\"ר 7:", "לא הצבעה"),
        ];
        let refs = vote_references(&parts, &PlenumMarkers::default());
        assert_eq!(
            refs,
            vec![
                VoteReference { order: 2, vote_number: 3 },
                VoteReference { order: 3, vote_number: 4 },
            ]
        );
    }
}
