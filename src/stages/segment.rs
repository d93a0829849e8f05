use tracing::{debug, info};

use crate::error::InputError;
use crate::heuristics::{HeaderClassifier, HeuristicsConfig, SpeakerMatcher};
use crate::io::decode_protocol_bytes;
use crate::models::{ProtocolPart, Roster};

/// Result of segmenting one protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationResult {
    /// Parts in protocol order, `order` running 1..=N
    pub parts: Vec<ProtocolPart>,
    /// Number of parts opened by a recognised header
    pub header_parts: usize,
    /// Number of parts attributed to a roster entry
    pub attributed_parts: usize,
}

/// Splits protocol text into parts and attributes speakers
///
/// Holds only immutable compiled rules and a roster snapshot, so one instance
/// can serve many meetings.
#[derive(Debug, Clone)]
pub struct Segmenter {
    classifier: HeaderClassifier,
    matcher: Option<SpeakerMatcher>,
}

impl Segmenter {
    pub fn new(classifier: HeaderClassifier, matcher: Option<SpeakerMatcher>) -> Self {
        Self {
            classifier,
            matcher: matcher.filter(|m| !m.is_empty()),
        }
    }

    /// Compile the configured rules and snapshot the roster
    pub fn from_config(
        config: &HeuristicsConfig,
        roster: Option<&Roster>,
    ) -> Result<Self, regex::Error> {
        let classifier = HeaderClassifier::new(&config.headers)?;
        let matcher = roster.map(|r| SpeakerMatcher::new(r, &config.attribution));
        Ok(Self::new(classifier, matcher))
    }

    /// Segment already-decoded protocol text
    pub fn segment(&self, text: &str) -> SegmentationResult {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        self.segment_lines(text.lines())
    }

    /// Decode raw bytes and segment them
    pub fn segment_bytes(&self, bytes: &[u8]) -> Result<SegmentationResult, InputError> {
        let text = decode_protocol_bytes(bytes)?;
        Ok(self.segment(text))
    }

    /// Segment a sequence of lines. Blank input produces no parts.
    pub fn segment_lines<'a, I>(&self, lines: I) -> SegmentationResult
    where
        I: IntoIterator<Item = &'a str>,
    {
        let lines: Vec<&str> = lines.into_iter().collect();
        if lines.iter().all(|l| l.trim().is_empty()) {
            debug!("Empty protocol text, no parts produced");
            return self.finish(Vec::new());
        }
        let parts = split_parts(lines, &self.classifier);
        self.finish(parts)
    }

    fn finish(&self, mut parts: Vec<ProtocolPart>) -> SegmentationResult {
        let attributed_parts = match &self.matcher {
            Some(matcher) => matcher.attribute(&mut parts),
            None => 0,
        };
        let header_parts = parts.iter().filter(|p| p.has_header()).count();

        info!(
            "Segmented protocol into {} parts ({} with headers, {} attributed)",
            parts.len(),
            header_parts,
            attributed_parts
        );

        SegmentationResult {
            parts,
            header_parts,
            attributed_parts,
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(HeaderClassifier::default(), None)
    }
}

/// Group lines into parts, opening a new part at every header line
///
/// Lines before the first header form a part with an empty header. Body lines
/// are kept verbatim and joined with '\n'.
pub fn split_parts<'a, I>(lines: I, classifier: &HeaderClassifier) -> Vec<ProtocolPart>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parts = Vec::new();
    let mut header = String::new();
    let mut body: Vec<&'a str> = Vec::new();

    for line in lines {
        if classifier.is_header(line) {
            flush_part(&mut parts, &mut header, &mut body);
            header = line.trim().to_string();
            debug!("Header at part {}: {}", parts.len() + 1, header);
        } else {
            body.push(line);
        }
    }

    // The last part is kept even when its body is empty
    flush_part(&mut parts, &mut header, &mut body);

    parts
}

fn flush_part(parts: &mut Vec<ProtocolPart>, header: &mut String, body: &mut Vec<&str>) {
    if header.is_empty() && body.is_empty() {
        return;
    }
    let order = parts.len() as u32 + 1;
    parts.push(ProtocolPart::new(order, std::mem::take(header), body.join("\n")));
    body.clear();
}

/// Segment with the default rules, attributing speakers from `roster`
pub fn segment_protocol(text: &str, roster: Option<&Roster>) -> SegmentationResult {
    let matcher = roster.map(|r| SpeakerMatcher::new(r, &Default::default()));
    Segmenter::new(HeaderClassifier::default(), matcher).segment(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::legitimate_header;
    use crate::models::RosterEntry;

    const PROTOCOL: &str = "הכנסת העשרים\n\
        מושב שני\n\
        <פתיחת הישיבה>\n\
        היו\"ר ראובן כהן:\n\
        בוקר טוב, אני פותח את הישיבה.\n\
        על סדר היום הנושאים הבאים:\n\
        1. הצעת חוק התחבורה.\n\
        שמעון לוי:\n\
        תודה.\n\
        אני רוצה לומר:\n\
        זה חשוב.\n\
        כהן:\n\
        <הצבעה מס' 1>\n";

    fn roster() -> Roster {
        Roster::new(vec![
            RosterEntry::new(1, "כהן"),
            RosterEntry::new(2, "ראובן כהן"),
            RosterEntry::new(3, "שמעון לוי"),
        ])
    }

    fn segment(text: &str) -> SegmentationResult {
        segment_protocol(text, Some(&roster()))
    }

    #[test]
    fn test_example_lines() {
        let result = Segmenter::default().segment_lines(["<פתיחה>", "דובר ראשון:", "עוד טקסט"]);

        assert_eq!(result.parts.len(), 2);
        assert_eq!(result.parts[0], ProtocolPart::new(1, "<פתיחה>", ""));
        assert_eq!(result.parts[1], ProtocolPart::new(2, "דובר ראשון:", "עוד טקסט"));
    }

    #[test]
    fn test_colon_inside_line_is_body() {
        let result = Segmenter::default().segment_lines(["<פתיחה>", "דובר ראשון: טקסט לדוגמה", "עוד טקסט"]);

        assert_eq!(result.parts.len(), 1);
        assert_eq!(result.parts[0].body, "דובר ראשון: טקסט לדוגמה\nעוד טקסט");
    }

    #[test]
    fn test_protocol_parts() {
        let result = segment(PROTOCOL);
        let headers: Vec<&str> = result.parts.iter().map(|p| p.header.as_str()).collect();

        assert_eq!(
            headers,
            vec![
                "",
                "<פתיחת הישיבה>",
                "היו\"ר ראובן כהן:",
                "שמעון לוי:",
                "כהן:",
                "<הצבעה מס' 1>",
            ]
        );
        assert_eq!(result.parts[0].body, "הכנסת העשרים\nמושב שני");
        assert_eq!(
            result.parts[2].body,
            "בוקר טוב, אני פותח את הישיבה.\nעל סדר היום הנושאים הבאים:\n1. הצעת חוק התחבורה."
        );
        assert_eq!(result.parts[3].body, "תודה.\nאני רוצה לומר:\nזה חשוב.");
        assert_eq!(result.parts[5].body, "");
        assert_eq!(result.header_parts, 5);
    }

    #[test]
    fn test_speaker_attribution() {
        let result = segment(PROTOCOL);
        let speakers: Vec<Option<u64>> = result
            .parts
            .iter()
            .map(|p| p.speaker.as_ref().map(|s| s.person_id))
            .collect();

        assert_eq!(speakers, vec![None, None, Some(2), Some(3), Some(2), None]);
        assert_eq!(result.attributed_parts, 3);
    }

    #[test]
    fn test_orders_are_contiguous() {
        for text in [PROTOCOL, "רק טקסט", "א:\nב:\nג:", "<א>\n\n<ב>\n"] {
            let result = segment(text);
            let orders: Vec<u32> = result.parts.iter().map(|p| p.order).collect();
            let expected: Vec<u32> = (1..=result.parts.len() as u32).collect();
            assert_eq!(orders, expected, "orders for {:?}", text);
        }
    }

    #[test]
    fn test_bodies_reconstruct_non_header_lines() {
        // Every header here has at least one body line, blank ones included
        let text = "פתיח\n\n<פתיחה>\n\nהיו\"ר ראובן כהן:\nבוקר טוב.\n\nעוד משפט.\nשמעון לוי:\nתודה.\n";
        let non_header: Vec<&str> = text.lines().filter(|l| !legitimate_header(l)).collect();
        let result = segment(text);
        let bodies: Vec<&str> = result.parts.iter().map(|p| p.body.as_str()).collect();

        assert_eq!(result.parts.len(), 4);
        assert_eq!(bodies, vec!["פתיח\n", "", "בוקר טוב.\n\nעוד משפט.", "תודה."]);
        assert_eq!(bodies.join("\n"), non_header.join("\n"));
    }

    #[test]
    fn test_blank_lines_produce_no_parts() {
        let segmenter = Segmenter::default();
        assert!(segmenter.segment_lines(["", "  "]).parts.is_empty());
        assert!(segmenter.segment_lines(Vec::<&str>::new()).parts.is_empty());
        assert_eq!(segmenter.segment_lines(["", "<פתיחה>"]).parts.len(), 2);
    }

    #[test]
    fn test_empty_text() {
        assert!(segment("").parts.is_empty());
        assert!(segment("  \n\n \t").parts.is_empty());
        assert!(Segmenter::default().segment_bytes(b"").unwrap().parts.is_empty());
    }

    #[test]
    fn test_leading_body_only() {
        let result = segment("שורה ראשונה\nשורה שנייה");
        assert_eq!(result.parts, vec![ProtocolPart::new(1, "", "שורה ראשונה\nשורה שנייה")]);
    }

    #[test]
    fn test_crlf_and_bom() {
        let result = segment("\u{feff}<פתיחה>\r\nטקסט\r\n");
        assert_eq!(result.parts, vec![ProtocolPart::new(1, "<פתיחה>", "טקסט")]);
    }

    #[test]
    fn test_idempotent() {
        let first = segment(PROTOCOL);
        let second = segment(PROTOCOL);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.parts).unwrap(),
            serde_json::to_string(&second.parts).unwrap()
        );
    }

    #[test]
    fn test_invalid_bytes() {
        let err = Segmenter::default()
            .segment_bytes(&[0x3c, 0xff, 0xfe, 0x3e])
            .unwrap_err();
        assert_eq!(err, InputError::InvalidEncoding { valid_up_to: 1 });

        let err = Segmenter::default().segment_bytes(b"abc\0def").unwrap_err();
        assert_eq!(err, InputError::NotText { offset: 3 });
    }

    #[test]
    fn test_from_config_uses_rules() {
        let mut config = HeuristicsConfig::default();
        config.headers.max_header_chars = 5;
        let segmenter = Segmenter::from_config(&config, None).unwrap();

        let result = segmenter.segment("קצר:\nארוך מדי בהרבה:\nסוף");
        assert_eq!(result.parts.len(), 1);
        assert_eq!(result.parts[0].header, "קצר:");
        assert_eq!(result.parts[0].body, "ארוך מדי בהרבה:\nסוף");
    }

    #[test]
    fn test_empty_roster_attributes_nothing() {
        let result = segment_protocol(PROTOCOL, Some(&Roster::default()));
        assert_eq!(result.attributed_parts, 0);
        assert!(result.parts.iter().all(|p| p.speaker.is_none()));
    }
}
