use serde::{Deserialize, Serialize};

/// Number of parts shown per page when a protocol is paginated
pub const DEFAULT_PARTS_PER_PAGE: u32 = 120;

/// Weak reference to a roster person, resolved by name matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerRef {
    /// Identifier of the person in the caller's roster
    pub person_id: u64,
    /// The roster name (or alias) that matched the header
    pub matched_name: String,
}

/// One segmented unit of a protocol: a header plus the text until the next header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolPart {
    /// 1-based position within the meeting
    pub order: u32,
    /// Trimmed header line, empty for text preceding the first header
    pub header: String,
    /// Body lines joined with '\n'
    pub body: String,
    /// Attributed speaker, if the header matched a roster name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<SpeakerRef>,
}

impl ProtocolPart {
    pub fn new(order: u32, header: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            order,
            header: header.into(),
            body: body.into(),
            speaker: None,
        }
    }

    /// Whether this part carries a recognised header (not the synthetic leading one)
    pub fn has_header(&self) -> bool {
        !self.header.is_empty()
    }

    /// Header with angle brackets, trailing colons and surrounding whitespace removed
    pub fn speaker_label(&self) -> &str {
        speaker_label(&self.header)
    }

    /// Where this part is displayed when the protocol is paginated
    pub fn location(&self, meeting_id: u64, parts_per_page: u32) -> PartLocation {
        let per_page = parts_per_page.max(1);
        PartLocation {
            page: 1 + self.order.saturating_sub(1) / per_page,
            anchor: format!("speech-{}-{}", meeting_id, self.order),
            is_first: self.order <= 1,
        }
    }
}

/// Strip the decoration around a header so only the label text remains
pub fn speaker_label(header: &str) -> &str {
    let mut label = header.trim();
    if let Some(inner) = label
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
    {
        label = inner.trim();
    }
    label.trim_end_matches(|c: char| c == ':' || c.is_whitespace())
}

/// Page and anchor of a part in a paginated protocol view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartLocation {
    /// 1-based page number
    pub page: u32,
    /// Fragment identifier, `speech-<meeting>-<order>`
    pub anchor: String,
    /// The first part links to the meeting itself
    pub is_first: bool,
}

impl PartLocation {
    /// Build a link relative to the meeting's own URL
    pub fn href(&self, meeting_url: &str) -> String {
        if self.is_first {
            meeting_url.to_string()
        } else if self.page == 1 {
            format!("{}#{}", meeting_url, self.anchor)
        } else {
            format!("{}?page={}#{}", meeting_url, self.page, self.anchor)
        }
    }
}
