use chrono::NaiveDate;

/// A committee meeting as seen by the reparse stage
#[derive(Debug, Clone)]
pub struct Meeting {
    pub meeting_id: u64,
    pub committee_id: u64,
    /// Date the meeting took place
    pub date: NaiveDate,
    /// Raw protocol text, if it has been downloaded or submitted
    pub protocol_text: Option<String>,
    /// Where the protocol text was obtained from
    pub src_url: Option<String>,
    /// When the protocol parts were last parsed and stored
    pub protocol_parts_update_date: Option<NaiveDate>,
    /// Person ids found in the protocol's attendance block
    pub attended: Vec<u64>,
}

impl Meeting {
    pub fn new(meeting_id: u64, committee_id: u64, date: NaiveDate) -> Self {
        Self {
            meeting_id,
            committee_id,
            date,
            protocol_text: None,
            src_url: None,
            protocol_parts_update_date: None,
            attended: Vec::new(),
        }
    }

    pub fn has_protocol(&self) -> bool {
        self.protocol_text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// Store submitted protocol text unless the meeting already has one
    ///
    /// Returns true when the text was attached.
    pub fn attach_protocol_text(&mut self, text: impl Into<String>) -> bool {
        if self.has_protocol() {
            return false;
        }
        self.protocol_text = Some(text.into());
        true
    }
}
