pub mod error;
pub mod heuristics;
pub mod io;
pub mod models;
pub mod stages;

pub use error::InputError;
pub use heuristics::{
    collect_insights, legitimate_header, AttributionConfig, HeaderClassifier, HeaderRules,
    HeuristicsConfig, ProtocolInsights, SpeakerMatcher,
};
pub use io::{
    decode_protocol_bytes, read_heuristics_file, read_protocol_file, read_roster_file,
    HumanProtocol, MachineProtocol, MemoryPartStore, PartStore, RosterSource,
};
pub use models::{Meeting, ProtocolPart, Roster, RosterEntry, SpeakerRef};
pub use stages::{
    render_parts, reparse_meeting, segment_protocol, submit_protocol, RenderConfig,
    SegmentationResult, Segmenter,
};
