pub mod render;
pub mod reparse;
pub mod segment;

pub use render::*;
pub use reparse::*;
pub use segment::*;
