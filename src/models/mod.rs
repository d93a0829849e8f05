pub mod meeting;
pub mod part;
pub mod roster;

pub use meeting::*;
pub use part::*;
pub use roster::*;
