pub mod fetch;
pub mod input;
pub mod output;
pub mod store;

pub use fetch::*;
pub use input::*;
pub use output::*;
pub use store::*;
