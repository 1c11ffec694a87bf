mod common;
mod dump;
mod get;
mod keys;
mod merge;

pub use dump::Dump;
pub use get::Get;
pub use keys::Keys;
pub use merge::Merge;
