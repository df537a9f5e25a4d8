pub mod icon;
pub mod match_result;

pub use icon::{IconId, IconRecord};
pub use match_result::{InputKind, MatchResult};
