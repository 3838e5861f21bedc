pub mod merge;
pub mod retry;
pub mod tidal;
