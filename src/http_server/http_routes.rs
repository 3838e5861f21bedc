pub mod config;
pub mod health;
pub mod merge;
pub mod playlists;
pub mod resolve;
