//! Concept2 logbook API: OAuth token grants, the current user and results

pub mod client;
pub mod types;

pub use client::LogbookClient;
pub use types::{LogbookUser, TokenData};
