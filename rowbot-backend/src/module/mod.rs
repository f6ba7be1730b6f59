pub mod discord;
pub mod handler;
pub mod logbook;
pub mod report;
