//! RowBot backend: links Concept2 logbook accounts and posts a rendered
//! report of every new workout to a Discord channel.

pub mod config;
pub mod logging;
pub mod model;
pub mod module;
pub mod pages;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
