//! t2press - Static site builder for Notion databases
//!
//! Queries a Notion database for published entries, renders each page's
//! block tree to HTML and writes a static site through a Tera theme.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::PressError;
