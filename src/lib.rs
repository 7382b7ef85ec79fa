//! mdmatch Library
//!
//! Matches an exported list of article titles against a folder of Markdown
//! files and writes the joined table to a spreadsheet.

pub mod config;
pub mod core;
pub mod error;
pub mod library;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod utils;

pub use config::Config;
pub use error::{MdMatchError, MdResult};
pub use pipeline::{run, RunReport};
