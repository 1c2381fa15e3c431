pub mod clean;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod summary;
pub mod table;
pub mod verify;

pub use clean::{clean_table, run, CleanReport};
pub use config::{CleanConfig, OutputFormat, TemporalPolicy};
pub use error::{CleanError, Result};
pub use table::Table;
