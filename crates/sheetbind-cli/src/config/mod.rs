//! Job configuration.
//!
//! An extraction job can be described in a TOML file passed with
//! `--config`:
//!
//! ```toml
//! [output]
//! format = "json"
//! pretty = true
//!
//! [[sheets]]
//! name = "People"
//!
//! [[sheets]]
//! name = "Orders"
//! columns = [2, 0]
//! ```
//!
//! Command-line flags take precedence over the file.

mod settings;


pub use settings::{JobConfig, OutputFormat, OutputSettings, SheetSettings};
