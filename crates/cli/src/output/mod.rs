//! Output formatting
//!
//! Responses are printed either as pretty JSON (`--json`) or rendered as
//! tables for people.

mod formatter;

pub use formatter::{Formatter, render_value};

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Suppress non-error output
    pub quiet: bool,
}
