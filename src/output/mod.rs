//
//  devops-state
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Terminal rendering for `dvs` commands.
//!
//! - **Table format**: human-readable tables and status lines
//! - **JSON format**: pretty-printed JSON on stdout for scripting
//!
//! Status lines (`✓`, `!`, `✗`) go to stdout in table mode and are
//! suppressed in JSON mode so stdout stays parseable. Errors always go to
//! stderr.

mod table;

pub use table::*;

use console::style;
use serde::Serialize;

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tables and colored status lines
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Writes command results in the selected format.
///
/// ```rust,ignore
/// use devops_state::output::OutputWriter;
///
/// let writer = OutputWriter::new(global.output_format());
/// writer.write_success("Wiped state file");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// Prints `value` as pretty JSON.
    pub fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn write_success(&self, msg: &str) {
        if !self.is_json() {
            println!("{} {}", style("✓").green(), msg);
        }
    }

    pub fn write_info(&self, msg: &str) {
        if !self.is_json() {
            println!("{}", msg);
        }
    }

    pub fn write_warning(&self, msg: &str) {
        if !self.is_json() {
            println!("{} {}", style("!").yellow(), msg);
        }
    }

    pub fn write_error(&self, msg: &str) {
        eprintln!("{} {}", style("✗").red(), msg);
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}
