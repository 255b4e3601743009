//
//  devops-state
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! `comfy_table` tables with UTF-8 borders and dynamic column widths.
//!
//! ```rust,ignore
//! use devops_state::output::TableBuilder;
//!
//! TableBuilder::new()
//!     .headers(["TYPE", "ID", "NAME"])
//!     .row(["Repository", "3f2a", "web"])
//!     .print();
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Creates an empty table with the standard preset.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Fluent builder over [`create_table`].
///
/// Headers are cyan when color is enabled.
pub struct TableBuilder {
    table: Table,
    color: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            table: create_table(),
            color: console::colors_enabled(),
        }
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        if self.color {
            self.table
                .set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
        } else {
            self.table.set_header(headers);
        }
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        self.table.add_row(row);
        self
    }

    pub fn rows<I, R, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for row in rows {
            self = self.row(row);
        }
        self
    }

    pub fn print(self) {
        println!("{}", self.table);
    }

    pub fn build(self) -> Table {
        self.table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Colors a remote status by meaning.
///
/// Matching is case-insensitive; unknown values are returned as is.
pub fn format_status(status: &str, color: bool) -> String {
    if !color {
        return status.to_string();
    }

    use console::style;
    match status.to_lowercase().as_str() {
        "active" | "inprogress" | "notstarted" => style(status).green().to_string(),
        "completed" | "succeeded" => style(status).blue().to_string(),
        "abandoned" | "failed" | "canceled" | "cancelling" => style(status).red().to_string(),
        "postponed" | "partiallysucceeded" => style(status).yellow().to_string(),
        _ => status.to_string(),
    }
}

/// Shortens `s` to at most `max_len` characters, ending in `...` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("web", 10), "web");
        assert_eq!(truncate("refs/heads/feature/login", 12), "refs/head...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_format_status_without_color() {
        assert_eq!(format_status("abandoned", false), "abandoned");
        assert_eq!(format_status("unknown", true), "unknown");
    }

    #[test]
    fn test_table_renders_rows() {
        let rendered = TableBuilder::new()
            .color(false)
            .headers(["TYPE", "ID"])
            .row(["Repository", "r-1"])
            .build()
            .to_string();
        assert!(rendered.contains("Repository"));
        assert!(rendered.contains("r-1"));
    }
}
