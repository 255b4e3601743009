//
//  devops-state
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration File I/O
//!
//! Thin wrappers used by [`Config`](super::Config) to read and write the
//! TOML file.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use devops_state::config::{config_exists, read_config_file, write_config_file};
//!
//! let path = Path::new("/tmp/dvs/config.toml");
//! if config_exists(path) {
//!     println!("{}", read_config_file(path)?);
//! } else {
//!     write_config_file(path, "[remote]\nproject = \"web\"\n")?;
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::Path;

use anyhow::Result;

/// Reads the whole configuration file.
pub fn read_config_file(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Writes the configuration file, creating parent directories as needed.
///
/// Existing files are overwritten.
pub fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Returns `true` if a file exists at `path`.
pub fn config_exists(path: &Path) -> bool {
    path.exists()
}
