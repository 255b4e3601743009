//
//  devops-state
//  report.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Results of best-effort bulk operations.

use serde::Serialize;

use crate::state::EntryKey;
use crate::{Error, Result};

/// One entry a bulk operation could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub key: EntryKey,
    pub reason: String,
}

impl BulkFailure {
    pub fn new(key: EntryKey, error: &Error) -> Self {
        Self {
            key,
            reason: error.to_string(),
        }
    }
}

/// Outcome of a bulk operation such as `delete_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub succeeded: Vec<EntryKey>,
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Ids of failed entries, in processing order.
    pub fn failed_keys(&self) -> Vec<&EntryKey> {
        self.failed.iter().map(|f| &f.key).collect()
    }

    /// Converts to `Err(Error::PartialFailure)` if any entry failed.
    pub fn into_result(self, operation: &'static str) -> Result<Vec<EntryKey>> {
        if self.failed.is_empty() {
            Ok(self.succeeded)
        } else {
            Err(Error::PartialFailure {
                operation,
                failures: self.failed,
            })
        }
    }
}
