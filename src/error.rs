// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Domain errors raised by the ledger and valuation cores.
///
/// Validation and referential-integrity failures are user-facing and are
/// surfaced as messages by the command layer, not propagated as process
/// failures. Storage errors and a missing owner record are unexpected and
/// do propagate.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("account '{name}' is used by {count} entries and cannot be deleted")]
    AccountInUse { name: String, count: i64 },

    #[error("account '{0}' not found")]
    UnknownAccount(String),

    #[error("asset '{0}' not found")]
    UnknownAsset(String),

    #[error("no owner registered; run `assetbook seed` first")]
    OwnerMissing,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl LedgerError {
    /// Whether the error is meant for the user (abort the operation and
    /// print the reason) rather than the operator.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, LedgerError::Storage(_) | LedgerError::OwnerMissing)
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
