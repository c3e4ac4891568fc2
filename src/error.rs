// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for the lending ledger.
//!
//! Only programmer errors and collaborator failures are errors. Business
//! outcomes such as "no copies left" or "nothing to return" are reported as
//! `Ok(false)` by the ledger operations.

use crate::base::{Title, UserId};
use thiserror::Error;

/// Boxed error returned by external collaborators (eligibility, notification).
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Lending ledger errors.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Late fee requested for a negative number of overdue days
    #[error("invalid overdue days {0} (must not be negative)")]
    InvalidOverdueDays(i64),

    /// Configured fee rates produce a value outside the decimal range
    #[error("late fee overflow")]
    FeeOverflow,

    /// Zero copies passed to `add_copies`
    #[error("invalid copy count (must be positive)")]
    InvalidCopyCount,

    /// Adding copies would exceed the counter range
    #[error("copy count overflow for title '{title}'")]
    CopyCountOverflow { title: Title },

    /// The eligibility collaborator failed; the original error is the source
    #[error("eligibility check failed for user '{user}'")]
    Eligibility {
        user: UserId,
        #[source]
        source: CollaboratorError,
    },
}
