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

//! Borrower eligibility.
//!
//! The ledger only asks one question of the outside world before lending a
//! copy: is this user allowed to borrow? Anything that can answer it
//! implements [`UserEligibility`], including plain closures.
//!
//! # Example
//!
//! ```
//! use library_lending_rs::{ActiveUsers, UserEligibility, UserId};
//!
//! let users = ActiveUsers::new();
//! users.activate(UserId::from("alice"));
//! assert!(users.is_user_active(&UserId::from("alice")).unwrap());
//! assert!(!users.is_user_active(&UserId::from("bob")).unwrap());
//! ```

use crate::base::UserId;
use crate::error::CollaboratorError;
use dashmap::DashMap;

/// Answers whether a user may borrow books.
pub trait UserEligibility: Send + Sync {
    /// Called exactly once per borrow attempt, before any state changes.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures; the ledger forwards them
    /// to the caller as [`crate::LibraryError::Eligibility`].
    fn is_user_active(&self, user: &UserId) -> Result<bool, CollaboratorError>;
}

impl<F> UserEligibility for F
where
    F: Fn(&UserId) -> Result<bool, CollaboratorError> + Send + Sync,
{
    fn is_user_active(&self, user: &UserId) -> Result<bool, CollaboratorError> {
        self(user)
    }
}

/// In-memory registry of active users.
///
/// Users that were never registered are treated as inactive.
#[derive(Debug, Default)]
pub struct ActiveUsers {
    users: DashMap<UserId, bool>,
}

impl ActiveUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&self, user: UserId) {
        self.users.insert(user, true);
    }

    pub fn deactivate(&self, user: UserId) {
        self.users.insert(user, false);
    }
}

impl UserEligibility for ActiveUsers {
    fn is_user_active(&self, user: &UserId) -> Result<bool, CollaboratorError> {
        Ok(self.users.get(user).is_some_and(|active| *active))
    }
}
