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

//! Outstanding loans per (title, user).
//!
//! ```text
//!  (no record) ──borrow──► held: 1 ──borrow──► held: n
//!       ▲                    │                   │
//!       └──────return────────┘ ◄──────return─────┘
//! ```
//!
//! A record exists only while at least one copy is held.

use crate::base::{Title, UserId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

#[derive(Debug, Default)]
pub(crate) struct LoanLedger {
    loans: HashMap<(Title, UserId), u32>,
}

impl LoanLedger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records one more copy of `title` held by `user`.
    pub(crate) fn record_loan(&mut self, title: &Title, user: &UserId) -> u32 {
        let held = self
            .loans
            .entry((title.clone(), user.clone()))
            .or_insert(0);
        *held += 1;
        *held
    }

    /// Releases one copy held by `user`. Returns `false` if the pair has no
    /// outstanding loan.
    pub(crate) fn release_loan(&mut self, title: &Title, user: &UserId) -> bool {
        match self.loans.entry((title.clone(), user.clone())) {
            Entry::Vacant(_) => false,
            Entry::Occupied(mut entry) => {
                if *entry.get() <= 1 {
                    entry.remove();
                } else {
                    *entry.get_mut() -= 1;
                }
                true
            }
        }
    }

    pub(crate) fn held(&self, title: &Title, user: &UserId) -> u32 {
        self.loans
            .get(&(title.clone(), user.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Copies of `title` held across all users.
    pub(crate) fn on_loan(&self, title: &Title) -> u32 {
        self.loans
            .iter()
            .filter(|((t, _), _)| t == title)
            .map(|(_, held)| *held)
            .sum()
    }

    pub(crate) fn loans(&self) -> impl Iterator<Item = (&Title, &UserId, u32)> {
        self.loans
            .iter()
            .map(|((title, user), held)| (title, user, *held))
    }
}
