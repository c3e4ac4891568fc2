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

//! Available copies per title.

use crate::LibraryError;
use crate::base::Title;
use std::collections::HashMap;

/// Shelf stock, keyed by title.
///
/// Not synchronized on its own; [`crate::Library`] keeps it behind the same
/// lock as the loan ledger.
#[derive(Debug, Default)]
pub(crate) struct Catalog {
    copies: HashMap<Title, u32>,
}

impl Catalog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds `count` copies and returns the new number available.
    pub(crate) fn add_copies(&mut self, title: &Title, count: u32) -> Result<u32, LibraryError> {
        if count == 0 {
            return Err(LibraryError::InvalidCopyCount);
        }

        let current = self.available(title);
        let updated = current
            .checked_add(count)
            .ok_or_else(|| LibraryError::CopyCountOverflow {
                title: title.clone(),
            })?;
        self.copies.insert(title.clone(), updated);
        Ok(updated)
    }

    /// Unknown titles have zero copies.
    pub(crate) fn available(&self, title: &Title) -> u32 {
        self.copies.get(title).copied().unwrap_or(0)
    }

    /// Takes one copy off the shelf. Returns `false` if none are left.
    pub(crate) fn take_copy(&mut self, title: &Title) -> bool {
        match self.copies.get_mut(title) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Puts one copy back and returns the new number available.
    ///
    /// Only called for a copy that was previously taken, so the counter
    /// cannot exceed what `add_copies` accepted.
    pub(crate) fn restore_copy(&mut self, title: &Title) -> u32 {
        let count = self.copies.entry(title.clone()).or_insert(0);
        *count += 1;
        *count
    }

    pub(crate) fn titles(&self) -> impl Iterator<Item = (&Title, u32)> {
        self.copies.iter().map(|(title, count)| (title, *count))
    }
}
