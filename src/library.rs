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

//! Lending engine.
//!
//! The [`Library`] owns the catalog of available copies and the ledger of
//! outstanding loans, and mediates every change between them.
//!
//! # Operations
//!
//! - **Add copies**: Stocks the shelf for a title.
//! - **Borrow**: Checks the user's eligibility, then moves one copy from the
//!   shelf into the user's loans.
//! - **Return**: Moves one copy from the user's loans back to the shelf.
//!
//! # Thread Safety
//!
//! Catalog and ledger sit behind a single [`Mutex`], so the check-then-act
//! sequence of a borrow or return is atomic. Collaborators are never called
//! while the lock is held.

use crate::base::{Title, UserId};
use crate::catalog::Catalog;
use crate::config::LibraryConfig;
use crate::eligibility::UserEligibility;
use crate::ledger::LoanLedger;
use crate::notification::{LibraryEvent, NoopNotifier, Notifier, RejectReason};
use crate::LibraryError;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stock and loans for one title, as reported by [`Library::inventory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRecord {
    pub title: Title,
    pub available: u32,
    pub on_loan: u32,
}

#[derive(Debug, Default)]
struct LibraryData {
    catalog: Catalog,
    loans: LoanLedger,
}

impl LibraryData {
    fn new() -> Self {
        Self {
            catalog: Catalog::new(),
            loans: LoanLedger::new(),
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.loans.loans().all(|(_, _, held)| held >= 1),
            "Invariant violated: loan record with zero copies held"
        );
    }

    fn add_copies(&mut self, title: &Title, count: u32) -> Result<u32, LibraryError> {
        // Copies on loan come back to the shelf, so the shelf must be able
        // to hold the whole stock.
        let stock = self.catalog.available(title) as u64 + self.loans.on_loan(title) as u64;
        if stock + count as u64 > u32::MAX as u64 {
            return Err(LibraryError::CopyCountOverflow {
                title: title.clone(),
            });
        }
        let available = self.catalog.add_copies(title, count)?;
        self.assert_invariants();
        Ok(available)
    }

    /// Returns `false` if no copy is on the shelf.
    fn lend(&mut self, title: &Title, user: &UserId) -> bool {
        if !self.catalog.take_copy(title) {
            return false;
        }
        self.loans.record_loan(title, user);
        self.assert_invariants();
        true
    }

    /// Returns the number of copies on the shelf afterwards, or `None` if
    /// `user` holds no copy of `title`.
    fn take_back(&mut self, title: &Title, user: &UserId) -> Option<u32> {
        if !self.loans.release_loan(title, user) {
            return None;
        }
        let available = self.catalog.restore_copy(title);
        self.assert_invariants();
        Some(available)
    }
}

/// Library inventory and lending ledger.
///
/// # Invariants
///
/// - Available copies never go negative.
/// - A loan record exists only while its user holds at least one copy.
/// - A return succeeds only for the exact (title, user) pair of a prior borrow.
/// - The sum of available and loaned copies per title only grows through
///   [`Library::add_copies`].
pub struct Library {
    inner: Mutex<LibraryData>,
    eligibility: Arc<dyn UserEligibility>,
    notifier: Arc<dyn Notifier>,
    config: LibraryConfig,
}

impl Library {
    /// Creates an empty library that discards notifications.
    pub fn new(eligibility: Arc<dyn UserEligibility>) -> Self {
        Self::with_notifier(eligibility, Arc::new(NoopNotifier), LibraryConfig::default())
    }

    pub fn with_notifier(
        eligibility: Arc<dyn UserEligibility>,
        notifier: Arc<dyn Notifier>,
        config: LibraryConfig,
    ) -> Self {
        Self {
            inner: Mutex::new(LibraryData::new()),
            eligibility,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Adds `count` copies of `title` to the shelf and returns the number now
    /// available.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::InvalidCopyCount`] - `count` is zero.
    /// - [`LibraryError::CopyCountOverflow`] - the title's stock would exceed `u32::MAX`.
    pub fn add_copies(&self, title: &Title, count: u32) -> Result<u32, LibraryError> {
        let available = self.inner.lock().add_copies(title, count)?;
        info!(%title, count, available, "copies added");
        Ok(available)
    }

    /// Copies of `title` on the shelf; zero for unknown titles.
    pub fn available_copies(&self, title: &Title) -> u32 {
        self.inner.lock().catalog.available(title)
    }

    /// Copies of `title` currently held by `user`.
    pub fn copies_on_loan(&self, title: &Title, user: &UserId) -> u32 {
        self.inner.lock().loans.held(title, user)
    }

    /// Copies of `title` held across all users.
    pub fn total_on_loan(&self, title: &Title) -> u32 {
        self.inner.lock().loans.on_loan(title)
    }

    /// Lends one copy of `title` to `user`.
    ///
    /// Eligibility is checked first, then availability. Returns `Ok(false)`
    /// without touching any state when the user is inactive or the shelf is
    /// empty.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Eligibility`] - the eligibility check itself failed.
    pub fn borrow_book(&self, title: &Title, user: &UserId) -> Result<bool, LibraryError> {
        let active = self
            .eligibility
            .is_user_active(user)
            .map_err(|source| LibraryError::Eligibility {
                user: user.clone(),
                source,
            })?;
        if !active {
            debug!(%title, %user, "borrow rejected: user inactive");
            self.dispatch(LibraryEvent::BorrowRejected {
                title: title.clone(),
                user: user.clone(),
                reason: RejectReason::InactiveUser,
            });
            return Ok(false);
        }

        let lent = self.inner.lock().lend(title, user);
        if !lent {
            debug!(%title, %user, "borrow rejected: no copies available");
            self.dispatch(LibraryEvent::BorrowRejected {
                title: title.clone(),
                user: user.clone(),
                reason: RejectReason::NoCopiesAvailable,
            });
            return Ok(false);
        }

        debug!(%title, %user, "book borrowed");
        self.dispatch(LibraryEvent::Borrowed {
            title: title.clone(),
            user: user.clone(),
        });
        Ok(true)
    }

    /// Takes back one copy of `title` from `user`.
    ///
    /// Returns `false` without touching any state if `user` holds no copy of
    /// `title`.
    pub fn return_book(&self, title: &Title, user: &UserId) -> bool {
        let Some(available) = self.inner.lock().take_back(title, user) else {
            debug!(%title, %user, "return rejected: no matching loan");
            return false;
        };

        debug!(%title, %user, available, "book returned");
        self.dispatch(LibraryEvent::Returned {
            title: title.clone(),
            user: user.clone(),
        });
        if available == 1 {
            self.dispatch(LibraryEvent::Available {
                title: title.clone(),
            });
        }
        true
    }

    /// Late fee under this library's configured [`crate::FeePolicy`].
    ///
    /// Independent of inventory and loans.
    pub fn late_fee(
        &self,
        overdue_days: i64,
        is_bestseller: bool,
        is_premium_member: bool,
    ) -> Result<Decimal, LibraryError> {
        self.config
            .fees
            .late_fee(overdue_days, is_bestseller, is_premium_member)
    }

    /// Snapshot of every known title, sorted by title.
    pub fn inventory(&self) -> Vec<InventoryRecord> {
        let data = self.inner.lock();
        let mut records: Vec<InventoryRecord> = data
            .catalog
            .titles()
            .map(|(title, available)| InventoryRecord {
                title: title.clone(),
                available,
                on_loan: data.loans.on_loan(title),
            })
            .collect();
        records.sort_by(|a, b| a.title.cmp(&b.title));
        records
    }

    fn dispatch(&self, event: LibraryEvent) {
        if !self.config.notify.allows(&event) {
            return;
        }
        if let Err(e) = self.notifier.notify(&event) {
            warn!(?event, error = %e, "notification failed");
        }
    }
}
