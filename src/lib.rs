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

//! # Library Lending
//!
//! This library tracks a library's book inventory, lends copies to eligible
//! users, takes them back, and computes late-return fees.
//!
//! ## Core Components
//!
//! - [`Library`]: Catalog of available copies plus the ledger of outstanding loans
//! - [`late_fee`] / [`FeePolicy`]: Late fee calculation with bestseller and premium modifiers
//! - [`UserEligibility`]: Injected check deciding whether a user may borrow
//! - [`Notifier`]: Injected fire-and-forget sink for [`LibraryEvent`]s
//! - [`LibraryError`]: Error types for invalid input and collaborator failures
//!
//! ## Example
//!
//! ```
//! use library_lending_rs::{ActiveUsers, Library, Title, UserId};
//! use std::sync::Arc;
//!
//! let users = Arc::new(ActiveUsers::new());
//! users.activate(UserId::from("user"));
//! let library = Library::new(users);
//!
//! let title = Title::from("1984");
//! library.add_copies(&title, 3).unwrap();
//!
//! assert!(library.borrow_book(&title, &UserId::from("user")).unwrap());
//! assert_eq!(library.available_copies(&title), 2);
//!
//! assert!(library.return_book(&title, &UserId::from("user")));
//! assert_eq!(library.available_copies(&title), 3);
//! ```
//!
//! ## Thread Safety
//!
//! [`Library`] is `Send + Sync`. Borrows and returns are atomic with respect to
//! each other, so concurrent borrowers can never take more copies than exist.

mod base;
mod catalog;
pub mod config;
pub mod eligibility;
pub mod error;
mod fee;
mod ledger;
mod library;
pub mod notification;

pub use base::{Title, UserId};
pub use config::LibraryConfig;
pub use eligibility::{ActiveUsers, UserEligibility};
pub use error::{CollaboratorError, LibraryError};
pub use fee::{FeePolicy, late_fee};
pub use library::{InventoryRecord, Library};
pub use notification::{
    ChannelNotifier, LibraryEvent, NoopNotifier, NotificationTriggers, Notifier, RejectReason,
};
