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

//! Lending events and fire-and-forget notification dispatch.
//!
//! The ledger emits a [`LibraryEvent`] after a borrow or return has been
//! settled, and only when the matching flag in [`NotificationTriggers`] is
//! set. Dispatch failures are logged and never undo the operation.

use crate::base::{Title, UserId};
use crate::error::CollaboratorError;
use crossbeam::channel::{self, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Why a borrow attempt was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    InactiveUser,
    NoCopiesAvailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LibraryEvent {
    /// A copy left the shelf.
    Borrowed { title: Title, user: UserId },
    /// A copy came back.
    Returned { title: Title, user: UserId },
    /// A title went from zero to one available copy.
    Available { title: Title },
    BorrowRejected {
        title: Title,
        user: UserId,
        reason: RejectReason,
    },
}

/// Selects which events reach the [`Notifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationTriggers {
    pub borrowed: bool,
    pub returned: bool,
    pub available: bool,
    pub rejected: bool,
}

impl NotificationTriggers {
    /// No events are dispatched.
    pub const fn none() -> Self {
        Self {
            borrowed: false,
            returned: false,
            available: false,
            rejected: false,
        }
    }

    /// Every event is dispatched.
    pub const fn all() -> Self {
        Self {
            borrowed: true,
            returned: true,
            available: true,
            rejected: true,
        }
    }

    pub fn allows(&self, event: &LibraryEvent) -> bool {
        match event {
            LibraryEvent::Borrowed { .. } => self.borrowed,
            LibraryEvent::Returned { .. } => self.returned,
            LibraryEvent::Available { .. } => self.available,
            LibraryEvent::BorrowRejected { .. } => self.rejected,
        }
    }
}

impl Default for NotificationTriggers {
    fn default() -> Self {
        Self {
            borrowed: true,
            returned: true,
            available: true,
            rejected: false,
        }
    }
}

/// Receives lending events.
pub trait Notifier: Send + Sync {
    /// # Errors
    ///
    /// Errors are logged by the caller and otherwise ignored.
    fn notify(&self, event: &LibraryEvent) -> Result<(), CollaboratorError>;
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _event: &LibraryEvent) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Forwards events into a crossbeam channel without blocking.
///
/// A full or disconnected channel is reported as an error.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: Sender<LibraryEvent>,
}

impl ChannelNotifier {
    pub fn new(sender: Sender<LibraryEvent>) -> Self {
        Self { sender }
    }

    pub fn unbounded() -> (Self, Receiver<LibraryEvent>) {
        let (sender, receiver) = channel::unbounded();
        (Self::new(sender), receiver)
    }

    pub fn bounded(capacity: usize) -> (Self, Receiver<LibraryEvent>) {
        let (sender, receiver) = channel::bounded(capacity);
        (Self::new(sender), receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, event: &LibraryEvent) -> Result<(), CollaboratorError> {
        self.sender.try_send(event.clone())?;
        Ok(())
    }
}
