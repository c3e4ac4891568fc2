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

//! Library configuration.

use crate::fee::FeePolicy;
use crate::notification::NotificationTriggers;
use serde::{Deserialize, Serialize};

/// Settings fixed when a [`crate::Library`] is built.
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Which lending events are dispatched to the notifier.
    pub notify: NotificationTriggers,
    /// Late fee rates.
    pub fees: FeePolicy,
}
