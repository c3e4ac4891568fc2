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

//! Late-return fee calculation.
//!
//! The fee is `overdue_days * base_rate`, multiplied by the bestseller
//! surcharge and the premium member discount when those apply. Rounding to
//! cents happens once, after every multiplier, using round-half-up.
//!
//! # Example
//!
//! ```
//! use library_lending_rs::late_fee;
//! use rust_decimal_macros::dec;
//!
//! assert_eq!(late_fee(10, false, false).unwrap(), dec!(5.00));
//! assert_eq!(late_fee(10, true, true).unwrap(), dec!(6.00));
//! assert!(late_fee(-1, false, false).is_err());
//! ```

use crate::LibraryError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Rates applied by [`FeePolicy::late_fee`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeePolicy {
    /// Currency units charged per overdue day.
    pub base_rate: Decimal,
    /// Multiplier for bestseller titles.
    pub bestseller_multiplier: Decimal,
    /// Multiplier for premium members.
    pub premium_discount: Decimal,
}

impl FeePolicy {
    pub const BASE_RATE: Decimal = dec!(0.5);
    pub const BESTSELLER_MULTIPLIER: Decimal = dec!(1.5);
    pub const PREMIUM_DISCOUNT: Decimal = dec!(0.8);

    /// Fees are quoted in cents.
    const DECIMAL_PRECISION: u32 = 2;

    pub const fn new() -> Self {
        Self {
            base_rate: Self::BASE_RATE,
            bestseller_multiplier: Self::BESTSELLER_MULTIPLIER,
            premium_discount: Self::PREMIUM_DISCOUNT,
        }
    }

    /// Computes the fee for returning a book `overdue_days` late.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::InvalidOverdueDays`] - `overdue_days` is negative.
    /// - [`LibraryError::FeeOverflow`] - the configured rates push the fee
    ///   past the decimal range.
    pub fn late_fee(
        &self,
        overdue_days: i64,
        is_bestseller: bool,
        is_premium_member: bool,
    ) -> Result<Decimal, LibraryError> {
        if overdue_days < 0 {
            return Err(LibraryError::InvalidOverdueDays(overdue_days));
        }
        if overdue_days == 0 {
            return Ok(Decimal::ZERO);
        }

        let mut fee = Decimal::from(overdue_days)
            .checked_mul(self.base_rate)
            .ok_or(LibraryError::FeeOverflow)?;
        if is_bestseller {
            fee = fee
                .checked_mul(self.bestseller_multiplier)
                .ok_or(LibraryError::FeeOverflow)?;
        }
        if is_premium_member {
            fee = fee
                .checked_mul(self.premium_discount)
                .ok_or(LibraryError::FeeOverflow)?;
        }

        Ok(fee.round_dp_with_strategy(
            Self::DECIMAL_PRECISION,
            RoundingStrategy::MidpointAwayFromZero,
        ))
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes a late fee with the default rates.
///
/// See [`FeePolicy::late_fee`].
pub fn late_fee(
    overdue_days: i64,
    is_bestseller: bool,
    is_premium_member: bool,
) -> Result<Decimal, LibraryError> {
    FeePolicy::new().late_fee(overdue_days, is_bestseller, is_premium_member)
}
