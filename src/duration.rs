//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # Duration canonicalization.
//!
//! A `Duration` is canonicalized to the coarsest unit that still represents
//! it exactly, by repeatedly dividing into the next coarser unit while the
//! remainder is zero. This runs once, before encoding; decoding preserves
//! whatever unit the wire form already chose.

use crate::error::Error;

/// The unit a duration's magnitude is expressed in.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DurationUnit {
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl DurationUnit {
    /// The low 7 bits of the duration opcode's unit byte.
    pub fn code(self) -> u8 {
        match self {
            DurationUnit::Second => 1,
            DurationUnit::Minute => 2,
            DurationUnit::Millisecond => 3,
            DurationUnit::Hour => 4,
            DurationUnit::Microsecond => 6,
            DurationUnit::Nanosecond => 9,
        }
    }

    /// Recovers a unit from the low 7 bits of a duration unit byte.
    pub fn from_code(code: u8) -> Result<DurationUnit, Error> {
        match code {
            1 => Ok(DurationUnit::Second),
            2 => Ok(DurationUnit::Minute),
            3 => Ok(DurationUnit::Millisecond),
            4 => Ok(DurationUnit::Hour),
            6 => Ok(DurationUnit::Microsecond),
            9 => Ok(DurationUnit::Nanosecond),
            _ => Err(Error::BadDurationUnit),
        }
    }

    /// The next coarser unit and the exact divisor that reaches it, if any.
    fn coarser(self) -> Option<(DurationUnit, i64)> {
        match self {
            DurationUnit::Nanosecond => Some((DurationUnit::Microsecond, 1000)),
            DurationUnit::Microsecond => Some((DurationUnit::Millisecond, 1000)),
            DurationUnit::Millisecond => Some((DurationUnit::Second, 1000)),
            DurationUnit::Second => Some((DurationUnit::Minute, 60)),
            DurationUnit::Minute => Some((DurationUnit::Hour, 60)),
            DurationUnit::Hour => None,
        }
    }
}

/// A signed amount expressed in a single [`DurationUnit`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Duration {
    pub amount: i64,
    pub unit: DurationUnit,
}

impl Duration {
    pub fn new(amount: i64, unit: DurationUnit) -> Self {
        Duration { amount, unit }
    }

    /// Promotes `self` to the coarsest unit that exactly represents the
    /// same duration, by repeated exact division.
    pub fn canonicalize(self) -> Duration {
        let mut amount = self.amount;
        let mut unit = self.unit;
        while let Some((coarser_unit, divisor)) = unit.coarser() {
            if amount % divisor == 0 {
                amount /= divisor;
                unit = coarser_unit;
            } else {
                break;
            }
        }
        Duration { amount, unit }
    }
}
