//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The TSON value model.
//!
//! TSON supports the following value kinds:
//!
//! 1. Null.
//! 2. Boolean.
//! 3. Signed integers of arbitrary magnitude.
//! 4. Single- and double-precision floating point.
//! 5. Raw byte blobs, distinct from strings.
//! 6. UTF-8 strings, deduplicated via back-reference memoization.
//! 7. Arrays.
//! 8. Documents (keyed by unique UTF-8 string, emitted in sorted order).
//! 9. Timestamps, millisecond precision, relative to a fixed epoch.
//! 10. Durations, canonicalized to their coarsest exact unit.
//! 11. Geographic latitude/longitude pairs.

use num_bigint::BigInt;

use std::collections::BTreeMap;

use crate::duration;

mod magic;
mod de;

/// Milliseconds from the Unix epoch to the TSON epoch, 2016-01-01T00:00:00 UTC.
pub const EPOCH_MILLIS_SINCE_UNIX_EPOCH: i64 = 1_451_606_400_000;

/// An instant, stored as a millisecond offset from the TSON epoch.
///
/// Mirrors the way a bplist `Date` is a raw `CFAbsoluteTime` offset rather
/// than a calendar type: the offset *is* the value, with no timezone or
/// calendar arithmetic involved.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Timestamp {
    pub millis_since_epoch: i64,
}

impl Timestamp {
    pub fn from_millis_since_epoch(millis_since_epoch: i64) -> Self {
        Timestamp { millis_since_epoch }
    }

    /// Builds a `Timestamp` from a millisecond offset relative to the Unix
    /// epoch (1970-01-01T00:00:00Z), converting to the TSON epoch.
    pub fn from_unix_millis(unix_millis: i64) -> Self {
        Timestamp {
            millis_since_epoch: unix_millis - EPOCH_MILLIS_SINCE_UNIX_EPOCH,
        }
    }

    /// The instant's offset relative to the Unix epoch, in milliseconds.
    pub fn to_unix_millis(self) -> i64 {
        self.millis_since_epoch + EPOCH_MILLIS_SINCE_UNIX_EPOCH
    }
}

/// A geographic coordinate pair, encoded lossily via a 25-bit-pair geohash.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLon {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        LatLon { latitude, longitude }
    }
}

pub use duration::{Duration, DurationUnit};

/// An ordered sequence of values.
pub type Array = Vec<Value>;

/// A mapping from unique UTF-8 string keys to values, ordered by key.
///
/// Backed by a `BTreeMap` so that the ascending-lexicographic key order the
/// encoder must emit entries in is a free byproduct of iterating the map,
/// not a separate sort step layered on top of an insertion-ordered map.
pub type Document = BTreeMap<String, Value>;

/// Any value representable in TSON.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    /// A signed integer of arbitrary magnitude.
    Int(BigInt),
    /// An IEEE-754 double. May collapse to an equivalent `Int` during encode.
    Float(f64),
    /// An opaque byte blob, distinct from `String`.
    Bytes(Vec<u8>),
    /// A UTF-8 string, subject to back-reference memoization during encode.
    String(String),
    Array(Array),
    Document(Document),
    Timestamp(Timestamp),
    Duration(Duration),
    LatLon(LatLon),
}

impl Value {
    pub fn int<T: Into<BigInt>>(value: T) -> Value {
        Value::Int(value.into())
    }
}
