//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The TSON opcode table.
//!
//! Every value begins with a one-byte opcode. A handful of ranges are
//! reserved and must never be emitted; decoders treat them as a decode
//! error rather than attempting to interpret them.

pub const DOCUMENT: u8 = 0x01;
pub const ARRAY: u8 = 0x02;
pub const BYTES: u8 = 0x03;
pub const TIMESTAMP_POSITIVE: u8 = 0x04;
pub const TRUE: u8 = 0x05;
pub const FALSE: u8 = 0x06;
pub const NULL: u8 = 0x07;
pub const TIMESTAMP_NEGATIVE: u8 = 0x08;
pub const LAT_LON: u8 = 0x09;

pub const STRING_TERMINATED: u8 = 0x0E;
pub const STRING_BACKREF: u8 = 0x0F;

/// Small strings of length 1 through 24: `opcode - SMALL_STRING_BASE` bytes.
pub const SMALL_STRING_BASE: u8 = 0x0F;
pub const SMALL_STRING_MIN: u8 = 0x10;
pub const SMALL_STRING_MAX: u8 = 0x27;

/// Small documents of 1 through 4 entries: `opcode - SMALL_DOCUMENT_BASE` entries.
pub const SMALL_DOCUMENT_BASE: u8 = 0x27;
pub const SMALL_DOCUMENT_MIN: u8 = 0x28;
pub const SMALL_DOCUMENT_MAX: u8 = 0x2B;

/// Small arrays of 1 through 4 elements: `opcode - SMALL_ARRAY_BASE` elements.
pub const SMALL_ARRAY_BASE: u8 = 0x2B;
pub const SMALL_ARRAY_MIN: u8 = 0x2C;
pub const SMALL_ARRAY_MAX: u8 = 0x2F;

pub const DURATION: u8 = 0x37;

pub const INT_POSITIVE: u8 = 0x3A;
pub const INT_NEGATIVE: u8 = 0x3B;
pub const FLOAT4: u8 = 0x3C;
pub const FLOAT8: u8 = 0x3D;

/// Small, non-negative integers 0 through 63: `opcode - SMALL_INT_BASE` is the value.
pub const SMALL_INT_BASE: u8 = 0x40;
pub const SMALL_INT_MIN: u8 = 0x40;
pub const SMALL_INT_MAX: u8 = 0x7F;

/// Mask stolen from a document entry value's first opcode byte to flag that
/// the entry's key is a back-reference rather than an inline terminated string.
pub const KEY_IS_BACKREF_FLAG: u8 = 0x80;

/// High bit of a Duration's unit byte, set iff the amount is negative.
pub const DURATION_NEGATIVE_FLAG: u8 = 0x80;

/// Reserved ranges which must never be emitted by an encoder. Decoders treat
/// any byte in one of these ranges, or any byte not otherwise recognized, as
/// [`crate::error::Error::InvalidOpcode`].
const RESERVED_RANGES: &[(u8, u8)] = &[
    (10, 13),
    (48, 54),
    (56, 57),
    (62, 63),
];

pub fn is_reserved(opcode: u8) -> bool {
    RESERVED_RANGES
        .iter()
        .any(|&(lo, hi)| opcode >= lo && opcode <= hi)
}

pub fn is_small_string(opcode: u8) -> bool {
    opcode >= SMALL_STRING_MIN && opcode <= SMALL_STRING_MAX
}

pub fn is_small_document(opcode: u8) -> bool {
    opcode >= SMALL_DOCUMENT_MIN && opcode <= SMALL_DOCUMENT_MAX
}

pub fn is_small_array(opcode: u8) -> bool {
    opcode >= SMALL_ARRAY_MIN && opcode <= SMALL_ARRAY_MAX
}

pub fn is_small_int(opcode: u8) -> bool {
    opcode >= SMALL_INT_MIN && opcode <= SMALL_INT_MAX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_ranges() {
        for &opcode in &[10u8, 11, 12, 13, 48, 53, 54, 56, 57, 62, 63] {
            assert!(is_reserved(opcode), "{:#04x} should be reserved", opcode);
        }
        for &opcode in &[0x00u8, 0x09, 0x37, 0x3A, 0x40, 0x7F] {
            assert!(!is_reserved(opcode), "{:#04x} should not be reserved", opcode);
        }
    }

    #[test]
    fn test_small_form_ranges() {
        assert!(is_small_string(0x10));
        assert!(is_small_string(0x27));
        assert!(!is_small_string(0x28));

        assert!(is_small_document(0x28));
        assert!(is_small_document(0x2B));
        assert!(!is_small_document(0x2C));

        assert!(is_small_array(0x2C));
        assert!(is_small_array(0x2F));
        assert!(!is_small_array(0x30));

        assert!(is_small_int(0x40));
        assert!(is_small_int(0x7F));
        assert!(!is_small_int(0x3F));
    }
}
