//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The varuint codec.
//!
//! A varuint is a base-128 little-endian unsigned integer. Each byte
//! contributes 7 bits of magnitude, least-significant group first; the high
//! bit of a byte is a continuation flag, set on every byte but the last.
//!
//! Decoders accept any number of leading bytes with a high bit set (no
//! minimal-encoding check), but [`encode`] always emits the minimal form.

use nom::{
    IResult,
    bytes::complete::take,
};

use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// Appends the varuint encoding of `value` to `out`.
pub fn encode(value: &BigUint, out: &mut Vec<u8>) {
    // Base-128 digits, least-significant first: exactly the 7-bit groups
    // the wire format wants, with no shifting or masking required.
    let mut digits = value.to_radix_le(128);
    if digits.is_empty() {
        digits.push(0);
    }
    let last = digits.len() - 1;
    for (i, digit) in digits.into_iter().enumerate() {
        if i == last {
            out.push(digit);
        } else {
            out.push(digit | 0x80);
        }
    }
}

/// Appends the varuint encoding of `value` to `out`.
pub fn encode_u64(value: u64, out: &mut Vec<u8>) {
    let mut remaining = value;
    loop {
        let group = (remaining & 0x7F) as u8;
        remaining >>= 7;
        if remaining == 0 {
            out.push(group);
            break;
        }
        out.push(group | 0x80);
    }
}

/// Parses a varuint, returning its arbitrary-precision magnitude.
///
/// Reads bytes until one has its high bit clear; never fails to terminate on
/// a well-formed input, and consumes no more than it must.
pub fn decode(input: &[u8]) -> IResult<&[u8], BigUint> {
    let mut digits = Vec::new();
    let mut cursor = input;
    loop {
        let (rest, byte) = take(1usize)(cursor)?;
        let byte = byte[0];
        digits.push(byte & 0x7F);
        cursor = rest;
        if byte & 0x80 == 0 {
            let value = BigUint::from_radix_le(&digits, 128)
                .expect("every digit is masked below the radix");
            return Ok((cursor, value));
        }
    }
}

/// Parses a varuint, narrowing the result to a `u64`.
///
/// Used for lengths, back-reference indices, timestamp deltas and geohash
/// values, all of which fit comfortably in 64 bits even though the wire
/// format itself places no such limit on a varuint's magnitude.
pub fn decode_u64(input: &[u8]) -> IResult<&[u8], u64> {
    nom::combinator::map_opt(decode, |value: BigUint| value.to_u64())(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_u64(n: u64, expected: &[u8]) {
        let mut out = Vec::new();
        encode_u64(n, &mut out);
        assert_eq!(out, expected);

        let mut big_out = Vec::new();
        encode(&BigUint::from(n), &mut big_out);
        assert_eq!(big_out, expected);

        let (rest, decoded) = decode_u64(expected).unwrap();
        assert_eq!(rest.len(), 0);
        assert_eq!(decoded, n);
    }

    #[test]
    fn test_zero() {
        roundtrip_u64(0, &[0x00]);
    }

    #[test]
    fn test_single_byte_max() {
        roundtrip_u64(63, &[0x3F]);
    }

    #[test]
    fn test_two_bytes() {
        roundtrip_u64(200, &[0xC8, 0x01]);
    }

    #[test]
    fn test_three_bytes() {
        roundtrip_u64(123456, &[0xC0, 0xC4, 0x07]);
    }

    #[test]
    fn test_decode_accepts_non_minimal_form() {
        // 0 encoded with a superfluous continuation byte.
        let (rest, decoded) = decode_u64(&[0x80, 0x00]).unwrap();
        assert_eq!(rest.len(), 0);
        assert_eq!(decoded, 0);
    }

    #[test]
    fn test_arbitrary_precision_magnitude() {
        // A magnitude far larger than a u64 can hold.
        let huge = BigUint::from(u64::max_value()) * BigUint::from(1000u32);
        let mut out = Vec::new();
        encode(&huge, &mut out);
        let (rest, decoded) = decode(&out).unwrap();
        assert_eq!(rest.len(), 0);
        assert_eq!(decoded, huge);
    }

    #[test]
    fn test_decode_u64_rejects_oversized_magnitude() {
        let huge = BigUint::from(u64::max_value()) * BigUint::from(2u32);
        let mut out = Vec::new();
        encode(&huge, &mut out);
        assert!(decode_u64(&out).is_err());
    }
}
