//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # Primitive byte-level parsers shared by the decoder.
//!
//! These operate on plain `&[u8]` slices and return [`crate::error::Result`]
//! rather than `nom::IResult`, so failure always means exactly one thing to a
//! caller: not enough (or not valid) input remained.

use num_traits::ToPrimitive;

use crate::error::{Error, Result};
use crate::varuint;

/// Consumes and returns the next byte.
pub fn take_byte(input: &[u8]) -> Result<(&[u8], u8)> {
    match input.split_first() {
        Some((&byte, rest)) => Ok((rest, byte)),
        None => Err(Error::Truncated),
    }
}

/// Returns the next byte without consuming it.
pub fn peek_byte(input: &[u8]) -> Result<u8> {
    input.first().copied().ok_or(Error::Truncated)
}

/// Consumes exactly `len` bytes.
pub fn take_n(input: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    if input.len() < len {
        Err(Error::Truncated)
    } else {
        Ok((&input[len..], &input[..len]))
    }
}

/// Parses a varuint and narrows it to a `u64`, distinguishing truncated
/// input from a magnitude that simply does not fit in 64 bits.
pub fn varuint_u64(input: &[u8]) -> Result<(&[u8], u64)> {
    let (rest, magnitude) = varuint::decode(input).map_err(|_| Error::Truncated)?;
    let value = magnitude
        .to_u64()
        .ok_or_else(|| Error::Message("varuint magnitude does not fit in 64 bits".to_string()))?;
    Ok((rest, value))
}

/// Parses a NUL-terminated UTF-8 string, consuming the terminator.
pub fn take_cstring(input: &[u8]) -> Result<(&[u8], String)> {
    let nul_index = input.iter().position(|&b| b == 0x00).ok_or(Error::Truncated)?;
    let (bytes, rest) = (&input[..nul_index], &input[nul_index + 1..]);
    let s = std::str::from_utf8(bytes).map_err(|_| Error::BadUtf8)?;
    Ok((rest, s.to_string()))
}

/// Parses a fixed-length UTF-8 string with no terminator.
pub fn take_fixed_string(input: &[u8], len: usize) -> Result<(&[u8], String)> {
    let (rest, bytes) = take_n(input, len)?;
    let s = std::str::from_utf8(bytes).map_err(|_| Error::BadUtf8)?;
    Ok((rest, s.to_string()))
}
