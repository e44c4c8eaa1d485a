//! # CRC Engine
//!
//! CRC16-CCITT over the payload, carried in tag `63`.
//!
//! ## Parameters
//! ```text
//! polynomial   0x1021
//! init         0xFFFF
//! reflect      no (MSB first, in and out)
//! final XOR    none
//! output       4 uppercase hex digits, zero padded
//! ```
//!
//! The checksum covers every byte before it, including the literal `6304`.
//!
//! ## Usage
//! ```rust
//! use uemoa_qr_core::crc;
//!
//! assert_eq!(crc::compute("123456789").unwrap(), "29B1");
//! assert!(crc::verify("12345678929B1"));
//! ```

use crate::error::{QrError, QrResult};

/// Generator polynomial.
pub const POLYNOMIAL: u16 = 0x1021;

/// Initial register value.
pub const INITIAL: u16 = 0xFFFF;

/// Hex digits of the rendered checksum.
pub const CRC_HEX_LEN: usize = 4;

/// Shortest string [`verify`] will look at.
const MIN_VERIFIABLE_LEN: usize = 8;

/// CRC-16/IBM-3740, the catalogue name for these parameters.
const CRC16: crc::Crc<u16> = crc::Crc::<u16>::new(&crc::CRC_16_IBM_3740);

/// Raw register value after feeding `bytes`.
pub fn checksum(bytes: &[u8]) -> u16 {
    CRC16.checksum(bytes)
}

/// Computes the checksum of `data` as 4 uppercase hex digits.
///
/// ## Errors
/// [`QrError::EmptyInput`] if `data` is empty.
pub fn compute(data: &str) -> QrResult<String> {
    if data.is_empty() {
        return Err(QrError::EmptyInput);
    }
    Ok(format!("{:04X}", checksum(data.as_bytes())))
}

/// Checks the trailing 4 characters of `full` against the rest.
///
/// Strings shorter than 8 characters are never valid. The comparison is
/// case-insensitive.
pub fn verify(full: &str) -> bool {
    split_trailer(full)
        .and_then(|(body, trailer)| compute(body).ok().map(|crc| crc.eq_ignore_ascii_case(trailer)))
        .unwrap_or(false)
}

/// Splits a payload into `(body, trailing 4 characters)`.
///
/// `None` when the payload is shorter than 8 characters.
pub fn split_trailer(full: &str) -> Option<(&str, &str)> {
    let chars = full.chars().count();
    if chars < MIN_VERIFIABLE_LEN {
        return None;
    }
    let (idx, _) = full.char_indices().nth(chars - CRC_HEX_LEN)?;
    Some(full.split_at(idx))
}
