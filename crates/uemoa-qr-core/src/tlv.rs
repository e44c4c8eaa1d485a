//! # TLV Codec
//!
//! Encodes and decodes tag-length-value fields.
//!
//! ## Field Layout
//! ```text
//! ┌──────┬──────┬───────────────────────────┐
//! │ tag  │ len  │ value                     │
//! │ 2 ch │ 2 ch │ len characters (0..=99)   │
//! └──────┴──────┴───────────────────────────┘
//!   "53"   "03"   "952"          →  "5303952"
//! ```
//!
//! Lengths count characters, not bytes.
//!
//! ## Decoding Is Permissive
//! [`decode_all`] stops at the first field it cannot read (short header,
//! non-numeric length, declared length past the end) and returns what it
//! has so far. It also stops at the CRC tag `63`, which is left to
//! [`crate::crc`].
//!
//! ## Usage
//! ```rust
//! use uemoa_qr_core::tlv::{decode_all, encode_field};
//!
//! assert_eq!(encode_field("00", "01").unwrap(), "000201");
//! assert_eq!(encode_field("53", "952").unwrap(), "5303952");
//!
//! let fields = decode_all("000201520400005303952");
//! assert_eq!(fields.len(), 3);
//! assert_eq!(fields[2].value, "952");
//! ```

use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{QrError, QrResult};
use crate::tags;
use crate::types::TlvField;

// =============================================================================
// Constants
// =============================================================================

/// Characters in a tag.
pub const TAG_LEN: usize = 2;

/// Tag plus the two-digit length.
pub const HEADER_LEN: usize = 4;

/// Largest value a two-digit length can describe.
pub const MAX_VALUE_LEN: usize = 99;

// =============================================================================
// Encoding
// =============================================================================

/// Encodes one field as `tag + 2-digit length + value`.
///
/// An empty value encodes to an empty string, so the field is simply left
/// out of the payload.
///
/// ## Errors
/// - [`QrError::InvalidTag`] if `tag` is not exactly 2 characters
/// - [`QrError::FieldTooLong`] if `value` is longer than 99 characters
pub fn encode_field(tag: &str, value: &str) -> QrResult<String> {
    if tag.chars().count() != TAG_LEN {
        return Err(QrError::InvalidTag {
            tag: tag.to_string(),
        });
    }

    if value.is_empty() {
        return Ok(String::new());
    }

    let len = value.chars().count();
    if len > MAX_VALUE_LEN {
        return Err(QrError::FieldTooLong {
            tag: tag.to_string(),
            len,
            max: MAX_VALUE_LEN,
        });
    }

    Ok(format!("{}{:02}{}", tag, len, value))
}

/// Encodes a field that may be absent; `None` behaves like an empty value.
pub fn encode_optional(tag: &str, value: Option<&str>) -> QrResult<String> {
    encode_field(tag, value.unwrap_or_default())
}

/// Encodes a list of fields in ascending tag order.
///
/// The sort is explicit: callers may collect fields in any order.
/// Equal tags keep their relative order.
pub fn encode_sorted(fields: &[TlvField]) -> QrResult<String> {
    let mut ordered: Vec<&TlvField> = fields.iter().collect();
    ordered.sort_by(|a, b| a.tag.cmp(&b.tag));

    let mut out = String::new();
    for field in ordered {
        out.push_str(&encode_field(&field.tag, &field.value)?);
    }
    Ok(out)
}

// =============================================================================
// Decoding
// =============================================================================

/// Decodes the field starting `offset` characters into `data`.
///
/// Returns `None` when fewer than 4 characters remain, when the length is
/// not two decimal digits, or when the declared length runs past the end.
pub fn decode_field_at(data: &str, offset: usize) -> Option<TlvField> {
    let (_, rest) = split_chars(data, offset)?;
    read_field(rest).map(|(field, _)| field)
}

/// Decodes a whole TLV stream.
///
/// Stops without error when fewer than 4 characters remain, at the first
/// malformed field, or at tag `63` (excluded from the result).
pub fn decode_all(data: &str) -> Vec<TlvField> {
    let mut fields = Vec::new();
    let mut rest = data;

    while !rest.is_empty() {
        let Some((field, tail)) = read_field(rest) else {
            if rest.chars().count() >= HEADER_LEN {
                debug!(remaining = rest, "Malformed TLV field, truncating stream");
            }
            break;
        };

        if field.tag == tags::CRC {
            break;
        }

        fields.push(field);
        rest = tail;
    }

    fields
}

/// Decodes the body of a composite field (`36`, `62`).
pub fn decode_composite(value: &str) -> Vec<TlvField> {
    decode_all(value)
}

/// Decodes a stream and expands every composite field's children.
pub fn decode_tree(data: &str) -> Vec<TlvField> {
    decode_all(data)
        .into_iter()
        .map(|field| {
            if field.is_composite() {
                let children = decode_composite(&field.value);
                field.with_sub_fields(children)
            } else {
                field
            }
        })
        .collect()
}

/// Collapses fields into a tag → value map. Later duplicates win.
pub fn to_ordered_map(fields: &[TlvField]) -> BTreeMap<String, String> {
    fields
        .iter()
        .map(|f| (f.tag.clone(), f.value.clone()))
        .collect()
}

// =============================================================================
// Helpers
// =============================================================================

/// Reads one field from the front of `data`, returning it and the rest.
fn read_field(data: &str) -> Option<(TlvField, &str)> {
    let (tag, rest) = split_chars(data, TAG_LEN)?;
    let (len_digits, rest) = split_chars(rest, 2)?;
    let len = parse_length(len_digits)?;
    let (value, rest) = split_chars(rest, len)?;
    Some((TlvField::new(tag, value), rest))
}

/// Parses exactly two ASCII digits.
fn parse_length(digits: &str) -> Option<usize> {
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Splits after `n` characters, or `None` if `s` is shorter than that.
fn split_chars(s: &str, n: usize) -> Option<(&str, &str)> {
    if n == 0 {
        return Some(("", s));
    }
    match s.char_indices().nth(n) {
        Some((idx, _)) => Some(s.split_at(idx)),
        None if s.chars().count() == n => Some((s, "")),
        None => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
