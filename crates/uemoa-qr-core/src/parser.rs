//! # Parser
//!
//! Reads a TLV payload back into a [`PaymentIntent`].
//!
//! ## Pipeline
//! ```text
//! payload ──► empty? ──► CRC check ──► decode_all ──► tag map
//!              │ EmptyInput  │ CrcMismatch                 │
//!                                                          ▼
//!            ┌──────────────────────────────────────────────────────┐
//!            │ 01   "12" → Dynamic, else Static                     │
//!            │ 36   alias (01) or URL/alias (02) → MerchantInfo     │
//!            │ 54   amount, dropped if not numeric                  │
//!            │ 62   01/02/03 ids · 11 channel (731 → P2P) · rest    │
//!            └──────────────────────────────────────────────────────┘
//! ```
//!
//! Only `EmptyInput` and `CrcMismatch` are hard failures. Anything else that
//! does not make sense is left out of the intent.
//!
//! ## Usage
//! ```rust
//! use uemoa_qr_core::generator::{generate, PayloadProfile};
//! use uemoa_qr_core::parser::parse;
//! use uemoa_qr_core::types::{MerchantInfo, PaymentIntent, QrType};
//!
//! let intent = PaymentIntent::new(QrType::P2p)
//!     .with_merchant(MerchantInfo::new("alias-7", "", "Lomé", "TG"));
//! let payload = generate(&intent, &PayloadProfile::default()).unwrap();
//!
//! let parsed = parse(&payload).unwrap();
//! assert_eq!(parsed.qr_type, QrType::P2p);
//! assert_eq!(parsed.merchant_info.unwrap().name, "XXX");
//! ```

use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

use crate::amount::Amount;
use crate::channel;
use crate::crc;
use crate::error::{QrError, QrResult};
use crate::tags::{self, account, additional};
use crate::tlv;
use crate::types::{MerchantInfo, PaymentIntent, QrType};

/// Prefix of `pi.` dynamic references.
const DYNAMIC_URL_PREFIX: &str = "pi.";

// =============================================================================
// Options
// =============================================================================

/// Parser switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Check the trailing CRC of payloads longer than 8 characters.
    pub validate_crc: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { validate_crc: true }
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Parses with default options (CRC checked).
pub fn parse(payload: &str) -> QrResult<PaymentIntent> {
    parse_with(payload, &ParseOptions::default())
}

/// Parses with explicit options.
///
/// ## Errors
/// - [`QrError::EmptyInput`] for an empty payload
/// - [`QrError::CrcMismatch`] when CRC checking is on and the CRC is wrong
pub fn parse_with(payload: &str, options: &ParseOptions) -> QrResult<PaymentIntent> {
    debug!(payload, "Parsing QR code");

    if payload.is_empty() {
        return Err(QrError::EmptyInput);
    }

    if options.validate_crc {
        check_crc(payload)?;
    }

    let fields = tlv::to_ordered_map(&tlv::decode_all(payload));

    let qr_type = match fields.get(tags::POINT_OF_INITIATION).map(String::as_str) {
        Some(tags::POI_DYNAMIC) => QrType::Dynamic,
        _ => QrType::Static,
    };
    let mut intent = PaymentIntent::new(qr_type);

    read_merchant_account(&fields, &mut intent);
    read_amount(&fields, &mut intent);
    read_additional_data(&fields, &mut intent);

    info!(
        qr_type = %intent.qr_type,
        amount = ?intent.amount.map(|a| a.to_plain_string()),
        "QR code parsed"
    );
    Ok(intent)
}

/// A parser bound to one set of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrParser {
    options: ParseOptions,
}

impl QrParser {
    pub fn new(options: ParseOptions) -> Self {
        QrParser { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse(&self, payload: &str) -> QrResult<PaymentIntent> {
        parse_with(payload, &self.options)
    }
}

// =============================================================================
// Steps
// =============================================================================

/// Verifies the trailing CRC of payloads longer than 8 characters.
fn check_crc(payload: &str) -> QrResult<()> {
    if payload.chars().count() <= 8 {
        return Ok(());
    }
    let Some((body, carried)) = crc::split_trailer(payload) else {
        return Ok(());
    };

    let computed = crc::compute(body)?;
    if computed.eq_ignore_ascii_case(carried) {
        debug!(crc = %computed, "CRC verified");
        return Ok(());
    }

    error!(expected = %computed, actual = carried, "QR code CRC mismatch");
    Err(QrError::CrcMismatch {
        expected: computed,
        actual: carried.to_string(),
    })
}

/// Tag `36`, plus `52/58/59/60` when an alias is found.
fn read_merchant_account(fields: &BTreeMap<String, String>, intent: &mut PaymentIntent) {
    let Some(account_info) = fields.get(tags::MERCHANT_ACCOUNT_INFO) else {
        return;
    };
    let sub_fields = tlv::to_ordered_map(&tlv::decode_composite(account_info));

    let alias = match non_empty(&sub_fields, account::ALIAS) {
        Some(alias) => Some(alias),
        None => {
            let alternate = non_empty(&sub_fields, account::DYNAMIC_URL);
            if let Some(url) = alternate.filter(|v| is_dynamic_url(v)) {
                intent.dynamic_url = Some(url.to_string());
            }
            alternate
        }
    };

    let Some(alias) = alias else {
        debug!("Merchant account info has no alias");
        return;
    };

    let text = |tag: &str| fields.get(tag).cloned().unwrap_or_default();
    let merchant = MerchantInfo {
        alias: alias.to_string(),
        name: text(tags::MERCHANT_NAME),
        city: text(tags::MERCHANT_CITY),
        country_code: text(tags::COUNTRY_CODE),
        category_code: fields.get(tags::MERCHANT_CATEGORY_CODE).cloned(),
    };
    debug!(name = %merchant.name, "Merchant info parsed");
    intent.merchant_info = Some(merchant);
}

/// Tag `54`.
fn read_amount(fields: &BTreeMap<String, String>, intent: &mut PaymentIntent) {
    let Some(raw) = fields.get(tags::TRANSACTION_AMOUNT).filter(|v| !v.is_empty()) else {
        return;
    };
    match Amount::parse_lenient(raw) {
        Some(amount) => {
            debug!(%amount, "Amount parsed");
            intent.amount = Some(amount);
        }
        None => warn!(raw = %raw, "Invalid amount, ignored"),
    }
}

/// Tag `62`.
fn read_additional_data(fields: &BTreeMap<String, String>, intent: &mut PaymentIntent) {
    let Some(body) = fields.get(tags::ADDITIONAL_DATA).filter(|v| !v.is_empty()) else {
        return;
    };
    let mut sub_fields = tlv::to_ordered_map(&tlv::decode_composite(body));

    intent.transaction_id = sub_fields.remove(additional::TRANSACTION_ID);
    intent.bill_reference = sub_fields.remove(additional::BILL_REFERENCE);
    intent.subscription_id = sub_fields.remove(additional::SUBSCRIPTION_ID);

    if let Some(code) = sub_fields.remove(additional::CHANNEL) {
        match channel::from_wire(&code) {
            Some(channel) => {
                debug!(%channel, "Merchant channel parsed");
                if channel.is_p2p() {
                    intent.qr_type = QrType::P2p;
                }
                intent.merchant_channel = Some(channel);
            }
            None => warn!(code = %code, "Unknown merchant channel, ignored"),
        }
    }

    intent.additional_data = sub_fields;
}

// =============================================================================
// Helpers
// =============================================================================

fn non_empty<'a>(map: &'a BTreeMap<String, String>, tag: &str) -> Option<&'a str> {
    map.get(tag).map(String::as_str).filter(|v| !v.is_empty())
}

/// True for `pi.` references and absolute http(s) URLs.
fn is_dynamic_url(value: &str) -> bool {
    if value.starts_with(DYNAMIC_URL_PREFIX) {
        return true;
    }
    url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

// =============================================================================
// Unit Tests
// =============================================================================
