//! # Generators
//!
//! Turns a [`PaymentIntent`] into a complete TLV payload with trailing CRC.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      generate(intent, profile)                          │
//! │                                                                         │
//! │  1. check        merchant / URL present, amount > 0                    │
//! │  2. seed         00 = "01"   52 = "0000"   53 = "952"   (profile)      │
//! │  3. initiation   01 = "11" static, P2P  |  "12" dynamic                │
//! │  4. account      36 = { 00 prefix, 01 alias | 02 URL }                 │
//! │  5. merchant     58 country · 59 name (P2P masks) · 60 city            │
//! │  6. amount       54 plain decimal                                      │
//! │  7. additional   62 = variant sub-tags, then caller extras             │
//! │  8. serialize    sort tags ↑ · append "6304" · append CRC16            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 2, 4, and 8 are shared free functions. Steps 3, 5, and 7 differ per
//! variant and live in [`generate_static`], [`generate_dynamic`], and
//! [`generate_p2p`].
//!
//! ## Statelessness
//! Every call builds its own [`FieldSet`]. A [`QrGenerator`] only holds the
//! immutable [`PayloadProfile`], so one instance can be shared across threads.
//!
//! ## Usage
//! ```rust
//! use uemoa_qr_core::generator::{generate, PayloadProfile};
//! use uemoa_qr_core::types::{MerchantInfo, PaymentIntent, QrType};
//!
//! let intent = PaymentIntent::new(QrType::Static)
//!     .with_merchant(MerchantInfo::new("shop-1", "BOUTIQUE", "Abidjan", "CI"))
//!     .with_amount(5000_i64);
//!
//! let payload = generate(&intent, &PayloadProfile::default()).unwrap();
//! assert!(payload.starts_with("000201010211"));
//! assert!(payload.contains("54045000"));
//! assert!(uemoa_qr_core::crc::verify(&payload));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::channel::MerchantChannel;
use crate::crc;
use crate::error::{QrError, QrResult, ValidationError};
use crate::tags::{self, account, additional};
use crate::tlv;
use crate::types::{MerchantInfo, PaymentIntent, QrType, TlvField};
use crate::validation::is_masked_name;

// =============================================================================
// Payload Profile
// =============================================================================

/// The configuration-driven constants written into every payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadProfile {
    /// Tag `00`.
    pub payload_format_indicator: String,

    /// Tag `52`.
    pub merchant_category_code: String,

    /// Tag `53`.
    pub currency_code: String,

    /// Sub-tag `36/00`.
    pub authority_prefix: String,
}

impl Default for PayloadProfile {
    fn default() -> Self {
        PayloadProfile {
            payload_format_indicator: crate::DEFAULT_PAYLOAD_FORMAT_INDICATOR.to_string(),
            merchant_category_code: crate::DEFAULT_MERCHANT_CATEGORY_CODE.to_string(),
            currency_code: crate::DEFAULT_CURRENCY_CODE.to_string(),
            authority_prefix: crate::DEFAULT_AUTHORITY_PREFIX.to_string(),
        }
    }
}

// =============================================================================
// Field Set
// =============================================================================

/// Per-call accumulator of `(tag, value)` pairs.
///
/// Setting a tag twice replaces the earlier value. Order of insertion does
/// not matter: [`FieldSet::into_sorted`] sorts explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<TlvField>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `tag`, replacing any earlier value.
    pub fn set(&mut self, tag: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|f| f.tag == tag) {
            Some(field) => field.value = value,
            None => self.fields.push(TlvField::new(tag, value)),
        }
    }

    /// Sets `tag` only if it is not there yet. Returns true if it was set.
    pub fn set_if_absent(&mut self, tag: &str, value: impl Into<String>) -> bool {
        if self.contains(tag) {
            return false;
        }
        self.fields.push(TlvField::new(tag, value));
        true
    }

    /// Sets `tag` from an optional value, skipping `None` and empty strings.
    pub fn set_opt(&mut self, tag: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.set(tag, value);
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.fields.iter().any(|f| f.tag == tag)
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.tag == tag)
            .map(|f| f.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consumes the set, returning fields in ascending tag order.
    pub fn into_sorted(mut self) -> Vec<TlvField> {
        self.fields.sort_by(|a, b| a.tag.cmp(&b.tag));
        self.fields
    }

    /// Encodes the set as a TLV stream in ascending tag order.
    pub fn encode(self) -> QrResult<String> {
        tlv::encode_sorted(&self.into_sorted())
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Generates the payload for `intent`, dispatching on `intent.qr_type`.
pub fn generate(intent: &PaymentIntent, profile: &PayloadProfile) -> QrResult<String> {
    generate_as(intent.qr_type, intent, profile)
}

/// Generates the payload for `intent` as the given variant.
pub fn generate_as(
    qr_type: QrType,
    intent: &PaymentIntent,
    profile: &PayloadProfile,
) -> QrResult<String> {
    match qr_type {
        QrType::Static => generate_static(intent, profile),
        QrType::Dynamic => generate_dynamic(intent, profile),
        QrType::P2p => generate_p2p(intent, profile),
    }
}

/// Merchant-persistent code.
///
/// ## Rules
/// - Merchant info is required
/// - `62/01..03` from the intent's references, when present
/// - `62/11` only if the intent names a channel
pub fn generate_static(intent: &PaymentIntent, profile: &PayloadProfile) -> QrResult<String> {
    info!("Generating static QR code");

    let merchant = require_merchant(intent)?;
    check_amount(intent)?;

    let mut fields = seed_defaults(profile);
    fields.set(tags::POINT_OF_INITIATION, tags::POI_STATIC);
    fields.set(
        tags::MERCHANT_ACCOUNT_INFO,
        merchant_account_info(profile, AccountTarget::Alias(&merchant.alias))?,
    );
    describe_merchant(&mut fields, merchant, &merchant.name);
    set_amount(&mut fields, intent);

    let mut extra = reference_sub_fields(intent);
    if let Some(channel) = intent.merchant_channel {
        set_channel(&mut extra, channel);
    }
    set_additional_data(&mut fields, extra, &intent.additional_data)?;

    let payload = finalize_with_crc(fields)?;
    info!(merchant = %merchant.name, "Static QR code generated");
    Ok(payload)
}

/// Per-transaction code.
///
/// ## Rules
/// - Merchant info or a dynamic URL is required
/// - A non-empty dynamic URL is preferred over the alias for `36`
/// - `62/11` defaults to 500 (dynamic on site)
pub fn generate_dynamic(intent: &PaymentIntent, profile: &PayloadProfile) -> QrResult<String> {
    info!("Generating dynamic QR code");

    let url = intent.usable_dynamic_url();
    if url.is_none() && intent.merchant_info.is_none() {
        return Err(QrError::required("merchant_info"));
    }
    check_amount(intent)?;
    if intent.amount.is_none() {
        warn!("Dynamic QR code generated without an amount");
    }

    let merchant = intent.merchant_info.as_ref();
    let mut fields = seed_defaults(profile);
    fields.set(tags::POINT_OF_INITIATION, tags::POI_DYNAMIC);

    let target = match (url, merchant) {
        (Some(url), _) => AccountTarget::DynamicUrl(url),
        (None, Some(merchant)) => AccountTarget::Alias(&merchant.alias),
        (None, None) => return Err(QrError::required("merchant_info")),
    };
    fields.set(
        tags::MERCHANT_ACCOUNT_INFO,
        merchant_account_info(profile, target)?,
    );

    if let Some(merchant) = merchant {
        describe_merchant(&mut fields, merchant, &merchant.name);
    }
    set_amount(&mut fields, intent);

    let mut extra = reference_sub_fields(intent);
    set_channel(
        &mut extra,
        intent
            .merchant_channel
            .unwrap_or(MerchantChannel::DynamicOnsite),
    );
    set_additional_data(&mut fields, extra, &intent.additional_data)?;

    let payload = finalize_with_crc(fields)?;
    match intent.transaction_id.as_deref() {
        Some(tx) => info!(transaction_id = tx, "Dynamic QR code generated"),
        None => info!("Dynamic QR code generated"),
    }
    Ok(payload)
}

/// Person-to-person code.
///
/// ## Rules
/// - Beneficiary info is required
/// - An empty or `XXX` name is written as `XXX`
/// - `62/11` is always 731; `62/01` carries the optional reference
pub fn generate_p2p(intent: &PaymentIntent, profile: &PayloadProfile) -> QrResult<String> {
    info!("Generating P2P QR code");

    let beneficiary = require_merchant(intent)?;
    check_amount(intent)?;

    let mut fields = seed_defaults(profile);
    fields.set(tags::POINT_OF_INITIATION, tags::POI_STATIC);
    fields.set(
        tags::MERCHANT_ACCOUNT_INFO,
        merchant_account_info(profile, AccountTarget::Alias(&beneficiary.alias))?,
    );

    let name = if is_masked_name(&beneficiary.name) {
        tags::MASKED_NAME
    } else {
        beneficiary.name.as_str()
    };
    describe_merchant(&mut fields, beneficiary, name);
    set_amount(&mut fields, intent);

    let mut extra = FieldSet::new();
    set_channel(&mut extra, MerchantChannel::P2pStatic);
    extra.set_opt(additional::TRANSACTION_ID, intent.transaction_id.as_deref());
    set_additional_data(&mut fields, extra, &intent.additional_data)?;

    let payload = finalize_with_crc(fields)?;
    info!(alias = %beneficiary.alias, "P2P QR code generated");
    Ok(payload)
}

// =============================================================================
// Generator Handle
// =============================================================================

/// A generator bound to one payload profile.
///
/// Holds no per-call state; share it freely.
#[derive(Debug, Clone, Default)]
pub struct QrGenerator {
    profile: PayloadProfile,
}

impl QrGenerator {
    pub fn new(profile: PayloadProfile) -> Self {
        QrGenerator { profile }
    }

    pub fn profile(&self) -> &PayloadProfile {
        &self.profile
    }

    /// Generates using the intent's own type.
    pub fn generate(&self, intent: &PaymentIntent) -> QrResult<String> {
        generate(intent, &self.profile)
    }

    /// Generates as `qr_type`, whatever the intent says.
    pub fn generate_as(&self, qr_type: QrType, intent: &PaymentIntent) -> QrResult<String> {
        generate_as(qr_type, intent, &self.profile)
    }
}

// =============================================================================
// Shared Steps
// =============================================================================

/// What sub-tag `36` points at.
#[derive(Debug, Clone, Copy)]
enum AccountTarget<'a> {
    Alias(&'a str),
    DynamicUrl(&'a str),
}

fn require_merchant(intent: &PaymentIntent) -> QrResult<&MerchantInfo> {
    intent
        .merchant_info
        .as_ref()
        .ok_or_else(|| QrError::required("merchant_info"))
}

fn check_amount(intent: &PaymentIntent) -> QrResult<()> {
    match &intent.amount {
        Some(amount) if !amount.is_positive() => Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        }
        .into()),
        _ => Ok(()),
    }
}

/// Tags `00`, `52`, `53`, all taken from the profile.
fn seed_defaults(profile: &PayloadProfile) -> FieldSet {
    let mut fields = FieldSet::new();
    fields.set(tags::PAYLOAD_FORMAT_INDICATOR, profile.payload_format_indicator.as_str());
    fields.set(tags::MERCHANT_CATEGORY_CODE, profile.merchant_category_code.as_str());
    fields.set(tags::TRANSACTION_CURRENCY, profile.currency_code.as_str());
    fields
}

/// Body of tag `36`.
fn merchant_account_info(profile: &PayloadProfile, target: AccountTarget<'_>) -> QrResult<String> {
    let mut account_info = FieldSet::new();
    account_info.set(account::AUTHORITY_PREFIX, profile.authority_prefix.as_str());

    match target {
        AccountTarget::Alias(alias) => {
            if alias.is_empty() {
                return Err(QrError::required("alias"));
            }
            account_info.set(account::ALIAS, alias);
        }
        AccountTarget::DynamicUrl(url) => {
            debug!(url, "Merchant account info uses dynamic URL");
            account_info.set(account::DYNAMIC_URL, url);
        }
    }

    account_info.encode()
}

/// Tags `58`, `59`, `60`.
fn describe_merchant(fields: &mut FieldSet, merchant: &MerchantInfo, name: &str) {
    fields.set(tags::COUNTRY_CODE, merchant.country_code.as_str());
    fields.set(tags::MERCHANT_NAME, name);
    fields.set(tags::MERCHANT_CITY, merchant.city.as_str());
}

/// Tag `54`.
fn set_amount(fields: &mut FieldSet, intent: &PaymentIntent) {
    if let Some(amount) = intent.amount.filter(|a| a.is_positive()) {
        debug!(%amount, "Amount set");
        fields.set(tags::TRANSACTION_AMOUNT, amount.to_plain_string());
    }
}

/// Sub-tags `62/01..03`.
fn reference_sub_fields(intent: &PaymentIntent) -> FieldSet {
    let mut extra = FieldSet::new();
    extra.set_opt(additional::TRANSACTION_ID, intent.transaction_id.as_deref());
    extra.set_opt(additional::BILL_REFERENCE, intent.bill_reference.as_deref());
    extra.set_opt(additional::SUBSCRIPTION_ID, intent.subscription_id.as_deref());
    extra
}

/// Sub-tag `62/11`.
fn set_channel(extra: &mut FieldSet, channel: MerchantChannel) {
    debug!(code = channel.code(), description = channel.description(), "Merchant channel set");
    extra.set(additional::CHANNEL, channel.wire_value());
}

/// Merges caller extras into the variant's sub-fields and sets tag `62`.
///
/// Caller entries never replace a sub-tag the variant already set, and empty
/// values are skipped.
fn set_additional_data(
    fields: &mut FieldSet,
    mut extra: FieldSet,
    caller: &BTreeMap<String, String>,
) -> QrResult<()> {
    for (tag, value) in caller {
        if value.is_empty() {
            continue;
        }
        if !extra.set_if_absent(tag, value.as_str()) {
            debug!(tag = %tag, "Caller additional data ignored, sub-tag already set");
        }
    }

    if extra.is_empty() {
        return Ok(());
    }
    fields.set(tags::ADDITIONAL_DATA, extra.encode()?);
    Ok(())
}

/// Serializes in ascending tag order, then appends `6304` and the CRC.
fn finalize_with_crc(fields: FieldSet) -> QrResult<String> {
    let mut payload = fields.encode()?;
    payload.push_str(tags::CRC_PLACEHOLDER);

    let checksum = crc::compute(&payload)?;
    payload.push_str(&checksum);

    info!(length = payload.chars().count(), crc = %checksum, "QR payload serialized");
    debug!(payload = %payload, "Full QR payload");
    Ok(payload)
}

// =============================================================================
// Unit Tests
// =============================================================================
