//! # Domain Types
//!
//! The field model: the TLV record and the payment-intent value object.
//! Nothing here has behavior beyond small accessors.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────┐              │
//! │  │    PaymentIntent     │───────►│     MerchantInfo     │              │
//! │  │  ──────────────────  │        │  ──────────────────  │              │
//! │  │  qr_type             │        │  alias   (tag 36/01) │              │
//! │  │  amount     (54)     │        │  name    (tag 59)    │              │
//! │  │  transaction_id      │        │  city    (tag 60)    │              │
//! │  │  bill_reference      │        │  country (tag 58)    │              │
//! │  │  subscription_id     │        │  category (tag 52)   │              │
//! │  │  merchant_channel    │        └──────────────────────┘              │
//! │  │  dynamic_url (36/02) │                                               │
//! │  │  additional_data (62)│        ┌──────────────────────┐              │
//! │  └──────────────────────┘        │      TlvField        │              │
//! │                                  │  tag · value · subs  │              │
//! │                                  └──────────────────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! Intents are transient: built by a caller, consumed once by a generator
//! (or produced once by the parser). Nothing is persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::amount::Amount;
use crate::channel::MerchantChannel;
use crate::error::ValidationError;
use crate::tags;

// =============================================================================
// TLV Field
// =============================================================================

/// One tag-length-value record.
///
/// The length is implicit: it is derived from `value` when encoding and
/// consumed when decoding. Composite tags (`36`, `62`) carry a nested TLV
/// stream in `value`; `sub_fields` holds it once decoded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TlvField {
    /// Two-character tag.
    pub tag: String,

    /// Raw value (at most 99 characters on the wire).
    pub value: String,

    /// Decoded children, empty for primitive fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_fields: Vec<TlvField>,
}

impl TlvField {
    /// Creates a field without children.
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        TlvField {
            tag: tag.into(),
            value: value.into(),
            sub_fields: Vec::new(),
        }
    }

    /// Attaches decoded children.
    pub fn with_sub_fields(mut self, sub_fields: Vec<TlvField>) -> Self {
        self.sub_fields = sub_fields;
        self
    }

    /// Returns true for tags whose value is a nested TLV stream.
    pub fn is_composite(&self) -> bool {
        tags::is_composite(&self.tag)
    }

    /// Finds the first child with the given tag.
    pub fn find_sub_field(&self, tag: &str) -> Option<&TlvField> {
        self.sub_fields.iter().find(|f| f.tag == tag)
    }

    /// Value length in characters.
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Returns true when the value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

// =============================================================================
// QR Type
// =============================================================================

/// The three QR variants of the scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum QrType {
    /// Merchant-persistent code, printed once (with or without amount).
    #[default]
    Static,
    /// Per-transaction code.
    Dynamic,
    /// Person-to-person transfer code.
    P2p,
}

impl QrType {
    /// Value of tag `01` for this variant.
    pub const fn point_of_initiation(self) -> &'static str {
        match self {
            QrType::Dynamic => tags::POI_DYNAMIC,
            QrType::Static | QrType::P2p => tags::POI_STATIC,
        }
    }
}

impl fmt::Display for QrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QrType::Static => write!(f, "STATIC"),
            QrType::Dynamic => write!(f, "DYNAMIC"),
            QrType::P2p => write!(f, "P2P"),
        }
    }
}

impl FromStr for QrType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(QrType::Static),
            "dynamic" => Ok(QrType::Dynamic),
            "p2p" => Ok(QrType::P2p),
            _ => Err(ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: vec!["static".into(), "dynamic".into(), "p2p".into()],
            }),
        }
    }
}

// =============================================================================
// Country Code
// =============================================================================

/// Member states of the monetary union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CountryCode {
    /// Burkina Faso
    BF,
    /// Côte d'Ivoire
    CI,
    /// Togo
    TG,
    /// Senegal
    SN,
    /// Mali
    ML,
    /// Benin
    BJ,
    /// Guinea-Bissau
    GW,
    /// Niger
    NE,
}

impl CountryCode {
    /// Every accepted code.
    pub const ALL: [CountryCode; 8] = [
        CountryCode::BF,
        CountryCode::CI,
        CountryCode::TG,
        CountryCode::SN,
        CountryCode::ML,
        CountryCode::BJ,
        CountryCode::GW,
        CountryCode::NE,
    ];

    /// Two-letter code as written in tag `58`.
    pub const fn as_str(self) -> &'static str {
        match self {
            CountryCode::BF => "BF",
            CountryCode::CI => "CI",
            CountryCode::TG => "TG",
            CountryCode::SN => "SN",
            CountryCode::ML => "ML",
            CountryCode::BJ => "BJ",
            CountryCode::GW => "GW",
            CountryCode::NE => "NE",
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountryCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CountryCode::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "country_code".to_string(),
                allowed: CountryCode::ALL.iter().map(|c| c.to_string()).collect(),
            })
    }
}

// =============================================================================
// Merchant Info
// =============================================================================

/// The merchant (or beneficiary, for P2P) behind a code.
///
/// Country is kept as the raw wire string so that parsing a foreign code
/// never fails; [`crate::validation::validate_merchant_info`] enforces the
/// regional set before generation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MerchantInfo {
    /// Account alias/proxy (usually a UUID).
    pub alias: String,

    /// Display name, at most 25 characters.
    pub name: String,

    /// City, at most 15 characters.
    pub city: String,

    /// Two-letter country code.
    pub country_code: String,

    /// Merchant category code as read from tag `52`. Generation always
    /// writes the configured code instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_code: Option<String>,
}

impl MerchantInfo {
    /// Creates merchant info without a category code.
    pub fn new(
        alias: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        MerchantInfo {
            alias: alias.into(),
            name: name.into(),
            city: city.into(),
            country_code: country_code.into(),
            category_code: None,
        }
    }

    /// Returns true when the alias is a UUID.
    pub fn alias_is_uuid(&self) -> bool {
        uuid::Uuid::parse_str(&self.alias).is_ok()
    }
}

// =============================================================================
// Payment Intent
// =============================================================================

/// A structured payment request: the input of a generator and the output
/// of the parser.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentIntent {
    /// Which QR variant to produce.
    #[serde(rename = "type", default)]
    pub qr_type: QrType,

    /// Merchant or beneficiary.
    #[serde(default)]
    pub merchant_info: Option<MerchantInfo>,

    /// Amount, strictly positive when present.
    #[serde(default)]
    pub amount: Option<Amount>,

    /// Transaction identifier (`62/01`).
    #[serde(default)]
    pub transaction_id: Option<String>,

    /// Invoice reference (`62/02`).
    #[serde(default)]
    pub bill_reference: Option<String>,

    /// Subscription identifier (`62/03`).
    #[serde(default)]
    pub subscription_id: Option<String>,

    /// Channel code (`62/11`).
    #[serde(default)]
    pub merchant_channel: Option<MerchantChannel>,

    /// PSP URL used instead of an alias by dynamic codes (`36/02`).
    #[serde(default)]
    pub dynamic_url: Option<String>,

    /// Extra `62` sub-fields, keyed by two-digit sub-tag.
    #[serde(default)]
    pub additional_data: BTreeMap<String, String>,
}

impl PaymentIntent {
    /// Creates an empty intent of the given type.
    pub fn new(qr_type: QrType) -> Self {
        PaymentIntent {
            qr_type,
            ..Default::default()
        }
    }

    pub fn with_merchant(mut self, merchant: MerchantInfo) -> Self {
        self.merchant_info = Some(merchant);
        self
    }

    pub fn with_amount(mut self, amount: impl Into<Amount>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_transaction_id(mut self, id: impl Into<String>) -> Self {
        self.transaction_id = Some(id.into());
        self
    }

    pub fn with_bill_reference(mut self, reference: impl Into<String>) -> Self {
        self.bill_reference = Some(reference.into());
        self
    }

    pub fn with_subscription_id(mut self, id: impl Into<String>) -> Self {
        self.subscription_id = Some(id.into());
        self
    }

    pub fn with_channel(mut self, channel: MerchantChannel) -> Self {
        self.merchant_channel = Some(channel);
        self
    }

    pub fn with_dynamic_url(mut self, url: impl Into<String>) -> Self {
        self.dynamic_url = Some(url.into());
        self
    }

    /// Adds a caller-supplied `62` sub-field.
    pub fn with_additional(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_data.insert(tag.into(), value.into());
        self
    }

    /// Value of tag `01` for this intent.
    pub fn point_of_initiation(&self) -> &'static str {
        self.qr_type.point_of_initiation()
    }

    /// Returns the dynamic URL when it is set and non-empty.
    pub fn usable_dynamic_url(&self) -> Option<&str> {
        self.dynamic_url.as_deref().filter(|u| !u.is_empty())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
