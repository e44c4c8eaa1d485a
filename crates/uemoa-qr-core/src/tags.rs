//! # Tag Catalogue
//!
//! Wire tags of the payment QR payload.
//!
//! ```text
//! 00  payload format indicator        ("01")
//! 01  point of initiation method      ("11" static/P2P, "12" dynamic)
//! 36  merchant account info           [composite]
//!       00 authority prefix
//!       01 alias | 02 dynamic URL
//! 52  merchant category code
//! 53  transaction currency            ("952")
//! 54  transaction amount              (plain decimal)
//! 58  country code
//! 59  merchant / beneficiary name     ("XXX" = masked, P2P)
//! 60  merchant / beneficiary city
//! 62  additional data                 [composite]
//!       01 transaction id · 02 bill reference · 03 subscription id
//!       11 channel code · anything else = caller extension
//! 63  CRC16, length "04"
//! ```

pub const PAYLOAD_FORMAT_INDICATOR: &str = "00";
pub const POINT_OF_INITIATION: &str = "01";
pub const MERCHANT_ACCOUNT_INFO: &str = "36";
pub const MERCHANT_CATEGORY_CODE: &str = "52";
pub const TRANSACTION_CURRENCY: &str = "53";
pub const TRANSACTION_AMOUNT: &str = "54";
pub const COUNTRY_CODE: &str = "58";
pub const MERCHANT_NAME: &str = "59";
pub const MERCHANT_CITY: &str = "60";
pub const ADDITIONAL_DATA: &str = "62";
pub const CRC: &str = "63";

/// Tag `63` plus its fixed length, appended before the checksum is computed.
pub const CRC_PLACEHOLDER: &str = "6304";

/// Tag `01` value for static and P2P codes.
pub const POI_STATIC: &str = "11";
/// Tag `01` value for dynamic codes.
pub const POI_DYNAMIC: &str = "12";

/// Masked beneficiary name for P2P codes.
pub const MASKED_NAME: &str = "XXX";

/// Sub-tags of the merchant account info (`36`).
pub mod account {
    pub const AUTHORITY_PREFIX: &str = "00";
    pub const ALIAS: &str = "01";
    pub const DYNAMIC_URL: &str = "02";
}

/// Sub-tags of the additional data (`62`).
pub mod additional {
    pub const TRANSACTION_ID: &str = "01";
    pub const BILL_REFERENCE: &str = "02";
    pub const SUBSCRIPTION_ID: &str = "03";
    pub const CHANNEL: &str = "11";
}

/// Returns true for tags whose value is a nested TLV stream.
pub fn is_composite(tag: &str) -> bool {
    tag == MERCHANT_ACCOUNT_INFO || tag == ADDITIONAL_DATA
}
