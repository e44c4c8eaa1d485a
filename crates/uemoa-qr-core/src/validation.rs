//! # Validation Module
//!
//! Business-rule validation of payment intents.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Shape of the intent, enum names, amount syntax                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (called by the service before generating)        │
//! │  ├── Merchant fields: alias, name ≤25, city ≤15, country               │
//! │  ├── References: [A-Za-z0-9-]{1,25}                                    │
//! │  └── Amount > 0, extension sub-tags are 2 digits                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Generator                                                    │
//! │  ├── Minimal checks (merchant or URL present, amount > 0)              │
//! │  └── Codec limits (tag = 2 chars, value ≤ 99 chars)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use uemoa_qr_core::types::{MerchantInfo, PaymentIntent, QrType};
//! use uemoa_qr_core::validation::validate_intent;
//!
//! let intent = PaymentIntent::new(QrType::Static)
//!     .with_merchant(MerchantInfo::new("shop-1", "BOUTIQUE", "Abidjan", "CI"))
//!     .with_transaction_id("TX-0001");
//! assert!(validate_intent(&intent).is_ok());
//!
//! let bad = intent.clone().with_transaction_id("has space");
//! assert!(validate_intent(&bad).is_err());
//! ```

use tracing::debug;

use crate::amount::Amount;
use crate::error::ValidationError;
use crate::tags;
use crate::types::{CountryCode, MerchantInfo, PaymentIntent, QrType};
use crate::{MAX_CITY_LEN, MAX_NAME_LEN, MAX_REFERENCE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Intent Validation
// =============================================================================

/// Validates a whole intent.
///
/// ## Rules
/// - Static / Dynamic: merchant info or a non-empty dynamic URL
/// - P2P: merchant info, always
/// - Merchant info, when present, passes [`validate_merchant_info`]
/// - References, amount, and extension sub-tags pass their own validators
pub fn validate_intent(intent: &PaymentIntent) -> ValidationResult<()> {
    match (&intent.merchant_info, intent.qr_type) {
        (Some(merchant), qr_type) => validate_merchant_info(merchant, qr_type)?,
        (None, QrType::P2p) => {
            return Err(ValidationError::Required {
                field: "merchant_info".to_string(),
            })
        }
        (None, _) if intent.usable_dynamic_url().is_none() => {
            return Err(ValidationError::Required {
                field: "merchant_info".to_string(),
            })
        }
        (None, _) => {}
    }

    if let Some(amount) = &intent.amount {
        validate_amount(amount)?;
    }

    let references = [
        ("transaction_id", &intent.transaction_id),
        ("bill_reference", &intent.bill_reference),
        ("subscription_id", &intent.subscription_id),
    ];
    for (field, value) in references {
        if let Some(value) = value {
            validate_reference(field, value)?;
        }
    }

    for tag in intent.additional_data.keys() {
        validate_additional_tag(tag)?;
    }

    Ok(())
}

/// Validates the merchant (or beneficiary) block.
///
/// P2P codes may leave the name empty: it is masked as `XXX` on the wire.
pub fn validate_merchant_info(merchant: &MerchantInfo, qr_type: QrType) -> ValidationResult<()> {
    validate_alias(&merchant.alias)?;
    if !merchant.alias_is_uuid() {
        debug!(alias = %merchant.alias, "Alias is not a UUID");
    }
    validate_merchant_name(&merchant.name, qr_type == QrType::P2p)?;
    validate_city(&merchant.city)?;
    validate_country_code(&merchant.country_code)?;
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an account alias.
///
/// ## Rules
/// - Must not be empty
/// - Must fit one TLV value (99 characters)
pub fn validate_alias(alias: &str) -> ValidationResult<()> {
    if alias.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "alias".to_string(),
        });
    }

    if alias.chars().count() > crate::MAX_FIELD_VALUE_LEN {
        return Err(ValidationError::TooLong {
            field: "alias".to_string(),
            max: crate::MAX_FIELD_VALUE_LEN,
        });
    }

    Ok(())
}

/// Validates a merchant name.
///
/// ## Rules
/// - Must not be empty, unless `allow_empty` (P2P masking)
/// - At most 25 characters
///
/// ## Example
/// ```rust
/// use uemoa_qr_core::validation::validate_merchant_name;
///
/// assert!(validate_merchant_name("BOUTIQUE CENTRALE", false).is_ok());
/// assert!(validate_merchant_name("", false).is_err());
/// assert!(validate_merchant_name("", true).is_ok());
/// assert!(validate_merchant_name(&"A".repeat(26), true).is_err());
/// ```
pub fn validate_merchant_name(name: &str, allow_empty: bool) -> ValidationResult<()> {
    if name.trim().is_empty() && !allow_empty {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a merchant city.
///
/// ## Rules
/// - Must not be empty
/// - At most 15 characters
pub fn validate_city(city: &str) -> ValidationResult<()> {
    if city.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "city".to_string(),
        });
    }

    if city.chars().count() > MAX_CITY_LEN {
        return Err(ValidationError::TooLong {
            field: "city".to_string(),
            max: MAX_CITY_LEN,
        });
    }

    Ok(())
}

/// Validates a country code against the regional set.
pub fn validate_country_code(code: &str) -> ValidationResult<CountryCode> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "country_code".to_string(),
        });
    }
    code.parse()
}

/// Validates a transaction id, bill reference, or subscription id.
///
/// ## Rules
/// - 1 to 25 characters
/// - ASCII letters, digits, and hyphens only
///
/// ## Example
/// ```rust
/// use uemoa_qr_core::validation::validate_reference;
///
/// assert!(validate_reference("transaction_id", "INV-2024-001").is_ok());
/// assert!(validate_reference("transaction_id", "INV 001").is_err());
/// assert!(validate_reference("transaction_id", "").is_err());
/// ```
pub fn validate_reference(field: &str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_REFERENCE_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_REFERENCE_LEN,
        });
    }

    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, digits, and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Validates a caller-supplied `62` sub-tag.
///
/// ## Rules
/// - Exactly 2 ASCII digits
/// - Reserved sub-tags (`01`, `02`, `03`, `11`) are accepted here; the
///   generator keeps its own values for them
pub fn validate_additional_tag(tag: &str) -> ValidationResult<()> {
    if tag.len() != 2 || !tag.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: format!("additional_data[{}]", tag),
            reason: "sub-tags are exactly 2 digits".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a transaction amount.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_amount(amount: &Amount) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    Ok(())
}

/// Returns true when a P2P name should be masked on the wire.
pub fn is_masked_name(name: &str) -> bool {
    name.is_empty() || name.eq_ignore_ascii_case(tags::MASKED_NAME)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn merchant() -> MerchantInfo {
        MerchantInfo::new(
            "111c3e1b-4312-49ec-b75e-4c8c74c10fd7",
            "BOUTIQUE CENTRALE",
            "Yamoussoukro",
            "CI",
        )
    }

    #[test]
    fn test_validate_merchant_info() {
        assert!(validate_merchant_info(&merchant(), QrType::Static).is_ok());

        let mut m = merchant();
        m.alias = "  ".into();
        assert!(matches!(
            validate_merchant_info(&m, QrType::Static),
            Err(ValidationError::Required { .. })
        ));

        let mut m = merchant();
        m.city = "Ouagadougou-Centre".into();
        assert_eq!(
            validate_merchant_info(&m, QrType::Static),
            Err(ValidationError::TooLong {
                field: "city".into(),
                max: 15
            })
        );

        let mut m = merchant();
        m.country_code = "FR".into();
        assert!(matches!(
            validate_merchant_info(&m, QrType::Static),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_uuid_alias_is_advisory() {
        let uuid_alias = MerchantInfo::new("111c3e1b-4312-49ec-b75e-4c8c74c10fd7", "SHOP", "Abidjan", "CI");
        assert!(uuid_alias.alias_is_uuid());
        assert!(validate_merchant_info(&uuid_alias, QrType::Static).is_ok());

        let plain_alias = MerchantInfo::new("shop-42", "SHOP", "Abidjan", "CI");
        assert!(!plain_alias.alias_is_uuid());
        assert!(validate_merchant_info(&plain_alias, QrType::Static).is_ok());
    }

    #[test]
    fn test_p2p_name_may_be_empty() {
        let mut m = merchant();
        m.name = String::new();
        assert!(validate_merchant_info(&m, QrType::Static).is_err());
        assert!(validate_merchant_info(&m, QrType::P2p).is_ok());
    }

    #[test]
    fn test_validate_reference() {
        assert!(validate_reference("transaction_id", "A").is_ok());
        assert!(validate_reference("transaction_id", &"A".repeat(25)).is_ok());
        assert!(validate_reference("transaction_id", &"A".repeat(26)).is_err());
        assert!(validate_reference("transaction_id", "abc_def").is_err());
        assert!(validate_reference("transaction_id", "é").is_err());
    }

    #[test]
    fn test_validate_additional_tag() {
        assert!(validate_additional_tag("05").is_ok());
        assert!(validate_additional_tag("5").is_err());
        assert!(validate_additional_tag("AB").is_err());
        assert!(validate_additional_tag("123").is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(&Amount::new(dec!(0.01))).is_ok());
        assert!(validate_amount(&Amount::new(dec!(0))).is_err());
        assert!(validate_amount(&Amount::new(dec!(-10))).is_err());
    }

    #[test]
    fn test_validate_intent_requirements() {
        let intent = PaymentIntent::new(QrType::Static);
        assert!(validate_intent(&intent).is_err());

        let intent = PaymentIntent::new(QrType::Dynamic).with_dynamic_url("https://psp.example/p/1");
        assert!(validate_intent(&intent).is_ok());

        let intent = PaymentIntent::new(QrType::P2p).with_dynamic_url("https://psp.example/p/1");
        assert!(validate_intent(&intent).is_err());

        let intent = PaymentIntent::new(QrType::Static)
            .with_merchant(merchant())
            .with_amount(0_i64);
        assert!(matches!(
            validate_intent(&intent),
            Err(ValidationError::MustBePositive { .. })
        ));

        let intent = PaymentIntent::new(QrType::Static)
            .with_merchant(merchant())
            .with_additional("X1", "value");
        assert!(validate_intent(&intent).is_err());
    }

    #[test]
    fn test_is_masked_name() {
        assert!(is_masked_name(""));
        assert!(is_masked_name("XXX"));
        assert!(is_masked_name("xxx"));
        assert!(!is_masked_name("Awa"));
    }
}
