//! # uemoa-qr-core: Payment QR Codec
//!
//! This crate is the **heart** of the UEMOA QR toolkit. It turns payment
//! intents into interoperable QR payloads and back, as pure functions with
//! zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        UEMOA QR Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    uemoa-qr (CLI)                               │   │
//! │  │      generate · parse · validate · details · config            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                uemoa-qr-service                                 │   │
//! │  │      QrConfig (TOML + env) · QrService · BarcodeRenderer        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ uemoa-qr-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │    tlv    │  │ generator │  │  parser   │  │   │
//! │  │   │  Intent   │  │  encode   │  │  static   │  │  CRC chk  │  │   │
//! │  │   │ Merchant  │  │  decode   │  │  dynamic  │  │  infer    │  │   │
//! │  │   │ TlvField  │  │    crc    │  │    p2p    │  │  rebuild  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SHARED STATE • PURE FUNCTIONS                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Field model (TlvField, PaymentIntent, MerchantInfo, ...)
//! - [`amount`] - Decimal amount with plain wire rendering
//! - [`channel`] - Fixed merchant channel table
//! - [`tags`] - Wire tag catalogue
//! - [`tlv`] - TLV encode/decode
//! - [`crc`] - CRC16-CCITT compute/verify
//! - [`generator`] - Static, dynamic, and P2P payload generation
//! - [`parser`] - Payload → intent
//! - [`validation`] - Business rules applied before generation
//! - [`error`] - Error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same intent, same bytes
//! 2. **Per-call State**: generators build a fresh field set on every call
//! 3. **Permissive Parsing**: only empty input and a bad CRC are errors
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use uemoa_qr_core::{generate, parse, MerchantInfo, PayloadProfile, PaymentIntent, QrType};
//!
//! let intent = PaymentIntent::new(QrType::Static).with_merchant(MerchantInfo::new(
//!     "111c3e1b-4312-49ec-b75e-4c8c74c10fd7",
//!     "BOUTIQUE CENTRALE",
//!     "Yamoussoukro",
//!     "CI",
//! ));
//!
//! let payload = generate(&intent, &PayloadProfile::default()).unwrap();
//! assert!(payload.contains("5303952"));
//! assert!(payload.contains("5802CI"));
//!
//! let back = parse(&payload).unwrap();
//! assert_eq!(back.merchant_info.unwrap().city, "Yamoussoukro");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod amount;
pub mod channel;
pub mod crc;
pub mod error;
pub mod generator;
pub mod parser;
pub mod tags;
pub mod tlv;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use amount::Amount;
pub use channel::MerchantChannel;
pub use error::{ErrorCategory, QrError, QrResult, ValidationError};
pub use generator::{generate, PayloadProfile, QrGenerator};
pub use parser::{parse, ParseOptions, QrParser};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest value a TLV field can carry (two-digit length).
pub const MAX_FIELD_VALUE_LEN: usize = tlv::MAX_VALUE_LEN;

/// Longest merchant name (tag `59`).
pub const MAX_NAME_LEN: usize = 25;

/// Longest merchant city (tag `60`).
pub const MAX_CITY_LEN: usize = 15;

/// Longest transaction id, bill reference, or subscription id.
pub const MAX_REFERENCE_LEN: usize = 25;

/// Tag `00` value.
pub const DEFAULT_PAYLOAD_FORMAT_INDICATOR: &str = "01";

/// Tag `52` value when nothing more specific is known.
pub const DEFAULT_MERCHANT_CATEGORY_CODE: &str = "0000";

/// Tag `53` value: the regional currency (XOF).
pub const DEFAULT_CURRENCY_CODE: &str = "952";

/// Sub-tag `36/00` value: the central bank's instant payment authority.
pub const DEFAULT_AUTHORITY_PREFIX: &str = "int.bceao.pi";

/// Country written into new configurations.
pub const DEFAULT_COUNTRY_CODE: CountryCode = CountryCode::CI;
