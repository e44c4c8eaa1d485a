//! # uemoa-qr-service: Configured QR Facade
//!
//! This crate wires the pure codec of `uemoa-qr-core` to configuration and
//! to the outside world: it loads the payload profile, validates intents,
//! and hands payloads to an image renderer.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Service Architecture                             │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      QrService (Facade)                          │  │
//! │  │                                                                  │  │
//! │  │  Shared by reference across threads                              │  │
//! │  │  Holds only immutable state                                      │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │   QrConfig     │  │  uemoa-qr-core │  │  BarcodeRenderer       │    │
//! │  │                │  │                │  │                        │    │
//! │  │ TOML file      │  │ validation     │  │ Supplied by the front  │    │
//! │  │ UEMOA_QR_* env │  │ QrGenerator    │  │ end; optional          │    │
//! │  │ validate()     │  │ QrParser       │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Configuration (payload profile, parser, image settings)
//! - [`error`] - Service error types
//! - [`render`] - Renderer collaborator seam
//! - [`service`] - The `QrService` facade and `QrDetails`
//!
//! ## Usage
//!
//! ```rust
//! use uemoa_qr_service::{QrConfig, QrService};
//! use uemoa_qr_core::{MerchantInfo, PaymentIntent, QrType};
//!
//! let service = QrService::new(QrConfig::default());
//! let intent = PaymentIntent::new(QrType::Static)
//!     .with_merchant(MerchantInfo::new("shop-1", "BOUTIQUE", "Dakar", "SN"));
//!
//! let payload = service.generate_qr_data(&intent).unwrap();
//! assert!(service.validate_qr_code(&payload));
//!
//! let details = service.qr_code_details(&payload);
//! assert_eq!(details.merchant.unwrap().city, "Dakar");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod render;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ImageFormat, ImageSettings, ParserSettings, PayloadSettings, QrConfig};
pub use error::{ServiceError, ServiceResult};
pub use render::{BarcodeRenderer, ImageSpec};
pub use service::{ChannelDetails, MerchantDetails, QrDetails, QrService};
