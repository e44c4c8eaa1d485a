//! # QR Service
//!
//! The facade front ends talk to: validates intents, dispatches to the
//! generator for their type, parses and describes payloads, and hands
//! payloads to a renderer when images are wanted.
//!
//! ## Request Flow
//! ```text
//! PaymentIntent ──► fill config defaults ──► validate_intent ──► QrGenerator ──► payload
//!                                                                             │
//!                                                     BarcodeRenderer ◄───────┘ (images)
//!
//! payload ──► QrParser (validate_crc from config) ──► PaymentIntent / QrDetails
//! ```
//!
//! A `QrService` holds only immutable state and is shared by reference
//! (usually in an `Arc`) across threads.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

use uemoa_qr_core::validation::validate_intent;
use uemoa_qr_core::{
    Amount, MerchantChannel, PaymentIntent, QrGenerator, QrParser, QrType,
};

use crate::config::QrConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::render::BarcodeRenderer;

// =============================================================================
// Details
// =============================================================================

/// Merchant part of [`QrDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantDetails {
    pub name: String,
    pub city: String,
    pub country: String,
    pub alias: String,
}

/// Channel part of [`QrDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDetails {
    pub code: u16,
    pub description: String,
}

/// Summary of a payload, built even when the payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrDetails {
    pub valid: bool,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub qr_type: Option<QrType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<MerchantDetails>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelDetails>,

    /// Why the payload was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QrDetails {
    fn from_intent(intent: PaymentIntent) -> Self {
        QrDetails {
            valid: true,
            qr_type: Some(intent.qr_type),
            merchant: intent.merchant_info.map(|m| MerchantDetails {
                name: m.name,
                city: m.city,
                country: m.country_code,
                alias: m.alias,
            }),
            amount: intent.amount,
            transaction_id: intent.transaction_id,
            channel: intent.merchant_channel.map(channel_details),
            error: None,
        }
    }

    fn rejected(err: &ServiceError) -> Self {
        QrDetails {
            valid: false,
            error: Some(err.to_string()),
            ..Default::default()
        }
    }
}

fn channel_details(channel: MerchantChannel) -> ChannelDetails {
    ChannelDetails {
        code: channel.code(),
        description: channel.description().to_string(),
    }
}

// =============================================================================
// Service
// =============================================================================

/// Stateless QR facade.
#[derive(Clone)]
pub struct QrService {
    config: QrConfig,
    generator: QrGenerator,
    parser: QrParser,
    renderer: Option<Arc<dyn BarcodeRenderer>>,
}

impl std::fmt::Debug for QrService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrService")
            .field("config", &self.config)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl QrService {
    /// Creates a service from a loaded configuration.
    pub fn new(config: QrConfig) -> Self {
        QrService {
            generator: QrGenerator::new(config.payload_profile()),
            parser: QrParser::new(config.parse_options()),
            config,
            renderer: None,
        }
    }

    /// Attaches the collaborator used for image output.
    pub fn with_renderer(mut self, renderer: Arc<dyn BarcodeRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn config(&self) -> &QrConfig {
        &self.config
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Validates the intent and generates the payload for its type.
    pub fn generate_qr_data(&self, intent: &PaymentIntent) -> ServiceResult<String> {
        let intent = self.with_config_defaults(intent);

        info!(
            qr_type = %intent.qr_type,
            merchant = intent.merchant_info.as_ref().map(|m| m.name.as_str()).unwrap_or("N/A"),
            "Generating QR code"
        );

        validate_intent(&intent)?;
        let payload = self.generator.generate(&intent)?;

        debug!(payload = %payload, "QR code generated");
        Ok(payload)
    }

    pub fn generate_static_qr(&self, intent: &PaymentIntent) -> ServiceResult<String> {
        self.generate_qr_data(&retyped(intent, QrType::Static))
    }

    pub fn generate_dynamic_qr(&self, intent: &PaymentIntent) -> ServiceResult<String> {
        self.generate_qr_data(&retyped(intent, QrType::Dynamic))
    }

    pub fn generate_p2p_qr(&self, intent: &PaymentIntent) -> ServiceResult<String> {
        self.generate_qr_data(&retyped(intent, QrType::P2p))
    }

    /// Fills an empty merchant country from `payload.default_country_code`.
    fn with_config_defaults(&self, intent: &PaymentIntent) -> PaymentIntent {
        let mut intent = intent.clone();
        if let Some(merchant) = intent.merchant_info.as_mut() {
            if merchant.country_code.is_empty() {
                merchant.country_code = self.config.payload.default_country_code.clone();
            }
        }
        intent
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Parses a payload with the configured CRC policy.
    pub fn parse_qr_code(&self, data: &str) -> ServiceResult<PaymentIntent> {
        info!(len = data.len(), "Parsing QR code");
        Ok(self.parser.parse(data)?)
    }

    /// Returns true iff the payload parses.
    pub fn validate_qr_code(&self, data: &str) -> bool {
        match self.parse_qr_code(data) {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "Invalid QR code");
                false
            }
        }
    }

    /// Describes a payload; rejection is folded into the result.
    pub fn qr_code_details(&self, data: &str) -> QrDetails {
        match self.parse_qr_code(data) {
            Ok(intent) => QrDetails::from_intent(intent),
            Err(e) => QrDetails::rejected(&e),
        }
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Generates the payload for the intent and renders it.
    pub fn generate_qr_image(&self, intent: &PaymentIntent) -> ServiceResult<Vec<u8>> {
        let renderer = self.renderer()?;
        let payload = self.generate_qr_data(intent)?;
        self.render_with(renderer, &payload)
    }

    /// Renders an existing payload.
    pub fn render_payload(&self, data: &str) -> ServiceResult<Vec<u8>> {
        let renderer = self.renderer()?;
        self.render_with(renderer, data)
    }

    fn renderer(&self) -> ServiceResult<&dyn BarcodeRenderer> {
        if !self.config.images_enabled() {
            return Err(ServiceError::RenderingUnsupported(
                "image generation is disabled".into(),
            ));
        }
        self.renderer
            .as_deref()
            .ok_or_else(|| ServiceError::RenderingUnsupported("no renderer attached".into()))
    }

    fn render_with(&self, renderer: &dyn BarcodeRenderer, data: &str) -> ServiceResult<Vec<u8>> {
        let spec = self.config.image_spec();
        debug!(size = spec.size, margin = spec.margin, "Rendering QR image");

        let bytes = renderer.render(data, &spec)?;
        info!(bytes = bytes.len(), format = %spec.format, "QR image rendered");
        Ok(bytes)
    }
}

impl Default for QrService {
    fn default() -> Self {
        Self::new(QrConfig::default())
    }
}

fn retyped(intent: &PaymentIntent, qr_type: QrType) -> PaymentIntent {
    PaymentIntent {
        qr_type,
        ..intent.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ImageSpec;
    use rust_decimal_macros::dec;
    use uemoa_qr_core::tlv::{decode_all, to_ordered_map};
    use uemoa_qr_core::{MerchantInfo, QrError};

    const ALIAS: &str = "111c3e1b-4312-49ec-b75e-4c8c74c10fd7";

    fn merchant() -> MerchantInfo {
        MerchantInfo::new(ALIAS, "BOUTIQUE CENTRALE", "Abidjan", "CI")
    }

    fn echo_renderer() -> Arc<dyn BarcodeRenderer> {
        Arc::new(|data: &str, spec: &ImageSpec| -> ServiceResult<Vec<u8>> {
            Ok(format!("{}|{}|{}", spec.format, spec.size, data).into_bytes())
        })
    }

    #[test]
    fn test_generate_dispatches_on_type() {
        let service = QrService::default();
        let intent = PaymentIntent::new(QrType::Dynamic)
            .with_merchant(merchant())
            .with_amount(Amount::new(dec!(5000)));

        let payload = service.generate_qr_data(&intent).unwrap();
        let fields = to_ordered_map(&decode_all(&payload));
        assert_eq!(fields["01"], "12");
        assert_eq!(fields["54"], "5000");
    }

    #[test]
    fn test_typed_entry_points_force_type() {
        let service = QrService::default();
        let intent = PaymentIntent::new(QrType::Dynamic).with_merchant(merchant());

        let payload = service.generate_static_qr(&intent).unwrap();
        assert_eq!(service.parse_qr_code(&payload).unwrap().qr_type, QrType::Static);

        let payload = service.generate_p2p_qr(&intent).unwrap();
        assert_eq!(service.parse_qr_code(&payload).unwrap().qr_type, QrType::P2p);

        let payload = service.generate_dynamic_qr(&PaymentIntent::new(QrType::Static).with_merchant(merchant())).unwrap();
        assert_eq!(service.parse_qr_code(&payload).unwrap().qr_type, QrType::Dynamic);
    }

    #[test]
    fn test_validation_runs_before_generation() {
        let service = QrService::default();
        let mut long_city = merchant();
        long_city.city = "A".repeat(16);
        let intent = PaymentIntent::new(QrType::Static).with_merchant(long_city);

        let err = service.generate_qr_data(&intent).unwrap_err();
        assert!(err.is_validation_error());
        assert!(matches!(err, ServiceError::Qr(QrError::Validation(_))));
    }

    #[test]
    fn test_empty_country_takes_config_default() {
        let mut config = QrConfig::default();
        config.payload.default_country_code = "SN".into();
        let service = QrService::new(config);

        let mut m = merchant();
        m.country_code = String::new();
        let payload = service
            .generate_qr_data(&PaymentIntent::new(QrType::Static).with_merchant(m))
            .unwrap();
        assert!(payload.contains("5802SN"));
    }

    #[test]
    fn test_parse_honours_crc_setting() {
        let service = QrService::default();
        let payload = service
            .generate_qr_data(&PaymentIntent::new(QrType::Static).with_merchant(merchant()))
            .unwrap();
        let corrupted = format!("{}0000", &payload[..payload.len() - 4]);

        assert!(service.validate_qr_code(&payload));
        assert!(!service.validate_qr_code(&corrupted));

        let mut config = QrConfig::default();
        config.parser.validate_crc = false;
        let lenient = QrService::new(config);
        assert!(lenient.validate_qr_code(&corrupted));
    }

    #[test]
    fn test_details_for_valid_payload() {
        let service = QrService::default();
        let intent = PaymentIntent::new(QrType::Static)
            .with_merchant(merchant())
            .with_amount(Amount::new(dec!(1500.50)))
            .with_transaction_id("TX-42")
            .with_channel(MerchantChannel::StaticWithAmount);
        let payload = service.generate_qr_data(&intent).unwrap();

        let details = service.qr_code_details(&payload);
        assert!(details.valid);
        assert_eq!(details.qr_type, Some(QrType::Static));
        assert_eq!(details.amount, Some(Amount::new(dec!(1500.50))));
        assert_eq!(details.transaction_id.as_deref(), Some("TX-42"));
        let merchant = details.merchant.clone().unwrap();
        assert_eq!(merchant.alias, ALIAS);
        assert_eq!(merchant.country, "CI");
        let channel = details.channel.clone().unwrap();
        assert_eq!(channel.code, 110);

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["type"], "STATIC");
        assert_eq!(json["transactionId"], "TX-42");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_details_fold_errors() {
        let details = QrService::default().qr_code_details("");
        assert!(!details.valid);
        assert!(details.error.is_some());
        assert!(details.merchant.is_none());
    }

    #[test]
    fn test_rendering_requires_renderer() {
        let service = QrService::default();
        let err = service.render_payload("000201").unwrap_err();
        assert!(matches!(err, ServiceError::RenderingUnsupported(_)));
    }

    #[test]
    fn test_rendering_disabled_in_config() {
        let mut config = QrConfig::default();
        config.image.enabled = false;
        let service = QrService::new(config).with_renderer(echo_renderer());

        let err = service.render_payload("000201").unwrap_err();
        assert!(matches!(err, ServiceError::RenderingUnsupported(_)));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_generate_qr_image_passes_spec() {
        let mut config = QrConfig::default();
        config.image.size = 512;
        let service = QrService::new(config).with_renderer(echo_renderer());

        let intent = PaymentIntent::new(QrType::Static).with_merchant(merchant());
        let payload = service.generate_qr_data(&intent).unwrap();
        let bytes = service.generate_qr_image(&intent).unwrap();
        assert_eq!(bytes, format!("PNG|512|{}", payload).into_bytes());
    }

    #[test]
    fn test_service_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QrService>();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_service_across_tasks() {
        let service = Arc::new(QrService::default().with_renderer(echo_renderer()));
        let expected = service
            .generate_qr_data(
                &PaymentIntent::new(QrType::Dynamic)
                    .with_merchant(merchant())
                    .with_amount(Amount::from_units(2500)),
            )
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..32i64 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                let intent = PaymentIntent::new(QrType::Dynamic)
                    .with_merchant(merchant())
                    .with_amount(Amount::from_units(2500));
                let payload = service.generate_qr_data(&intent).unwrap();

                // Interleave with unrelated work on the same instance
                let other = PaymentIntent::new(QrType::P2p)
                    .with_merchant(merchant())
                    .with_transaction_id(format!("TX-{}", i));
                let p2p = service.generate_qr_data(&other).unwrap();
                assert_eq!(service.parse_qr_code(&p2p).unwrap().qr_type, QrType::P2p);
                assert!(service.render_payload(&p2p).is_ok());

                payload
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), expected);
        }
    }
}
