//! # QR Configuration
//!
//! Configuration management for the QR service.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     UEMOA_QR_CURRENCY_CODE=952                                         │
//! │     UEMOA_QR_VALIDATE_CRC=false                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/qr/qr.toml (Linux)                                       │
//! │     ~/Library/Application Support/com.uemoa.qr/qr.toml (macOS)         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     BCEAO profile: "01" / "0000" / "952" / "int.bceao.pi"              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loaded configuration is never mutated afterwards.
//!
//! ## Configuration File Format
//! ```toml
//! # qr.toml
//! debug_mode = false
//!
//! [payload]
//! default_country_code = "CI"
//! currency_code = "952"
//! payload_format_indicator = "01"
//! merchant_category_code = "0000"
//! authority_prefix = "int.bceao.pi"
//!
//! [parser]
//! validate_crc = true
//!
//! [image]
//! enabled = true
//! size = 300
//! margin = 1
//! format = "PNG"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use uemoa_qr_core::{CountryCode, ParseOptions, PayloadProfile, MAX_FIELD_VALUE_LEN};

use crate::error::{ServiceError, ServiceResult};
use crate::render::ImageSpec;

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "UEMOA_QR_";

// =============================================================================
// Image Format
// =============================================================================

/// Output format requested from the barcode renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormat {
    #[default]
    Png,
    #[serde(alias = "JPEG")]
    Jpg,
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "PNG"),
            ImageFormat::Jpg => write!(f, "JPG"),
        }
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PNG" => Ok(ImageFormat::Png),
            "JPG" | "JPEG" => Ok(ImageFormat::Jpg),
            other => Err(ServiceError::InvalidConfig(format!(
                "Unknown image format: '{}'. Valid options: PNG, JPG",
                other
            ))),
        }
    }
}

// =============================================================================
// Payload Settings
// =============================================================================

/// Constants written into every generated payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadSettings {
    /// Country used when a merchant leaves tag `58` empty.
    #[serde(default = "default_country_code")]
    pub default_country_code: String,

    /// Tag `53` (952 = XOF).
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Tag `00`.
    #[serde(default = "default_payload_format_indicator")]
    pub payload_format_indicator: String,

    /// Tag `52`.
    #[serde(default = "default_merchant_category_code")]
    pub merchant_category_code: String,

    /// Sub-tag `36/00`.
    #[serde(default = "default_authority_prefix")]
    pub authority_prefix: String,
}

fn default_country_code() -> String {
    uemoa_qr_core::DEFAULT_COUNTRY_CODE.to_string()
}

fn default_currency_code() -> String {
    uemoa_qr_core::DEFAULT_CURRENCY_CODE.to_string()
}

fn default_payload_format_indicator() -> String {
    uemoa_qr_core::DEFAULT_PAYLOAD_FORMAT_INDICATOR.to_string()
}

fn default_merchant_category_code() -> String {
    uemoa_qr_core::DEFAULT_MERCHANT_CATEGORY_CODE.to_string()
}

fn default_authority_prefix() -> String {
    uemoa_qr_core::DEFAULT_AUTHORITY_PREFIX.to_string()
}

impl Default for PayloadSettings {
    fn default() -> Self {
        PayloadSettings {
            default_country_code: default_country_code(),
            currency_code: default_currency_code(),
            payload_format_indicator: default_payload_format_indicator(),
            merchant_category_code: default_merchant_category_code(),
            authority_prefix: default_authority_prefix(),
        }
    }
}

// =============================================================================
// Parser Settings
// =============================================================================

/// Parser behavior settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserSettings {
    /// Reject payloads whose trailing CRC does not match.
    #[serde(default = "default_true")]
    pub validate_crc: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ParserSettings {
    fn default() -> Self {
        ParserSettings { validate_crc: true }
    }
}

// =============================================================================
// Image Settings
// =============================================================================

/// Parameters handed to the barcode renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSettings {
    /// Image output on/off.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Side length in pixels.
    #[serde(default = "default_image_size")]
    pub size: u32,

    /// Quiet zone in modules.
    #[serde(default = "default_image_margin")]
    pub margin: u32,

    /// Output format.
    #[serde(default)]
    pub format: ImageFormat,
}

fn default_image_size() -> u32 {
    300
}

fn default_image_margin() -> u32 {
    1
}

impl Default for ImageSettings {
    fn default() -> Self {
        ImageSettings {
            enabled: true,
            size: default_image_size(),
            margin: default_image_margin(),
            format: ImageFormat::default(),
        }
    }
}

// =============================================================================
// Main QR Configuration
// =============================================================================

/// Complete service configuration.
///
/// ## Example Config File
/// ```toml
/// debug_mode = true
///
/// [payload]
/// merchant_category_code = "5411"
///
/// [parser]
/// validate_crc = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrConfig {
    /// Verbose logging by default.
    #[serde(default)]
    pub debug_mode: bool,

    /// Payload constants.
    #[serde(default)]
    pub payload: PayloadSettings,

    /// Parser switches.
    #[serde(default)]
    pub parser: ParserSettings,

    /// Image output.
    #[serde(default)]
    pub image: ImageSettings,
}

impl QrConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (qr.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ServiceResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading QR config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ServiceResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ServiceError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ServiceError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ServiceError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "QR config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ServiceResult<()> {
        let payload = &self.payload;

        if !is_digits(&payload.currency_code, 3) {
            return Err(ServiceError::InvalidConfig(format!(
                "currency_code must be 3 digits, got: '{}'",
                payload.currency_code
            )));
        }

        if !is_digits(&payload.merchant_category_code, 4) {
            return Err(ServiceError::InvalidConfig(format!(
                "merchant_category_code must be 4 digits, got: '{}'",
                payload.merchant_category_code
            )));
        }

        if payload.payload_format_indicator.chars().count() != 2 {
            return Err(ServiceError::InvalidConfig(format!(
                "payload_format_indicator must be 2 characters, got: '{}'",
                payload.payload_format_indicator
            )));
        }

        let prefix_len = payload.authority_prefix.chars().count();
        if prefix_len == 0 || prefix_len > MAX_FIELD_VALUE_LEN {
            return Err(ServiceError::InvalidConfig(format!(
                "authority_prefix must be 1 to {} characters",
                MAX_FIELD_VALUE_LEN
            )));
        }

        if payload.default_country_code.parse::<CountryCode>().is_err() {
            return Err(ServiceError::InvalidConfig(format!(
                "default_country_code '{}' is not a member state",
                payload.default_country_code
            )));
        }

        if self.image.size == 0 {
            return Err(ServiceError::InvalidConfig(
                "image size must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any `UEMOA_QR_*` key lookup.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(code) = var("DEFAULT_COUNTRY_CODE") {
            debug!(country = %code, "Overriding default country from environment");
            self.payload.default_country_code = code;
        }

        if let Some(code) = var("CURRENCY_CODE") {
            debug!(currency = %code, "Overriding currency code from environment");
            self.payload.currency_code = code;
        }

        if let Some(pfi) = var("PAYLOAD_FORMAT_INDICATOR") {
            self.payload.payload_format_indicator = pfi;
        }

        if let Some(mcc) = var("MERCHANT_CATEGORY_CODE") {
            self.payload.merchant_category_code = mcc;
        }

        if let Some(prefix) = var("AUTHORITY_PREFIX") {
            debug!(prefix = %prefix, "Overriding authority prefix from environment");
            self.payload.authority_prefix = prefix;
        }

        if let Some(flag) = var("VALIDATE_CRC") {
            match parse_flag(&flag) {
                Some(on) => self.parser.validate_crc = on,
                None => warn!(value = %flag, "Ignoring non-boolean UEMOA_QR_VALIDATE_CRC"),
            }
        }

        if let Some(flag) = var("IMAGE_ENABLED") {
            match parse_flag(&flag) {
                Some(on) => self.image.enabled = on,
                None => warn!(value = %flag, "Ignoring non-boolean UEMOA_QR_IMAGE_ENABLED"),
            }
        }

        if let Some(size) = var("IMAGE_SIZE") {
            if let Ok(px) = size.parse::<u32>() {
                self.image.size = px;
            }
        }

        if let Some(margin) = var("IMAGE_MARGIN") {
            if let Ok(m) = margin.parse::<u32>() {
                self.image.margin = m;
            }
        }

        if let Some(format) = var("IMAGE_FORMAT") {
            match format.parse() {
                Ok(parsed) => self.image.format = parsed,
                Err(_) => warn!(format = %format, "Unknown image format in environment"),
            }
        }

        if let Some(flag) = var("DEBUG") {
            if let Some(on) = parse_flag(&flag) {
                self.debug_mode = on;
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "uemoa", "qr").map(|dirs| {
            let config_dir = dirs.config_dir();
            config_dir.join("qr.toml")
        })
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The slice of configuration the generators consume.
    pub fn payload_profile(&self) -> PayloadProfile {
        PayloadProfile {
            payload_format_indicator: self.payload.payload_format_indicator.clone(),
            merchant_category_code: self.payload.merchant_category_code.clone(),
            currency_code: self.payload.currency_code.clone(),
            authority_prefix: self.payload.authority_prefix.clone(),
        }
    }

    /// The slice of configuration the parser consumes.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            validate_crc: self.parser.validate_crc,
        }
    }

    /// Rendering parameters.
    pub fn image_spec(&self) -> ImageSpec {
        ImageSpec {
            size: self.image.size,
            margin: self.image.margin,
            format: self.image.format,
        }
    }

    /// Returns true if image output is switched on.
    pub fn images_enabled(&self) -> bool {
        self.image.enabled
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = QrConfig::default();
        assert_eq!(config.payload.currency_code, "952");
        assert_eq!(config.payload.payload_format_indicator, "01");
        assert_eq!(config.payload.merchant_category_code, "0000");
        assert_eq!(config.payload.authority_prefix, "int.bceao.pi");
        assert_eq!(config.payload.default_country_code, "CI");
        assert!(config.parser.validate_crc);
        assert!(config.image.enabled);
        assert_eq!(config.image.size, 300);
        assert_eq!(config.image.format, ImageFormat::Png);
        assert!(!config.debug_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_payload_profile_matches_core_default() {
        assert_eq!(QrConfig::default().payload_profile(), PayloadProfile::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = QrConfig::default();

        config.payload.currency_code = "95".into();
        assert!(config.validate().is_err());
        config.payload.currency_code = "XOF".into();
        assert!(config.validate().is_err());
        config.payload.currency_code = "952".into();

        config.payload.merchant_category_code = "54111".into();
        assert!(config.validate().is_err());
        config.payload.merchant_category_code = "5411".into();
        assert!(config.validate().is_ok());

        config.payload.authority_prefix = String::new();
        assert!(config.validate().is_err());
        config.payload.authority_prefix = "p".repeat(100);
        assert!(config.validate().is_err());
        config.payload.authority_prefix = "int.bceao.pi".into();

        config.payload.default_country_code = "FR".into();
        assert!(config.validate().is_err());
        config.payload.default_country_code = "SN".into();

        config.image.size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: QrConfig = toml::from_str(
            r#"
            [parser]
            validate_crc = false

            [image]
            format = "JPEG"
            "#,
        )
        .unwrap();
        assert!(!config.parser.validate_crc);
        assert_eq!(config.image.format, ImageFormat::Jpg);
        assert_eq!(config.image.size, 300);
        assert_eq!(config.payload.currency_code, "952");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<String, String> = [
            ("UEMOA_QR_CURRENCY_CODE", "950"),
            ("UEMOA_QR_VALIDATE_CRC", "false"),
            ("UEMOA_QR_IMAGE_SIZE", "512"),
            ("UEMOA_QR_IMAGE_FORMAT", "jpg"),
            ("UEMOA_QR_IMAGE_ENABLED", "maybe"),
            ("UEMOA_QR_DEBUG", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let mut config = QrConfig::default();
        config.apply_overrides(|key| env.get(key).cloned());

        assert_eq!(config.payload.currency_code, "950");
        assert!(!config.parser.validate_crc);
        assert_eq!(config.image.size, 512);
        assert_eq!(config.image.format, ImageFormat::Jpg);
        // Unparseable flags leave the value alone
        assert!(config.image.enabled);
        assert!(config.debug_mode);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("qr.toml");

        let mut config = QrConfig::default();
        config.payload.merchant_category_code = "5812".into();
        config.image.margin = 4;
        let written = config.save(Some(path.clone())).unwrap();
        assert_eq!(written, path);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[payload]"));
        assert!(contents.contains("[image]"));

        let loaded: QrConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qr.toml");
        std::fs::write(&path, "[payload]\ncurrency_code = \"12\"\n").unwrap();
        assert!(matches!(
            QrConfig::load(Some(path.clone())),
            Err(ServiceError::InvalidConfig(_))
        ));

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(matches!(
            QrConfig::load(Some(path)),
            Err(ServiceError::ConfigLoadFailed(_))
        ));
    }

    #[test]
    fn test_image_format_parsing() {
        assert_eq!("png".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("JPEG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpg);
        assert!("gif".parse::<ImageFormat>().is_err());
        assert_eq!(ImageFormat::Jpg.to_string(), "JPG");
    }
}
