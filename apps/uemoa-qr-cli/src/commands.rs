//! Command implementations.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use uemoa_qr_core::channel;
use uemoa_qr_core::{MerchantInfo, PaymentIntent, QrType};
use uemoa_qr_service::{QrConfig, QrService};

use crate::terminal::TerminalRenderer;
use crate::GenerateArgs;

pub fn build_service(config: QrConfig) -> QrService {
    QrService::new(config).with_renderer(Arc::new(TerminalRenderer))
}

/// Parses one `--extra TAG=VALUE` argument.
pub fn parse_extra(raw: &str) -> Result<(String, String), String> {
    let (tag, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TAG=VALUE, got '{}'", raw))?;
    if tag.len() != 2 || !tag.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("sub-tag must be two digits, got '{}'", tag));
    }
    Ok((tag.to_string(), value.to_string()))
}

/// Builds the intent from an optional JSON file plus flags.
pub fn build_intent(args: &GenerateArgs) -> Result<PaymentIntent> {
    let mut intent = match &args.json {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<PaymentIntent>(&text)
                .with_context(|| format!("parsing payment intent from {}", path.display()))?
        }
        None => PaymentIntent::new(QrType::Static),
    };

    if let Some(qr_type) = args.qr_type {
        intent.qr_type = qr_type;
    }

    let has_merchant_flags = args.alias.is_some()
        || args.name.is_some()
        || args.city.is_some()
        || args.country.is_some();
    if has_merchant_flags {
        let merchant = intent.merchant_info.get_or_insert_with(MerchantInfo::default);
        if let Some(alias) = &args.alias {
            merchant.alias = alias.clone();
        }
        if let Some(name) = &args.name {
            merchant.name = name.clone();
        }
        if let Some(city) = &args.city {
            merchant.city = city.clone();
        }
        if let Some(country) = &args.country {
            merchant.country_code = country.to_ascii_uppercase();
        }
    }

    if let Some(amount) = args.amount {
        intent.amount = Some(amount);
    }
    if let Some(id) = &args.tx_id {
        intent.transaction_id = Some(id.clone());
    }
    if let Some(reference) = &args.bill_ref {
        intent.bill_reference = Some(reference.clone());
    }
    if let Some(id) = &args.subscription_id {
        intent.subscription_id = Some(id.clone());
    }
    if let Some(code) = args.channel {
        match channel::from_code(code) {
            Some(found) => intent.merchant_channel = Some(found),
            None => bail!("unknown merchant channel code {}", code),
        }
    }
    if let Some(url) = &args.url {
        intent.dynamic_url = Some(url.clone());
    }
    for (tag, value) in &args.extra {
        intent.additional_data.insert(tag.clone(), value.clone());
    }

    Ok(intent)
}

pub fn generate(service: &QrService, args: GenerateArgs) -> Result<()> {
    let intent = build_intent(&args)?;
    debug!(?intent, "Payment intent assembled");

    let payload = service.generate_qr_data(&intent)?;
    println!("{}", payload);

    if args.show {
        let drawing = service.render_payload(&payload)?;
        println!("\n{}", String::from_utf8_lossy(&drawing));
    }
    Ok(())
}

pub fn parse(service: &QrService, data: &str) -> Result<()> {
    let intent = service.parse_qr_code(data.trim())?;
    println!("{}", serde_json::to_string_pretty(&intent)?);
    Ok(())
}

pub fn validate(service: &QrService, data: &str) -> ExitCode {
    if service.validate_qr_code(data.trim()) {
        println!("valid");
        ExitCode::SUCCESS
    } else {
        println!("invalid");
        ExitCode::FAILURE
    }
}

pub fn details(service: &QrService, data: &str) -> Result<()> {
    let details = service.qr_code_details(data.trim());
    println!("{}", serde_json::to_string_pretty(&details)?);
    Ok(())
}

pub fn config_show(config: &QrConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

pub fn config_init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let target = path
        .or_else(QrConfig::default_config_path)
        .context("no config directory available on this platform")?;

    if target.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", target.display());
    }

    let written = QrConfig::default().save(Some(target))?;
    info!(path = %written.display(), "Configuration written");
    println!("{}", written.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use uemoa_qr_core::MerchantChannel;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: GenerateArgs,
    }

    fn args(flags: &[&str]) -> GenerateArgs {
        let mut argv = vec!["uemoa-qr"];
        argv.extend_from_slice(flags);
        Harness::parse_from(argv).args
    }

    #[test]
    fn test_parse_extra() {
        assert_eq!(parse_extra("05=REF-1").unwrap(), ("05".into(), "REF-1".into()));
        assert_eq!(parse_extra("07=").unwrap(), ("07".into(), String::new()));
        assert!(parse_extra("5=x").is_err());
        assert!(parse_extra("AB=x").is_err());
        assert!(parse_extra("no-equals").is_err());
    }

    #[test]
    fn test_build_intent_from_flags() {
        let intent = build_intent(&args(&[
            "--type", "p2p", "--alias", "abc", "--name", "xxx", "--city", "Lome", "--country", "tg",
            "--amount", "1500.50", "--channel", "731", "--extra", "05=REF",
        ]))
        .unwrap();

        assert_eq!(intent.qr_type, QrType::P2p);
        let merchant = intent.merchant_info.unwrap();
        assert_eq!(merchant.country_code, "TG");
        assert_eq!(intent.amount.unwrap().to_plain_string(), "1500.50");
        assert_eq!(intent.merchant_channel, Some(MerchantChannel::P2pStatic));
        assert_eq!(intent.additional_data["05"], "REF");
    }

    #[test]
    fn test_unknown_channel_rejected() {
        assert!(build_intent(&args(&["--alias", "a", "--channel", "999"])).is_err());
    }

    #[test]
    fn test_json_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intent.json");
        std::fs::write(
            &path,
            r#"{
                "type": "DYNAMIC",
                "merchantInfo": {"alias": "a1", "name": "SHOP", "city": "Bamako", "countryCode": "ML"},
                "amount": "2000"
            }"#,
        )
        .unwrap();

        let intent = build_intent(&args(&["--json", path.to_str().unwrap(), "--tx-id", "TX-9"])).unwrap();
        assert_eq!(intent.qr_type, QrType::Dynamic);
        assert_eq!(intent.merchant_info.unwrap().city, "Bamako");
        assert_eq!(intent.transaction_id.as_deref(), Some("TX-9"));
    }

    #[test]
    fn test_config_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qr.toml");

        config_init(Some(path.clone()), false).unwrap();
        assert!(path.exists());
        assert!(config_init(Some(path.clone()), false).is_err());
        assert!(config_init(Some(path), true).is_ok());
    }
}
