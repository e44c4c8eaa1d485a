//! Property-based tests for uemoa-qr-core
//!
//! Uses proptest to verify codec properties hold for arbitrary intents

use proptest::prelude::*;
use rust_decimal::Decimal;
use uemoa_qr_core::parser::{parse_with, ParseOptions};
use uemoa_qr_core::tlv::{decode_all, decode_composite, encode_field, to_ordered_map};
use uemoa_qr_core::{
    crc, generate, parse, Amount, CountryCode, MerchantInfo, PayloadProfile, PaymentIntent,
    QrError, QrType,
};

fn merchant_strategy() -> impl Strategy<Value = MerchantInfo> {
    (
        "[a-z0-9-]{1,36}",
        "[A-Z][A-Z ]{0,24}",
        "[A-Za-z]{1,15}",
        prop::sample::select(CountryCode::ALL.to_vec()),
    )
        .prop_map(|(alias, name, city, country)| {
            MerchantInfo::new(alias, name, city, country.as_str())
        })
}

fn amount_strategy() -> impl Strategy<Value = Amount> {
    (1i64..10_000_000_000i64, 0u32..3u32).prop_map(|(units, scale)| Amount::new(Decimal::new(units, scale)))
}

proptest! {
    /// parse(generate(intent)) gives back the merchant and the amount
    #[test]
    fn test_static_round_trip(merchant in merchant_strategy(), amount in amount_strategy()) {
        let intent = PaymentIntent::new(QrType::Static)
            .with_merchant(merchant.clone())
            .with_amount(amount);
        let payload = generate(&intent, &PayloadProfile::default()).unwrap();

        let parsed = parse(&payload).unwrap();
        let back = parsed.merchant_info.unwrap();
        prop_assert_eq!(back.alias, merchant.alias);
        prop_assert_eq!(back.name, merchant.name);
        prop_assert_eq!(back.city, merchant.city);
        prop_assert_eq!(back.country_code, merchant.country_code);
        prop_assert_eq!(parsed.amount, Some(amount));
    }

    /// Identical intents give identical bytes
    #[test]
    fn test_generation_is_deterministic(
        merchant in merchant_strategy(),
        amount in prop::option::of(amount_strategy()),
        qr_type in prop::sample::select(vec![QrType::Static, QrType::Dynamic, QrType::P2p]),
    ) {
        let mut intent = PaymentIntent::new(qr_type).with_merchant(merchant);
        intent.amount = amount;

        let first = generate(&intent, &PayloadProfile::default()).unwrap();
        let second = generate(&intent.clone(), &PayloadProfile::default()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Top-level tags come out strictly ascending and the CRC verifies
    #[test]
    fn test_tags_ascending(
        merchant in merchant_strategy(),
        amount in amount_strategy(),
        tx in "[A-Z0-9-]{1,25}",
    ) {
        let intent = PaymentIntent::new(QrType::Dynamic)
            .with_merchant(merchant)
            .with_amount(amount)
            .with_transaction_id(tx);
        let payload = generate(&intent, &PayloadProfile::default()).unwrap();

        let tags: Vec<String> = decode_all(&payload).into_iter().map(|f| f.tag).collect();
        for pair in tags.windows(2) {
            prop_assert!(pair[0] < pair[1], "tags out of order: {:?}", tags);
        }
        for expected in ["53", "54", "58", "59", "60"] {
            prop_assert!(tags.iter().any(|t| t == expected));
        }
        prop_assert!(crc::verify(&payload));
    }

    /// Values above 99 characters are refused
    #[test]
    fn test_length_ceiling(len in 100usize..300usize) {
        let value = "9".repeat(len);
        let is_too_long = matches!(encode_field("62", &value), Err(QrError::FieldTooLong { .. }));
        prop_assert!(is_too_long);
    }

    /// Values up to 99 characters encode with a two-digit length
    #[test]
    fn test_length_prefix(value in "[a-zA-Z0-9]{1,99}") {
        let encoded = encode_field("59", &value).unwrap();
        prop_assert_eq!(&encoded[2..4], format!("{:02}", value.len()));
        prop_assert_eq!(&encoded[4..], value.as_str());
    }

    /// P2P names that are empty or XXX always come out as XXX
    #[test]
    fn test_p2p_masking(
        merchant in merchant_strategy(),
        masked in prop::sample::select(vec!["", "XXX", "xxx", "Xxx"]),
    ) {
        let mut merchant = merchant;
        merchant.name = masked.to_string();
        let intent = PaymentIntent::new(QrType::P2p).with_merchant(merchant);
        let payload = generate(&intent, &PayloadProfile::default()).unwrap();

        let fields = to_ordered_map(&decode_all(&payload));
        prop_assert_eq!(fields["59"].as_str(), "XXX");
        let extra = to_ordered_map(&decode_composite(&fields["62"]));
        prop_assert_eq!(extra["11"].as_str(), "731");
    }

    /// Any change to the CRC makes parsing fail
    #[test]
    fn test_corrupted_crc_rejected(merchant in merchant_strategy(), delta in 1u16..=u16::MAX) {
        let intent = PaymentIntent::new(QrType::Static).with_merchant(merchant);
        let payload = generate(&intent, &PayloadProfile::default()).unwrap();

        let (body, crc_hex) = payload.split_at(payload.len() - 4);
        let original = u16::from_str_radix(crc_hex, 16).unwrap();
        let corrupted = format!("{}{:04X}", body, original ^ delta);

        let is_mismatch = matches!(parse(&corrupted), Err(QrError::CrcMismatch { .. }));
        prop_assert!(is_mismatch);
    }

    /// Channel 731 makes the code P2P whatever tag 01 says
    #[test]
    fn test_channel_inference(poi in prop::sample::select(vec!["11", "12"])) {
        let extra = encode_field("11", "731").unwrap();
        let body = format!(
            "000201{}{}6304",
            encode_field("01", poi).unwrap(),
            encode_field("62", &extra).unwrap()
        );
        let payload = format!("{}{}", body, crc::compute(&body).unwrap());

        let parsed = parse(&payload).unwrap();
        prop_assert_eq!(parsed.qr_type, QrType::P2p);
    }

    /// Decoding and lenient parsing never panic on arbitrary text
    #[test]
    fn test_decode_never_panics(input in any::<String>()) {
        let _ = decode_all(&input);
        let _ = parse_with(&input, &ParseOptions { validate_crc: false });
    }
}
