//! # Merchant Channels
//!
//! The channel code (sub-tag `11` of tag `62`) tells the payer's app which
//! business flow produced the code.
//!
//! ## Channel Table
//! ```text
//! ┌──────┬──────────────────────────────────────┬──────────────┐
//! │ Code │ Description                          │ Produced by  │
//! ├──────┼──────────────────────────────────────┼──────────────┤
//! │ 100  │ Static QR on site                    │ Static       │
//! │ 110  │ Static QR with amount                │ Static       │
//! │ 120  │ Static QR with transaction id        │ Static       │
//! │ 131  │ Static QR on invoice                 │ Static       │
//! │ 500  │ Dynamic QR on site                   │ Dynamic (*)  │
//! │ 521  │ Dynamic QR e-commerce web            │ Dynamic      │
//! │ 522  │ Dynamic QR e-commerce app            │ Dynamic      │
//! │ 731  │ Static QR person-to-person           │ P2P (forced) │
//! └──────┴──────────────────────────────────────┴──────────────┘
//!   (*) default when a dynamic intent names no channel
//! ```
//!
//! The table is fixed. Unknown codes are not errors: lookups return `None`
//! and the parser ignores them.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// A known merchant channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum MerchantChannel {
    StaticOnsite,
    StaticWithAmount,
    StaticWithTxid,
    StaticInvoice,
    DynamicOnsite,
    DynamicEcommerceWeb,
    DynamicEcommerceApp,
    P2pStatic,
}

/// Every channel with its code and description, in code order.
pub const CHANNEL_TABLE: [(MerchantChannel, u16, &str); 8] = [
    (MerchantChannel::StaticOnsite, 100, "Static QR on site"),
    (MerchantChannel::StaticWithAmount, 110, "Static QR with amount"),
    (MerchantChannel::StaticWithTxid, 120, "Static QR with transaction id"),
    (MerchantChannel::StaticInvoice, 131, "Static QR on invoice"),
    (MerchantChannel::DynamicOnsite, 500, "Dynamic QR on site"),
    (MerchantChannel::DynamicEcommerceWeb, 521, "Dynamic QR e-commerce web"),
    (MerchantChannel::DynamicEcommerceApp, 522, "Dynamic QR e-commerce app"),
    (MerchantChannel::P2pStatic, 731, "Static QR person-to-person"),
];

impl MerchantChannel {
    /// Numeric channel code as carried on the wire.
    pub const fn code(self) -> u16 {
        match self {
            MerchantChannel::StaticOnsite => 100,
            MerchantChannel::StaticWithAmount => 110,
            MerchantChannel::StaticWithTxid => 120,
            MerchantChannel::StaticInvoice => 131,
            MerchantChannel::DynamicOnsite => 500,
            MerchantChannel::DynamicEcommerceWeb => 521,
            MerchantChannel::DynamicEcommerceApp => 522,
            MerchantChannel::P2pStatic => 731,
        }
    }

    /// Human description of the flow.
    pub fn description(self) -> &'static str {
        CHANNEL_TABLE
            .iter()
            .find(|(channel, _, _)| *channel == self)
            .map(|(_, _, description)| *description)
            .unwrap_or_default()
    }

    /// Code as it is written into sub-tag `11`.
    pub fn wire_value(self) -> String {
        self.code().to_string()
    }

    /// Returns true for the person-to-person channel.
    pub fn is_p2p(self) -> bool {
        self == MerchantChannel::P2pStatic
    }
}

impl fmt::Display for MerchantChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.description())
    }
}

/// Resolves a numeric code against [`CHANNEL_TABLE`].
pub fn from_code(code: u16) -> Option<MerchantChannel> {
    CHANNEL_TABLE
        .iter()
        .find(|(_, c, _)| *c == code)
        .map(|(channel, _, _)| *channel)
}

/// Resolves the raw text of sub-tag `11`.
///
/// Non-numeric text and unknown codes both yield `None`.
pub fn from_wire(raw: &str) -> Option<MerchantChannel> {
    raw.trim().parse::<u16>().ok().and_then(from_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_code() {
        for (channel, code, _) in CHANNEL_TABLE {
            assert_eq!(channel.code(), code);
            assert_eq!(from_code(code), Some(channel));
        }
    }

    #[test]
    fn test_table_is_sorted_and_unique() {
        let codes: Vec<u16> = CHANNEL_TABLE.iter().map(|(_, c, _)| *c).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_from_wire() {
        assert_eq!(from_wire("731"), Some(MerchantChannel::P2pStatic));
        assert_eq!(from_wire("500"), Some(MerchantChannel::DynamicOnsite));
        assert_eq!(from_wire("999"), None);
        assert_eq!(from_wire("abc"), None);
        assert_eq!(from_wire(""), None);
    }

    #[test]
    fn test_description_and_display() {
        assert_eq!(MerchantChannel::StaticInvoice.description(), "Static QR on invoice");
        assert_eq!(
            MerchantChannel::P2pStatic.to_string(),
            "731 (Static QR person-to-person)"
        );
        assert!(MerchantChannel::P2pStatic.is_p2p());
        assert!(!MerchantChannel::DynamicOnsite.is_p2p());
    }
}
