use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trading action derived from a predicted fractional return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSignal {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "NO TRADE")]
    NoTrade,
}

impl TradeSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSignal::Buy => "BUY",
            TradeSignal::Sell => "SELL",
            TradeSignal::NoTrade => "NO TRADE",
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self, TradeSignal::NoTrade)
    }
}

impl fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings() {
        assert_eq!(serde_json::to_string(&TradeSignal::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&TradeSignal::Sell).unwrap(), "\"SELL\"");
        assert_eq!(
            serde_json::to_string(&TradeSignal::NoTrade).unwrap(),
            "\"NO TRADE\""
        );
    }

    #[test]
    fn test_actionable() {
        assert!(TradeSignal::Buy.is_actionable());
        assert!(TradeSignal::Sell.is_actionable());
        assert!(!TradeSignal::NoTrade.is_actionable());
    }
}
