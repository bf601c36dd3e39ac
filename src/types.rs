// =============================================================================
// Shared types used across the multi-timeframe analyst
// =============================================================================

use serde::{Deserialize, Serialize};

/// Candle bucket duration. Declaration order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "1d")]
    D1,
}

impl Timeframe {
    /// Every analysed timeframe, shortest first.
    pub const ALL: [Timeframe; 4] = [Self::M15, Self::M30, Self::H1, Self::D1];

    /// Interval code understood by the exchange kline endpoint.
    pub fn code(self) -> &'static str {
        match self {
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::H1 => "1h",
            Self::D1 => "1d",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Directional trade signal derived from RSI and the EMA stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Long,
    Short,
    Neutral,
}

impl Signal {
    /// User-facing advice label.
    pub fn advice(self) -> &'static str {
        match self {
            Self::Long => "LONG signal",
            Self::Short => "SHORT signal",
            Self::Neutral => "Wait / Neutral",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// RSI band: below 30 oversold, above 70 overbought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Oversold => write!(f, "oversold"),
            Self::Neutral => write!(f, "neutral"),
            Self::Overbought => write!(f, "overbought"),
        }
    }
}

/// Relative ordering of the fast and slow EMA. A tie counts as bearish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crossover {
    Bullish,
    Bearish,
}

impl std::fmt::Display for Crossover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "bullish"),
            Self::Bearish => write!(f, "bearish"),
        }
    }
}

/// Which side of the market price a stop-loss sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopSide {
    BelowPrice,
    AbovePrice,
}

impl std::fmt::Display for StopSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BelowPrice => write!(f, "below price"),
            Self::AbovePrice => write!(f, "above price"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframes_in_report_order() {
        let codes: Vec<&str> = Timeframe::ALL.iter().map(|tf| tf.code()).collect();
        assert_eq!(codes, vec!["15m", "30m", "1h", "1d"]);
    }

    #[test]
    fn timeframe_serialises_as_exchange_code() {
        assert_eq!(serde_json::to_string(&Timeframe::H1).unwrap(), "\"1h\"");
        let tf: Timeframe = serde_json::from_str("\"1d\"").unwrap();
        assert_eq!(tf, Timeframe::D1);
    }

    #[test]
    fn signal_advice_labels() {
        assert_eq!(Signal::Long.advice(), "LONG signal");
        assert_eq!(Signal::Short.advice(), "SHORT signal");
        assert_eq!(Signal::Neutral.advice(), "Wait / Neutral");
        assert_eq!(serde_json::to_string(&Signal::Neutral).unwrap(), "\"NEUTRAL\"");
    }
}
