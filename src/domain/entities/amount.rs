use serde::{Deserialize, Serialize};

/// Monetary amount in centavos, the minor unit the processor works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centavos(pub i64);

impl Centavos {
    /// Converts an amount in reais, rounding to the nearest centavo.
    ///
    /// Returns `None` for NaN and infinities.
    pub fn from_reais(reais: f64) -> Option<Self> {
        if !reais.is_finite() {
            return None;
        }
        Some(Self((reais * 100.0).round() as i64))
    }

    pub fn as_reais(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for Centavos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amount as typed by the caller: frontends send either `73.2` or `"73.2"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReaisInput {
    Number(f64),
    Text(String),
}

impl ReaisInput {
    /// Parses the input as reais. A comma decimal separator is accepted.
    pub fn to_reais(&self) -> Option<f64> {
        match self {
            ReaisInput::Number(n) => Some(*n),
            ReaisInput::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        }
    }

    /// Zero and empty text count as "not provided".
    pub fn is_empty(&self) -> bool {
        match self {
            ReaisInput::Number(n) => *n == 0.0,
            ReaisInput::Text(s) => s.trim().is_empty(),
        }
    }
}
