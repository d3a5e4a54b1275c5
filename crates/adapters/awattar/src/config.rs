//! aWATTar integration configuration.

use serde::Deserialize;

/// Market area served by aWATTar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Country {
    #[default]
    De,
    At,
}

impl Country {
    /// Market-data endpoint for this country.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::De => "https://api.awattar.de/v1/marketdata",
            Self::At => "https://api.awattar.at/v1/marketdata",
        }
    }
}

impl std::str::FromStr for Country {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "DE" => Ok(Self::De),
            "AT" => Ok(Self::At),
            other => Err(format!("unsupported country {other:?}, expected DE or AT")),
        }
    }
}

/// Configuration for the aWATTar integration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AwattarConfig {
    pub country: Country,
    /// Fixed surcharge in ct/kWh added to the market price for the totals.
    pub base_price: f64,
    /// VAT in percent applied to the gross prices.
    pub vat_percent: f64,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AwattarConfig {
    fn default() -> Self {
        Self {
            country: Country::De,
            base_price: 0.0,
            vat_percent: 19.0,
            timeout_secs: 10,
        }
    }
}

impl AwattarConfig {
    /// Multiplier turning a net price into a gross one.
    #[must_use]
    pub fn vat_factor(&self) -> f64 {
        1.0 + self.vat_percent / 100.0
    }
}
