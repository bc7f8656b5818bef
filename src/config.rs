use chrono::FixedOffset;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{FreedomError, Result};
use crate::inference::InferenceTable;

/// hard ceiling for the payoff simulation (30 years)
pub const DEFAULT_MAX_PROJECTION_MONTHS: u32 = 360;

/// engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// absolute slack when comparing payments against the installment
    pub payment_tolerance: Money,
    pub max_projection_months: u32,
    /// share of the starting debt forcibly retired in months where the
    /// payment does not cover interest
    pub minimum_reduction_share: Rate,
    /// offset of the account calendar from UTC, used for month boundaries
    pub calendar_offset_seconds: i32,
    pub inference: InferenceTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            payment_tolerance: Money::from_decimal(dec!(0.1)),
            max_projection_months: DEFAULT_MAX_PROJECTION_MONTHS,
            minimum_reduction_share: Rate::from_percentage(1),
            calendar_offset_seconds: 0,
            inference: InferenceTable::default(),
        }
    }
}

impl EngineConfig {
    /// configuration for accounts kept on Brasília time (UTC-3)
    pub fn brazil() -> Self {
        Self {
            calendar_offset_seconds: -3 * 3600,
            ..Self::default()
        }
    }

    /// replace the real-estate token table
    pub fn with_inference(mut self, inference: InferenceTable) -> Self {
        self.inference = inference;
        self
    }

    pub fn with_calendar_offset(mut self, offset: FixedOffset) -> Self {
        self.calendar_offset_seconds = offset.local_minus_utc();
        self
    }

    /// parse and validate a json document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| FreedomError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.payment_tolerance.is_negative() {
            return Err(FreedomError::InvalidConfiguration {
                message: format!("payment tolerance must not be negative: {}", self.payment_tolerance),
            });
        }

        if self.max_projection_months == 0 {
            return Err(FreedomError::InvalidConfiguration {
                message: "projection horizon must be at least one month".to_string(),
            });
        }

        let share = self.minimum_reduction_share.as_decimal();
        if share <= Decimal::ZERO || share > Decimal::ONE {
            return Err(FreedomError::InvalidConfiguration {
                message: format!(
                    "minimum reduction share must be in (0%, 100%]: {}",
                    self.minimum_reduction_share
                ),
            });
        }

        if self.calendar_offset().is_none() {
            return Err(FreedomError::InvalidConfiguration {
                message: format!("calendar offset out of range: {}s", self.calendar_offset_seconds),
            });
        }

        Ok(())
    }

    pub fn calendar_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.calendar_offset_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AmortizationSystem;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.payment_tolerance, Money::from_minor(10, 2));
        assert_eq!(config.max_projection_months, 360);
        assert_eq!(config.minimum_reduction_share.as_decimal(), dec!(0.01));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_document() {
        let config = EngineConfig::from_json(r#"{ "max_projection_months": 120 }"#).unwrap();
        assert_eq!(config.max_projection_months, 120);
        assert_eq!(config.payment_tolerance, Money::from_minor(10, 2));
    }

    #[test]
    fn test_from_json_custom_tokens() {
        let config = EngineConfig::from_json(r#"{ "inference": ["Chalet"] }"#).unwrap();
        assert_eq!(
            config.inference.infer_system("Chalet Loan"),
            AmortizationSystem::ConstantAmortization
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = EngineConfig {
            max_projection_months: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FreedomError::InvalidConfiguration { .. })
        ));

        let config = EngineConfig {
            calendar_offset_seconds: 90_000,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        assert!(EngineConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_brazil_offset() {
        let config = EngineConfig::brazil();
        assert_eq!(config.calendar_offset().unwrap().local_minus_utc(), -10_800);
    }
}
