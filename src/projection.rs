use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, DEFAULT_MAX_PROJECTION_MONTHS};
use crate::decimal::{Money, Rate};

/// months until debt-free with the default 360-month horizon and 1% floor
pub fn project_months_to_freedom(
    total_debt: Money,
    total_monthly_payment: Money,
    weighted_average_rate: Rate,
) -> u32 {
    FreedomProjector::default().project_months(total_debt, total_monthly_payment, weighted_average_rate)
}

/// balance-weighted mean of the debts' rates: `Σ rate_i * |balance_i| / Σ |balance_i|`
pub fn weighted_average_rate<I>(debts: I) -> Rate
where
    I: IntoIterator<Item = (Money, Rate)>,
{
    let (weighted, total) = debts.into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(weighted, total), (balance, rate)| {
            let outstanding = balance.abs().as_decimal();
            (weighted + rate.as_decimal() * outstanding, total + outstanding)
        },
    );

    if total.is_zero() {
        return Rate::ZERO;
    }
    Rate::from_decimal(weighted / total)
}

/// result of a payoff simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreedomProjection {
    pub months: u32,
    /// debt left when the simulation stopped, zero unless capped
    pub remaining_debt: Money,
    /// the horizon ran out before the debt did
    pub capped: bool,
}

/// month-by-month payoff simulation under a fixed payment and a fixed rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreedomProjector {
    max_months: u32,
    minimum_reduction_share: Rate,
}

impl FreedomProjector {
    pub fn new(max_months: u32, minimum_reduction_share: Rate) -> Self {
        Self {
            max_months,
            minimum_reduction_share,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_projection_months, config.minimum_reduction_share)
    }

    pub fn max_months(&self) -> u32 {
        self.max_months
    }

    /// run the simulation.
    ///
    /// the rate is held for the whole horizon even though individual debts
    /// would close at different times. when the payment does not cover the
    /// month's interest, a fixed share of the starting debt is retired instead
    /// so the loop always terminates.
    pub fn simulate(
        &self,
        total_debt: Money,
        total_monthly_payment: Money,
        weighted_average_rate: Rate,
    ) -> FreedomProjection {
        if !total_monthly_payment.is_positive() || !total_debt.is_positive() {
            return FreedomProjection {
                months: 0,
                remaining_debt: total_debt.max(Money::ZERO),
                capped: false,
            };
        }

        let floor_reduction = total_debt.apply_rate(self.minimum_reduction_share);
        let mut remaining = total_debt;
        let mut months = 0;

        while remaining.is_positive() && months < self.max_months {
            let interest = remaining.apply_rate(weighted_average_rate);
            let amortization = total_monthly_payment - interest;

            if amortization.is_positive() {
                remaining -= amortization;
            } else {
                remaining -= floor_reduction;
            }
            months += 1;
        }

        let capped = remaining.is_positive();
        FreedomProjection {
            months,
            remaining_debt: remaining.max(Money::ZERO),
            capped,
        }
    }

    /// number of months until the balance reaches zero, capped at the horizon.
    ///
    /// returns 0 both when there is no debt and when there is no payment
    /// capacity; callers tell the two apart by the debt total.
    pub fn project_months(
        &self,
        total_debt: Money,
        total_monthly_payment: Money,
        weighted_average_rate: Rate,
    ) -> u32 {
        self.simulate(total_debt, total_monthly_payment, weighted_average_rate)
            .months
    }
}

impl Default for FreedomProjector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROJECTION_MONTHS, Rate::from_percentage(1))
    }
}

/// `today` advanced by whole calendar months, clamped to the month's last day
pub fn freedom_date(today: NaiveDate, months: u32) -> NaiveDate {
    today.checked_add_months(Months::new(months)).unwrap_or(today)
}
