use chrono::{DateTime, Locale, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::payments::RemainingSchedule;
use crate::types::{AccountId, AmortizationSystem, DebtType, InstallmentSource, PayoffStrategy};

/// render-ready view of one debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtSnapshot {
    pub account_id: AccountId,
    pub name: String,
    pub debt_type: DebtType,
    pub balance: Money,
    pub outstanding: Money,
    pub interest_rate: Rate,
    pub amortization_system: AmortizationSystem,
    pub system_inferred: bool,
    pub total_installments: Option<u32>,
    pub paid_installments: Option<u32>,
    pub remaining_installments: Option<u32>,
    pub due_day: Option<u8>,
    pub monthly_payment: Money,
    pub installment_source: InstallmentSource,
    pub paid_amount_this_month: Money,
    pub paid_this_month: bool,
}

impl DebtSnapshot {
    /// installments still due, only for a computed installment.
    ///
    /// a pinned override or an unresolvable debt has no schedule to show.
    pub fn schedule(&self) -> Option<RemainingSchedule> {
        if self.installment_source != InstallmentSource::Computed {
            return None;
        }
        let total = self.total_installments.filter(|total| *total > 0)?;
        Some(RemainingSchedule::project(
            self.outstanding,
            self.interest_rate,
            total,
            self.paid_installments.unwrap_or(0),
            self.amortization_system,
        ))
    }

    /// amount still expected this month
    pub fn due_this_month(&self) -> Money {
        if self.paid_this_month {
            Money::ZERO
        } else {
            self.monthly_payment
        }
    }
}

/// portfolio-level figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreedomSummary {
    pub total_debt: Money,
    /// installments not yet covered this month
    pub pay_this_month: Money,
    /// all resolved installments, the payment capacity used for the projection
    pub total_monthly_payment: Money,
    pub weighted_average_rate: Rate,
    pub months_to_freedom: u32,
    pub freedom_date: NaiveDate,
    pub projection_capped: bool,
    pub generated_at: DateTime<Utc>,
}

/// caller-side reading of the projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreedomOutlook {
    /// nothing owed
    DebtFree,
    /// debt exists but no installment could be resolved
    NoPaymentCapacity,
    Projected { months: u32, date: NaiveDate },
    /// the simulation hit its horizon with debt left
    BeyondHorizon { months: u32 },
}

impl FreedomSummary {
    pub fn outlook(&self) -> FreedomOutlook {
        if !self.total_debt.is_positive() {
            FreedomOutlook::DebtFree
        } else if self.months_to_freedom == 0 {
            FreedomOutlook::NoPaymentCapacity
        } else if self.projection_capped {
            FreedomOutlook::BeyondHorizon {
                months: self.months_to_freedom,
            }
        } else {
            FreedomOutlook::Projected {
                months: self.months_to_freedom,
                date: self.freedom_date,
            }
        }
    }

    pub fn freedom_label(&self, locale: Locale) -> String {
        format_month_year(self.freedom_date, locale)
    }
}

/// "Month Year" in the given locale
pub fn format_month_year(date: NaiveDate, locale: Locale) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized("%B %Y", locale)
        .to_string()
}

/// full engine output: aggregate figures plus every projected debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreedomReport {
    pub summary: FreedomSummary,
    pub debts: Vec<DebtSnapshot>,
}

impl FreedomReport {
    pub fn debt(&self, account_id: &AccountId) -> Option<&DebtSnapshot> {
        self.debts.iter().find(|d| &d.account_id == account_id)
    }

    /// debts still waiting for this month's installment
    pub fn unpaid(&self) -> impl Iterator<Item = &DebtSnapshot> {
        self.debts.iter().filter(|d| !d.paid_this_month)
    }

    /// debts ordered for display under a payoff strategy
    pub fn sorted_by(&self, strategy: PayoffStrategy) -> Vec<&DebtSnapshot> {
        let mut debts: Vec<&DebtSnapshot> = self.debts.iter().collect();
        match strategy {
            PayoffStrategy::Avalanche => debts.sort_by(|a, b| {
                b.interest_rate
                    .cmp(&a.interest_rate)
                    .then_with(|| b.outstanding.cmp(&a.outstanding))
            }),
            PayoffStrategy::Snowball => debts.sort_by(|a, b| {
                a.outstanding
                    .cmp(&b.outstanding)
                    .then_with(|| b.interest_rate.cmp(&a.interest_rate))
            }),
        }
        debts
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
