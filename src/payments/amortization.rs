use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::AmortizationSystem;

/// installment due this period for a debt with `outstanding` still owed.
///
/// `outstanding` is taken by absolute value. returns zero when nothing is
/// left to pay (no remaining installments or a zero balance).
pub fn compute_installment(
    outstanding: Money,
    monthly_rate: Rate,
    total_installments: u32,
    paid_installments: u32,
    system: AmortizationSystem,
) -> Money {
    AmortizationCalculator::new(system).installment(
        outstanding,
        monthly_rate,
        total_installments,
        paid_installments,
    )
}

/// amortization calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmortizationCalculator {
    system: AmortizationSystem,
}

impl AmortizationCalculator {
    pub fn new(system: AmortizationSystem) -> Self {
        Self { system }
    }

    pub fn system(&self) -> AmortizationSystem {
        self.system
    }

    /// payment for the current period
    pub fn installment(
        &self,
        outstanding: Money,
        monthly_rate: Rate,
        total_installments: u32,
        paid_installments: u32,
    ) -> Money {
        let remaining = total_installments.saturating_sub(paid_installments);
        let balance = outstanding.abs().as_decimal();

        if remaining == 0 || balance.is_zero() {
            return Money::ZERO;
        }

        let payment = match self.system {
            AmortizationSystem::EqualInstallment => {
                equal_installment(balance, monthly_rate.as_decimal(), remaining)
            }
            AmortizationSystem::ConstantAmortization => constant_amortization(
                balance,
                monthly_rate.as_decimal(),
                total_installments,
                remaining,
            ),
        };

        Money::from_decimal(payment)
    }
}

/// PMT = B * r(1 + r)^n / ((1 + r)^n - 1)
fn equal_installment(balance: Decimal, rate: Decimal, remaining: u32) -> Decimal {
    let even_split = balance / Decimal::from(remaining);
    if rate.is_zero() {
        return even_split;
    }

    match (Decimal::ONE + rate).checked_powu(u64::from(remaining)) {
        Some(compound) => rate
            .checked_mul(compound)
            .and_then(|numerator| numerator.checked_div(compound - Decimal::ONE))
            .and_then(|factor| balance.checked_mul(factor))
            .unwrap_or(even_split),
        // (1 + r)^n past decimal range, the annuity factor has converged to r
        None => balance * rate,
    }
}

/// fixed share of the implied original principal plus one period of interest
/// on what is still owed
fn constant_amortization(
    balance: Decimal,
    rate: Decimal,
    total_installments: u32,
    remaining: u32,
) -> Decimal {
    let total = Decimal::from(total_installments);
    let original_principal = balance * total / Decimal::from(remaining);
    let amortization = original_principal / total;
    amortization + balance * rate
}

/// one row of a remaining-period schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    pub installment_number: u32,
    pub beginning_balance: Money,
    pub payment_amount: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub ending_balance: Money,
}

/// schedule of the installments still to be paid on a debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemainingSchedule {
    pub system: AmortizationSystem,
    pub monthly_rate: Rate,
    pub installments: Vec<ScheduledInstallment>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl RemainingSchedule {
    /// re-run the calculator once per remaining period on the shrinking balance
    pub fn project(
        outstanding: Money,
        monthly_rate: Rate,
        total_installments: u32,
        paid_installments: u32,
        system: AmortizationSystem,
    ) -> Self {
        let calculator = AmortizationCalculator::new(system);
        let mut balance = outstanding.abs();
        let mut installments = Vec::new();

        for paid in paid_installments..total_installments {
            if balance.is_zero() {
                break;
            }

            let payment_amount =
                calculator.installment(balance, monthly_rate, total_installments, paid);
            let interest_portion = balance.apply_rate(monthly_rate);
            let principal_portion = payment_amount - interest_portion;
            let ending_balance = (balance - principal_portion).max(Money::ZERO);

            installments.push(ScheduledInstallment {
                installment_number: paid + 1,
                beginning_balance: balance,
                payment_amount,
                interest_portion,
                principal_portion,
                ending_balance,
            });

            balance = ending_balance;
        }

        // fold decimal residue into the last payment
        if let Some(last) = installments.last_mut() {
            if last.ending_balance.is_positive() && last.ending_balance < Money::from_minor(1, 2) {
                last.principal_portion += last.ending_balance;
                last.payment_amount += last.ending_balance;
                last.ending_balance = Money::ZERO;
            }
        }

        let total_interest: Money = installments.iter().map(|i| i.interest_portion).sum();
        let total_payment: Money = installments.iter().map(|i| i.payment_amount).sum();

        Self {
            system,
            monthly_rate,
            installments,
            total_interest,
            total_payment,
        }
    }

    pub fn next_installment(&self) -> Option<&ScheduledInstallment> {
        self.installments.first()
    }

    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }
}
