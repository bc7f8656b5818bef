use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::inference::InferenceTable;
use crate::payments::compute_installment;
use crate::portfolio::{DebtAccount, LoanDetail};
use crate::types::{AmortizationSystem, InstallmentSource};

/// monthly payment chosen for one debt and how it was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedInstallment {
    pub monthly_payment: Money,
    pub source: InstallmentSource,
    /// rate the installment was resolved with, zero when the stored rate is
    /// missing or negative
    pub monthly_rate: Rate,
    pub system: AmortizationSystem,
    /// true when no convention was stored and the name heuristic picked one
    pub system_inferred: bool,
}

/// strict priority cascade: pinned override, then computed, then zero
#[derive(Debug, Clone, Copy)]
pub struct InstallmentResolver<'a> {
    inference: &'a InferenceTable,
}

impl<'a> InstallmentResolver<'a> {
    pub fn new(inference: &'a InferenceTable) -> Self {
        Self { inference }
    }

    pub fn resolve(&self, account: &DebtAccount, detail: Option<&LoanDetail>) -> ResolvedInstallment {
        let stored_system = detail.and_then(|d| d.amortization_system);
        let system = stored_system.unwrap_or_else(|| self.inference.infer_system(&account.name));
        let system_inferred = stored_system.is_none();
        let resolved = |monthly_payment, source, monthly_rate| ResolvedInstallment {
            monthly_payment,
            source,
            monthly_rate,
            system,
            system_inferred,
        };

        let Some(detail) = detail else {
            tracing::debug!(account_id = %account.id, "no loan detail, installment unknown");
            return resolved(Money::ZERO, InstallmentSource::Unknown, Rate::ZERO);
        };

        // a negative rate is bad data: it is neither computed with nor weighted
        let stored_rate = detail.rate_or_zero();
        let rate = if stored_rate.is_negative() {
            tracing::debug!(account_id = %account.id, rate = %stored_rate, "negative rate ignored");
            None
        } else {
            Some(stored_rate)
        };

        if let Some(pinned) = detail.active_override() {
            return resolved(pinned, InstallmentSource::Override, rate.unwrap_or(Rate::ZERO));
        }

        match (detail.terms(), rate) {
            (Some(terms), Some(rate)) => {
                let monthly_payment =
                    compute_installment(account.balance, rate, terms.total, terms.paid, system);
                tracing::debug!(
                    account_id = %account.id,
                    ?system,
                    system_inferred,
                    %monthly_payment,
                    "installment computed"
                );
                resolved(monthly_payment, InstallmentSource::Computed, rate)
            }
            (_, rate) => resolved(Money::ZERO, InstallmentSource::Unknown, rate.unwrap_or(Rate::ZERO)),
        }
    }
}
