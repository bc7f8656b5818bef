use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{AccountId, AmortizationSystem, DebtType, TransactionKind};

/// one liability held by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtAccount {
    pub id: AccountId,
    pub name: String,
    pub debt_type: DebtType,
    /// signed balance, negative while money is owed
    pub balance: Money,
}

impl DebtAccount {
    pub fn new(id: AccountId, name: impl Into<String>, debt_type: DebtType, balance: Money) -> Self {
        Self {
            id,
            name: name.into(),
            debt_type,
            balance,
        }
    }

    /// amount still owed
    pub fn outstanding(&self) -> Money {
        self.balance.abs()
    }

    /// whether the account takes part in the projection
    pub fn is_projectable(&self) -> bool {
        self.balance.is_negative() && !self.debt_type.is_revolving()
    }
}

/// installment counts known for a debt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentTerms {
    pub total: u32,
    pub paid: u32,
}

impl InstallmentTerms {
    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.paid)
    }
}

/// optional loan metadata attached to a debt account.
///
/// every field may be unknown; use the accessors instead of reading the raw
/// options so the defaults stay in one place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanDetail {
    /// monthly nominal rate
    pub interest_rate: Option<Rate>,
    pub total_installments: Option<u32>,
    pub paid_installments: Option<u32>,
    pub amortization_system: Option<AmortizationSystem>,
    pub installment_override: Option<Money>,
    /// day of month the installment is due, display only
    pub due_day: Option<u8>,
}

impl LoanDetail {
    /// missing rate counts as interest free
    pub fn rate_or_zero(&self) -> Rate {
        self.interest_rate.unwrap_or(Rate::ZERO)
    }

    /// user-pinned installment, only when strictly positive
    pub fn active_override(&self) -> Option<Money> {
        self.installment_override.filter(|amount| amount.is_positive())
    }

    /// installment counts, `None` when the total is unknown or zero
    pub fn terms(&self) -> Option<InstallmentTerms> {
        match self.total_installments {
            Some(total) if total > 0 => Some(InstallmentTerms {
                total,
                paid: self.paid_installments.unwrap_or(0),
            }),
            _ => None,
        }
    }

    /// merge a partial override update into this record
    pub fn apply_override(&mut self, update: &LoanOverride) {
        if let Some(amount) = update.installment_override {
            self.installment_override = amount.is_positive().then_some(amount);
        }
        if let Some(system) = update.amortization_system {
            self.amortization_system = Some(system);
        }
    }
}

/// user edit of a loan: either field alone is a valid update.
///
/// a zero or negative installment clears the pinned value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanOverride {
    pub installment_override: Option<Money>,
    pub amortization_system: Option<AmortizationSystem>,
}

impl LoanOverride {
    pub fn installment(amount: Money) -> Self {
        Self {
            installment_override: Some(amount),
            amortization_system: None,
        }
    }

    pub fn system(system: AmortizationSystem) -> Self {
        Self {
            installment_override: None,
            amortization_system: Some(system),
        }
    }

    pub fn clear_installment() -> Self {
        Self::installment(Money::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.installment_override.is_none() && self.amortization_system.is_none()
    }
}

/// a posted transaction against an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub account_id: AccountId,
    pub amount: Money,
    pub posted_at: DateTime<Utc>,
    pub kind: TransactionKind,
}

impl PaymentRecord {
    pub fn expense(account_id: AccountId, amount: Money, posted_at: DateTime<Utc>) -> Self {
        Self {
            account_id,
            amount,
            posted_at,
            kind: TransactionKind::Expense,
        }
    }

    pub fn is_outbound(&self) -> bool {
        matches!(self.kind, TransactionKind::Expense)
    }
}

/// raw debt data for one user as delivered by the repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtPortfolio {
    pub accounts: Vec<DebtAccount>,
    pub loan_details: HashMap<AccountId, LoanDetail>,
}

impl DebtPortfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account: DebtAccount, detail: Option<LoanDetail>) -> Self {
        if let Some(detail) = detail {
            self.loan_details.insert(account.id, detail);
        }
        self.accounts.push(account);
        self
    }

    pub fn detail(&self, account_id: &AccountId) -> Option<&LoanDetail> {
        self.loan_details.get(account_id)
    }

    /// accounts that take part in the projection
    pub fn projectable_accounts(&self) -> impl Iterator<Item = &DebtAccount> {
        self.accounts.iter().filter(|account| account.is_projectable())
    }

    pub fn projectable_ids(&self) -> Vec<AccountId> {
        self.projectable_accounts().map(|account| account.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_projectable_filter() {
        let owed = DebtAccount::new(Uuid::new_v4(), "Carro", DebtType::Vehicle, Money::from_major(-5_000));
        let card = DebtAccount::new(Uuid::new_v4(), "Cartão", DebtType::RevolvingCredit, Money::from_major(-900));
        let settled = DebtAccount::new(Uuid::new_v4(), "Quitado", DebtType::PersonalLoan, Money::ZERO);
        let credit = DebtAccount::new(Uuid::new_v4(), "Credor", DebtType::Other, Money::from_major(20));

        let portfolio = DebtPortfolio::new()
            .with_account(owed.clone(), None)
            .with_account(card, None)
            .with_account(settled, None)
            .with_account(credit, None);

        assert_eq!(portfolio.projectable_ids(), vec![owed.id]);
        assert_eq!(owed.outstanding(), Money::from_major(5_000));
    }

    #[test]
    fn test_override_must_be_positive() {
        let mut detail = LoanDetail {
            installment_override: Some(Money::ZERO),
            ..LoanDetail::default()
        };
        assert_eq!(detail.active_override(), None);

        detail.installment_override = Some(Money::from_major(-10));
        assert_eq!(detail.active_override(), None);

        detail.installment_override = Some(Money::from_major(350));
        assert_eq!(detail.active_override(), Some(Money::from_major(350)));
    }

    #[test]
    fn test_terms_need_positive_total() {
        let mut detail = LoanDetail::default();
        assert!(detail.terms().is_none());

        detail.total_installments = Some(0);
        assert!(detail.terms().is_none());

        detail.total_installments = Some(48);
        let terms = detail.terms().unwrap();
        assert_eq!(terms.paid, 0);
        assert_eq!(terms.remaining(), 48);

        detail.paid_installments = Some(50);
        assert_eq!(detail.terms().unwrap().remaining(), 0);
    }

    #[test]
    fn test_rate_defaults_to_zero() {
        let mut detail = LoanDetail::default();
        assert_eq!(detail.rate_or_zero(), Rate::ZERO);
        detail.interest_rate = Some(Rate::from_percent(dec!(1.8)));
        assert_eq!(detail.rate_or_zero().as_percentage(), dec!(1.8));
    }

    #[test]
    fn test_partial_override_updates() {
        let mut detail = LoanDetail {
            installment_override: Some(Money::from_major(400)),
            amortization_system: Some(AmortizationSystem::EqualInstallment),
            ..LoanDetail::default()
        };

        detail.apply_override(&LoanOverride::system(AmortizationSystem::ConstantAmortization));
        assert_eq!(detail.installment_override, Some(Money::from_major(400)));
        assert_eq!(detail.amortization_system, Some(AmortizationSystem::ConstantAmortization));

        detail.apply_override(&LoanOverride::clear_installment());
        assert_eq!(detail.installment_override, None);
        assert_eq!(detail.amortization_system, Some(AmortizationSystem::ConstantAmortization));

        assert!(LoanOverride::default().is_empty());
    }
}
