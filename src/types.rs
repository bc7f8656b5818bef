use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a debt account
pub type AccountId = Uuid;

/// unique identifier for the portfolio owner
pub type UserId = Uuid;

/// kind of liability held by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebtType {
    Mortgage,
    Vehicle,
    PersonalLoan,
    Financing,
    /// credit cards and credit lines, never projected by this engine
    RevolvingCredit,
    Other,
}

impl DebtType {
    pub fn is_revolving(&self) -> bool {
        matches!(self, DebtType::RevolvingCredit)
    }
}

/// amortization convention for installment debts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmortizationSystem {
    /// PRICE: constant total payment, shrinking interest portion
    EqualInstallment,
    /// SAC: constant principal portion, shrinking total payment
    ConstantAmortization,
}

/// where a resolved monthly payment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentSource {
    /// user-pinned installment
    Override,
    /// computed from rate and installment counts
    Computed,
    /// not enough data, payment reported as zero
    Unknown,
}

/// kind of a posted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Expense,
    Income,
    Transfer,
}

/// display ordering for a debt list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoffStrategy {
    /// highest rate first
    Avalanche,
    /// smallest outstanding balance first
    Snowball,
}
