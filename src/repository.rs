//! data-access boundary of the engine.
//!
//! timeouts, retries and cancellation belong to implementations of
//! [`DebtRepository`]; the tracker surfaces their errors unmodified.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::{FreedomError, Result};
use crate::payments::MonthWindow;
use crate::portfolio::{DebtAccount, DebtPortfolio, LoanDetail, LoanOverride, PaymentRecord};
use crate::types::{AccountId, UserId};

#[async_trait]
pub trait DebtRepository: Send + Sync {
    /// debt accounts and their loan metadata for a user
    async fn fetch_debt_portfolio(&self, user_id: UserId) -> Result<DebtPortfolio>;

    /// outbound payments posted to the given accounts inside `window`
    async fn fetch_this_month_payments(
        &self,
        account_ids: &[AccountId],
        window: MonthWindow,
    ) -> Result<Vec<PaymentRecord>>;

    /// persist a partial override; fields left as `None` are untouched
    async fn write_loan_override(&self, account_id: AccountId, update: LoanOverride) -> Result<()>;
}

#[derive(Debug, Default)]
struct Store {
    accounts: HashMap<UserId, Vec<DebtAccount>>,
    loan_details: HashMap<AccountId, LoanDetail>,
    payments: Vec<PaymentRecord>,
}

/// in-process repository with switchable failures
#[derive(Debug, Default)]
pub struct InMemoryDebtRepository {
    store: RwLock<Store>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryDebtRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_account(&self, user_id: UserId, account: DebtAccount, detail: Option<LoanDetail>) {
        let mut store = self.store.write();
        if let Some(detail) = detail {
            store.loan_details.insert(account.id, detail);
        }
        store.accounts.entry(user_id).or_default().push(account);
    }

    pub fn record_payment(&self, payment: PaymentRecord) {
        self.store.write().payments.push(payment);
    }

    pub fn loan_detail(&self, account_id: &AccountId) -> Option<LoanDetail> {
        self.store.read().loan_details.get(account_id).cloned()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DebtRepository for InMemoryDebtRepository {
    async fn fetch_debt_portfolio(&self, user_id: UserId) -> Result<DebtPortfolio> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(FreedomError::data_unavailable("debt portfolio read failed"));
        }

        let store = self.store.read();
        let accounts: Vec<DebtAccount> = store
            .accounts
            .get(&user_id)
            .map(|accounts| accounts.iter().filter(|a| a.is_projectable()).cloned().collect())
            .unwrap_or_default();
        let loan_details = accounts
            .iter()
            .filter_map(|a| store.loan_details.get(&a.id).map(|d| (a.id, d.clone())))
            .collect();

        Ok(DebtPortfolio {
            accounts,
            loan_details,
        })
    }

    async fn fetch_this_month_payments(
        &self,
        account_ids: &[AccountId],
        window: MonthWindow,
    ) -> Result<Vec<PaymentRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(FreedomError::data_unavailable("payment read failed"));
        }

        let store = self.store.read();
        Ok(store
            .payments
            .iter()
            .filter(|p| account_ids.contains(&p.account_id))
            .filter(|p| p.is_outbound() && window.contains(p.posted_at))
            .cloned()
            .collect())
    }

    async fn write_loan_override(&self, account_id: AccountId, update: LoanOverride) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FreedomError::OverrideWriteFailed {
                account_id,
                message: "store rejected the update".to_string(),
            });
        }

        let mut store = self.store.write();
        let known = store.accounts.values().flatten().any(|a| a.id == account_id);
        if !known {
            return Err(FreedomError::OverrideWriteFailed {
                account_id,
                message: "unknown account".to_string(),
            });
        }

        store
            .loan_details
            .entry(account_id)
            .or_default()
            .apply_override(&update);
        Ok(())
    }
}
