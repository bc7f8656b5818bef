use chrono::{DateTime, FixedOffset, Offset, Utc};
use hourglass_rs::SafeTimeProvider;

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::payments::{MonthWindow, PaymentStatusEvaluator};
use crate::portfolio::{DebtPortfolio, LoanOverride, PaymentRecord};
use crate::projection::{freedom_date, weighted_average_rate, FreedomProjector};
use crate::repository::DebtRepository;
use crate::resolver::InstallmentResolver;
use crate::summary::{DebtSnapshot, FreedomReport, FreedomSummary};
use crate::types::{AccountId, UserId};

/// aggregate a fetched portfolio into per-debt snapshots and portfolio figures.
///
/// accounts that are not owed or are revolving credit are skipped; a debt
/// without loan metadata is kept in the totals with a zero installment.
pub fn build_report(
    config: &EngineConfig,
    portfolio: &DebtPortfolio,
    payments: &[PaymentRecord],
    now: DateTime<Utc>,
) -> FreedomReport {
    let offset = calendar_offset(config);
    let window = MonthWindow::containing(now, offset);
    let resolver = InstallmentResolver::new(&config.inference);
    let evaluator = PaymentStatusEvaluator::new(config.payment_tolerance);

    let debts: Vec<DebtSnapshot> = portfolio
        .projectable_accounts()
        .map(|account| {
            let detail = portfolio.detail(&account.id);
            let resolved = resolver.resolve(account, detail);
            let status = evaluator.evaluate(account.id, resolved.monthly_payment, payments, &window);
            let terms = detail.and_then(|d| d.terms());

            DebtSnapshot {
                account_id: account.id,
                name: account.name.clone(),
                debt_type: account.debt_type,
                balance: account.balance,
                outstanding: account.outstanding(),
                interest_rate: resolved.monthly_rate,
                amortization_system: resolved.system,
                system_inferred: resolved.system_inferred,
                total_installments: terms.map(|t| t.total),
                paid_installments: terms.map(|t| t.paid),
                remaining_installments: terms.map(|t| t.remaining()),
                due_day: detail.and_then(|d| d.due_day),
                monthly_payment: resolved.monthly_payment,
                installment_source: resolved.source,
                paid_amount_this_month: status.paid_amount,
                paid_this_month: status.is_paid,
            }
        })
        .collect();

    let total_debt: Money = debts.iter().map(|d| d.outstanding).sum();
    let pay_this_month: Money = debts.iter().map(|d| d.due_this_month()).sum();
    let total_monthly_payment: Money = debts.iter().map(|d| d.monthly_payment).sum();
    let average_rate = weighted_average_rate(debts.iter().map(|d| (d.outstanding, d.interest_rate)));

    let projection = FreedomProjector::from_config(config).simulate(
        total_debt,
        total_monthly_payment,
        average_rate,
    );
    let today = now.with_timezone(&offset).date_naive();

    FreedomReport {
        summary: FreedomSummary {
            total_debt,
            pay_this_month,
            total_monthly_payment,
            weighted_average_rate: average_rate,
            months_to_freedom: projection.months,
            freedom_date: freedom_date(today, projection.months),
            projection_capped: projection.capped,
            generated_at: now,
        },
        debts,
    }
}

fn calendar_offset(config: &EngineConfig) -> FixedOffset {
    config.calendar_offset().unwrap_or_else(|| Utc.fix())
}

/// keeps the last computed report for one consumer and rebuilds it on demand
pub struct FreedomTracker<R> {
    repository: R,
    config: EngineConfig,
    report: Option<FreedomReport>,
    pub events: EventStore,
}

impl<R: DebtRepository> FreedomTracker<R> {
    /// create a tracker, rejecting an invalid configuration
    pub fn new(repository: R, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            repository,
            config,
            report: None,
            events: EventStore::new(),
        })
    }

    pub fn with_defaults(repository: R) -> Self {
        Self {
            repository,
            config: EngineConfig::default(),
            report: None,
            events: EventStore::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// last report, `None` until a refresh succeeds or after a failed one
    pub fn report(&self) -> Option<&FreedomReport> {
        self.report.as_ref()
    }

    pub fn summary(&self) -> Option<&FreedomSummary> {
        self.report.as_ref().map(|r| &r.summary)
    }

    /// current calendar month of the accounts
    pub fn month_window(&self, time_provider: &SafeTimeProvider) -> MonthWindow {
        MonthWindow::containing(time_provider.now(), calendar_offset(&self.config))
    }

    pub fn build_report(
        &self,
        portfolio: &DebtPortfolio,
        payments: &[PaymentRecord],
        time_provider: &SafeTimeProvider,
    ) -> FreedomReport {
        build_report(&self.config, portfolio, payments, time_provider.now())
    }

    /// refresh with system time
    pub async fn refresh_now(&mut self, user_id: UserId) -> Result<&FreedomReport> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.refresh(user_id, &time).await
    }

    /// fetch the portfolio and this month's payments, then rebuild the report.
    ///
    /// on a read failure the stored report is dropped and the collaborator's
    /// error is returned as is.
    pub async fn refresh(
        &mut self,
        user_id: UserId,
        time_provider: &SafeTimeProvider,
    ) -> Result<&FreedomReport> {
        let window = self.month_window(time_provider);

        let fetched = match self.repository.fetch_debt_portfolio(user_id).await {
            Ok(portfolio) => {
                let account_ids = portfolio.projectable_ids();
                self.repository
                    .fetch_this_month_payments(&account_ids, window)
                    .await
                    .map(|payments| (portfolio, payments))
            }
            Err(e) => Err(e),
        };

        let (portfolio, payments) = match fetched {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "debt data unavailable, clearing summary");
                self.report = None;
                self.events.emit(Event::PortfolioUnavailable {
                    user_id,
                    reason: e.to_string(),
                    timestamp: time_provider.now(),
                });
                return Err(e);
            }
        };

        let report = self.build_report(&portfolio, &payments, time_provider);
        tracing::info!(
            user_id = %user_id,
            debts = report.debts.len(),
            total_debt = %report.summary.total_debt,
            pay_this_month = %report.summary.pay_this_month,
            months_to_freedom = report.summary.months_to_freedom,
            "freedom summary rebuilt"
        );

        self.events.emit(Event::SummaryBuilt {
            user_id,
            debts: report.debts.len(),
            total_debt: report.summary.total_debt,
            pay_this_month: report.summary.pay_this_month,
            weighted_average_rate: report.summary.weighted_average_rate,
            months_to_freedom: report.summary.months_to_freedom,
            timestamp: time_provider.now(),
        });

        Ok(&*self.report.insert(report))
    }

    /// update override with system time
    pub async fn update_override_now(
        &mut self,
        user_id: UserId,
        account_id: AccountId,
        update: LoanOverride,
    ) -> Result<&FreedomReport> {
        let time = SafeTimeProvider::new(hourglass_rs::TimeSource::System);
        self.update_override(user_id, account_id, update, &time).await
    }

    /// persist a user override and rebuild the whole report.
    ///
    /// a rejected write leaves the stored report exactly as it was.
    pub async fn update_override(
        &mut self,
        user_id: UserId,
        account_id: AccountId,
        update: LoanOverride,
        time_provider: &SafeTimeProvider,
    ) -> Result<&FreedomReport> {
        if let Err(e) = self.repository.write_loan_override(account_id, update).await {
            tracing::warn!(account_id = %account_id, error = %e, "override write rejected");
            self.events.emit(Event::OverrideRejected {
                account_id,
                reason: e.to_string(),
                timestamp: time_provider.now(),
            });
            return Err(e);
        }

        tracing::info!(
            account_id = %account_id,
            installment_override = ?update.installment_override,
            amortization_system = ?update.amortization_system,
            "override written"
        );
        self.events.emit(Event::OverrideWritten {
            account_id,
            installment_override: update.installment_override,
            amortization_system: update.amortization_system,
            timestamp: time_provider.now(),
        });

        self.refresh(user_id, time_provider).await
    }
}
