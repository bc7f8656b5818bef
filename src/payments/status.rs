use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::portfolio::PaymentRecord;
use crate::types::AccountId;

/// half-open calendar month `[start, end)` expressed in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// calendar month containing `now` on a calendar at `offset` from UTC
    pub fn containing(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local = now.with_timezone(&offset).date_naive();
        let first = local.with_day(1).unwrap_or(local);
        let next = first.checked_add_months(Months::new(1)).unwrap_or(first);
        let shift = Duration::seconds(i64::from(offset.local_minus_utc()));

        Self {
            start: first.and_time(NaiveTime::MIN).and_utc() - shift,
            end: next.and_time(NaiveTime::MIN).and_utc() - shift,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// outcome of checking one debt against this month's payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub paid_amount: Money,
    pub is_paid: bool,
}

/// decides whether this month's installment has been covered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentStatusEvaluator {
    tolerance: Money,
}

impl PaymentStatusEvaluator {
    /// `tolerance` is an absolute amount, not a percentage
    pub fn new(tolerance: Money) -> Self {
        Self { tolerance }
    }

    /// sum of outbound amounts posted to the account inside the window
    pub fn paid_in_window(
        &self,
        account_id: AccountId,
        payments: &[PaymentRecord],
        window: &MonthWindow,
    ) -> Money {
        payments
            .iter()
            .filter(|p| p.account_id == account_id && p.is_outbound() && window.contains(p.posted_at))
            .map(|p| p.amount.abs())
            .sum()
    }

    /// a zero installment is never considered paid
    pub fn is_paid(&self, monthly_payment: Money, paid_amount: Money) -> bool {
        monthly_payment.is_positive() && paid_amount >= monthly_payment - self.tolerance
    }

    pub fn evaluate(
        &self,
        account_id: AccountId,
        monthly_payment: Money,
        payments: &[PaymentRecord],
        window: &MonthWindow,
    ) -> PaymentStatus {
        let paid_amount = self.paid_in_window(account_id, payments, window);
        PaymentStatus {
            paid_amount,
            is_paid: self.is_paid(monthly_payment, paid_amount),
        }
    }
}

impl Default for PaymentStatusEvaluator {
    fn default() -> Self {
        Self::new(Money::from_minor(10, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    fn october() -> MonthWindow {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        MonthWindow::containing(now, FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn test_tolerance_boundary() {
        let evaluator = PaymentStatusEvaluator::default();
        let installment = Money::from_major(100);

        assert!(evaluator.is_paid(installment, money("99.95")));
        assert!(evaluator.is_paid(installment, money("99.90")));
        assert!(!evaluator.is_paid(installment, money("99.85")));
        assert!(evaluator.is_paid(installment, money("140")));
    }

    #[test]
    fn test_zero_installment_never_paid() {
        let evaluator = PaymentStatusEvaluator::default();
        assert!(!evaluator.is_paid(Money::ZERO, Money::ZERO));
        assert!(!evaluator.is_paid(Money::ZERO, Money::from_major(500)));
    }

    #[test]
    fn test_window_bounds_utc() {
        let window = october();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap());
        assert!(window.contains(window.start));
        assert!(!window.contains(window.end));
    }

    #[test]
    fn test_window_follows_local_calendar() {
        // 01:00 UTC on Nov 1st is still October 31st in São Paulo
        let now = Utc.with_ymd_and_hms(2026, 11, 1, 1, 0, 0).unwrap();
        let window = MonthWindow::containing(now, FixedOffset::west_opt(3 * 3600).unwrap());

        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 10, 1, 3, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 11, 1, 3, 0, 0).unwrap());
        assert!(window.contains(now));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let now = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        let window = MonthWindow::containing(now, FixedOffset::east_opt(0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_sums_only_outbound_payments_for_account_in_month() {
        let window = october();
        let account = Uuid::new_v4();
        let other = Uuid::new_v4();
        let inside = Utc.with_ymd_and_hms(2026, 10, 5, 9, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2026, 9, 30, 23, 0, 0).unwrap();

        let payments = vec![
            PaymentRecord::expense(account, money("60"), inside),
            PaymentRecord::expense(account, money("-39.95"), inside),
            PaymentRecord::expense(account, money("500"), before),
            PaymentRecord::expense(other, money("500"), inside),
            PaymentRecord {
                account_id: account,
                amount: money("500"),
                posted_at: inside,
                kind: TransactionKind::Income,
            },
        ];

        let status = PaymentStatusEvaluator::default().evaluate(
            account,
            Money::from_major(100),
            &payments,
            &window,
        );
        assert_eq!(status.paid_amount, money("99.95"));
        assert!(status.is_paid);
    }
}
