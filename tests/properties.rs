use debt_freedom_rs::{
    compute_installment, AmortizationSystem, DebtAccount, DebtType, FreedomProjector,
    InferenceTable, InstallmentResolver, InstallmentSource, LoanDetail, Money,
    PaymentStatusEvaluator, Rate,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

fn cents() -> impl Strategy<Value = Money> {
    (1i64..1_000_000_000).prop_map(|c| Money::from_minor(c, 2))
}

fn monthly_rate() -> impl Strategy<Value = Rate> {
    // 0.00% to 15.00% a month, in basis points
    (0i64..1_500).prop_map(|bp| Rate::from_decimal(Decimal::new(bp, 4)))
}

fn terms() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=420).prop_flat_map(|total| (Just(total), 0..total))
}

fn system() -> impl Strategy<Value = AmortizationSystem> {
    prop_oneof![
        Just(AmortizationSystem::EqualInstallment),
        Just(AmortizationSystem::ConstantAmortization),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_interest_free_price_splits_evenly(balance in cents(), (total, paid) in terms()) {
        let payment = compute_installment(balance, Rate::ZERO, total, paid, AmortizationSystem::EqualInstallment);
        let remaining = Decimal::from(total - paid);
        prop_assert_eq!(payment, balance / remaining);
    }

    #[test]
    fn prop_installment_is_deterministic(
        balance in cents(),
        rate in monthly_rate(),
        (total, paid) in terms(),
        system in system(),
    ) {
        let first = compute_installment(balance, rate, total, paid, system);
        let second = compute_installment(balance, rate, total, paid, system);
        prop_assert_eq!(first, second);
        prop_assert!(!first.is_negative());
    }

    #[test]
    fn prop_sign_of_balance_is_ignored(
        balance in cents(),
        rate in monthly_rate(),
        (total, paid) in terms(),
        system in system(),
    ) {
        prop_assert_eq!(
            compute_installment(-balance, rate, total, paid, system),
            compute_installment(balance, rate, total, paid, system)
        );
    }

    #[test]
    fn prop_installment_covers_interest(
        balance in cents(),
        rate in monthly_rate(),
        (total, paid) in terms(),
        system in system(),
    ) {
        let payment = compute_installment(balance, rate, total, paid, system);
        let interest = balance.apply_rate(rate);
        prop_assert!(payment >= interest - Money::from_minor(1, 2));
    }

    #[test]
    fn prop_sac_amortization_rebuilds_original_principal(
        balance in cents(),
        (total, paid) in terms(),
    ) {
        // at zero interest the whole installment is amortization
        let amortization = compute_installment(balance, Rate::ZERO, total, paid, AmortizationSystem::ConstantAmortization);
        let original = balance * Decimal::from(total) / Decimal::from(total - paid);
        let rebuilt = amortization * Decimal::from(total);
        prop_assert!((rebuilt - original).abs() <= Money::from_minor(1, 2));
    }

    #[test]
    fn prop_positive_override_always_wins(
        balance in cents(),
        pinned in cents(),
        (total, paid) in terms(),
    ) {
        let table = InferenceTable::default();
        let account = DebtAccount::new(Uuid::new_v4(), "Empréstimo", DebtType::PersonalLoan, -balance);
        let detail = LoanDetail {
            interest_rate: Some(Rate::from_percentage(2)),
            total_installments: Some(total),
            paid_installments: Some(paid),
            installment_override: Some(pinned),
            ..LoanDetail::default()
        };

        let resolved = InstallmentResolver::new(&table).resolve(&account, Some(&detail));
        prop_assert_eq!(resolved.monthly_payment, pinned);
        prop_assert_eq!(resolved.source, InstallmentSource::Override);
    }

    #[test]
    fn prop_non_positive_override_is_ignored(
        balance in cents(),
        pinned in 0i64..1_000_000,
        (total, paid) in terms(),
    ) {
        let table = InferenceTable::default();
        let account = DebtAccount::new(Uuid::new_v4(), "Empréstimo", DebtType::PersonalLoan, -balance);
        let detail = LoanDetail {
            interest_rate: Some(Rate::ZERO),
            total_installments: Some(total),
            paid_installments: Some(paid),
            installment_override: Some(Money::from_minor(-pinned, 2)),
            ..LoanDetail::default()
        };

        let resolved = InstallmentResolver::new(&table).resolve(&account, Some(&detail));
        prop_assert_eq!(resolved.source, InstallmentSource::Computed);
        prop_assert_eq!(
            resolved.monthly_payment,
            compute_installment(balance, Rate::ZERO, total, paid, resolved.system)
        );
    }

    #[test]
    fn prop_projection_never_exceeds_horizon(
        debt in cents(),
        payment in cents(),
        rate in monthly_rate(),
    ) {
        let projection = FreedomProjector::default().simulate(debt, payment, rate);
        prop_assert!(projection.months >= 1);
        prop_assert!(projection.months <= 360);
        prop_assert_eq!(projection.capped, projection.remaining_debt.is_positive());
    }

    #[test]
    fn prop_interest_free_projection_is_ceiling_division(
        debt in 1i64..1_000_000,
        payment in 1i64..100_000,
    ) {
        let months = FreedomProjector::default().project_months(
            Money::from_major(debt),
            Money::from_major(payment),
            Rate::ZERO,
        );
        let expected = ((debt + payment - 1) / payment).min(360);
        prop_assert_eq!(i64::from(months), expected);
    }

    #[test]
    fn prop_no_payment_or_no_debt_means_zero_months(amount in cents(), rate in monthly_rate()) {
        let projector = FreedomProjector::default();
        prop_assert_eq!(projector.project_months(amount, Money::ZERO, rate), 0);
        prop_assert_eq!(projector.project_months(Money::ZERO, amount, rate), 0);
    }

    #[test]
    fn prop_paying_the_installment_always_counts(payment in cents(), extra in 0i64..10_000) {
        let evaluator = PaymentStatusEvaluator::default();
        prop_assert!(evaluator.is_paid(payment, payment + Money::from_minor(extra, 2)));
        prop_assert!(!evaluator.is_paid(payment, payment - Money::from_minor(11 + extra, 2)));
    }
}

#[test]
fn test_extreme_rate_stays_finite() {
    let payment = compute_installment(
        Money::from_major(10_000),
        Rate::ONE,
        420,
        0,
        AmortizationSystem::EqualInstallment,
    );
    assert_eq!(payment.round_dp(2), Money::from_major(10_000));
}
