/// override flow - refresh, pin an installment, watch the projection move
use debt_freedom_rs::chrono::{Locale, TimeZone, Utc};
use debt_freedom_rs::{
    AmortizationSystem, DebtAccount, DebtType, EngineConfig, FreedomTracker, InMemoryDebtRepository,
    LoanDetail, LoanOverride, Money, PaymentRecord, PayoffStrategy, Rate, SafeTimeProvider,
    TimeSource, Uuid,
};
use rust_decimal_macros::dec;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== override flow example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2026, 10, 18, 15, 0, 0).unwrap()
    ));

    let user = Uuid::new_v4();
    let repo = InMemoryDebtRepository::new();

    let loan = DebtAccount::new(Uuid::new_v4(), "Empréstimo Pessoal", DebtType::PersonalLoan, Money::from_major(-8_000));
    repo.insert_account(user, loan.clone(), Some(LoanDetail {
        interest_rate: Some(Rate::from_percent(dec!(2.9))),
        total_installments: Some(24),
        paid_installments: Some(6),
        amortization_system: Some(AmortizationSystem::EqualInstallment),
        due_day: Some(10),
        ..LoanDetail::default()
    }));

    let family = DebtAccount::new(Uuid::new_v4(), "Dívida Família", DebtType::Other, Money::from_major(-3_000));
    repo.insert_account(user, family.clone(), Some(LoanDetail {
        interest_rate: Some(Rate::ZERO),
        total_installments: Some(10),
        paid_installments: Some(0),
        ..LoanDetail::default()
    }));

    // card balances never enter the projection
    repo.insert_account(
        user,
        DebtAccount::new(Uuid::new_v4(), "Cartão", DebtType::RevolvingCredit, Money::from_major(-1_200)),
        None,
    );

    // family debt already settled this month
    repo.record_payment(PaymentRecord::expense(family.id, Money::from_major(300), time.now()));

    let mut tracker = FreedomTracker::new(repo, EngineConfig::brazil())?;

    let report = tracker.refresh(user, &time).await?;
    println!("total debt:        R$ {}", report.summary.total_debt.round_dp(2));
    println!("pay this month:    R$ {}", report.summary.pay_this_month.round_dp(2));
    println!("months to freedom: {}", report.summary.months_to_freedom);
    println!("freedom in:        {}", report.summary.freedom_label(Locale::pt_BR));

    println!("\navalanche order:");
    for debt in report.sorted_by(PayoffStrategy::Avalanche) {
        println!(
            "  {:<20} {:>6} R$ {:>10} paid: {}",
            debt.name,
            debt.interest_rate.to_string(),
            debt.monthly_payment.round_dp(2),
            debt.paid_this_month
        );
    }

    // pay the loan off faster
    let report = tracker
        .update_override(user, loan.id, LoanOverride::installment(Money::from_major(1_000)), &time)
        .await?;
    println!("\nafter pinning R$ 1000 on the loan:");
    println!("months to freedom: {}", report.summary.months_to_freedom);
    println!("freedom in:        {}", report.summary.freedom_label(Locale::pt_BR));

    // a non-positive value hands the installment back to the calculator
    let report = tracker
        .update_override(user, loan.id, LoanOverride::clear_installment(), &time)
        .await?;
    println!("\nafter clearing the override: {:?}", report.summary.outlook());

    println!("\nevents:");
    for event in tracker.events.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
