/// quick start - minimal example to get started
use debt_freedom_rs::chrono::Utc;
use debt_freedom_rs::{build_report, DebtAccount, DebtPortfolio, DebtType, EngineConfig, LoanDetail, Money, Rate, Uuid};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a car loan: R$ 24,000 left, 1.49% a month, 18 of 48 installments paid
    let car = DebtAccount::new(Uuid::new_v4(), "Financiamento Carro", DebtType::Vehicle, Money::from_major(-24_000));
    let car_terms = LoanDetail {
        interest_rate: Some(Rate::from_percent(dec!(1.49))),
        total_installments: Some(48),
        paid_installments: Some(18),
        ..LoanDetail::default()
    };

    // an apartment: no system stored, the name points to constant amortization
    let home = DebtAccount::new(Uuid::new_v4(), "Apartamento Centro", DebtType::Mortgage, Money::from_major(-310_000));
    let home_terms = LoanDetail {
        interest_rate: Some(Rate::from_percent(dec!(0.75))),
        total_installments: Some(360),
        paid_installments: Some(40),
        ..LoanDetail::default()
    };

    let portfolio = DebtPortfolio::new()
        .with_account(car, Some(car_terms))
        .with_account(home, Some(home_terms));

    let report = build_report(&EngineConfig::brazil(), &portfolio, &[], Utc::now());

    // print current state
    println!("{}", report.to_json_pretty()?);

    Ok(())
}
