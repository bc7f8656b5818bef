pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod inference;
pub mod payments;
pub mod portfolio;
pub mod projection;
pub mod repository;
pub mod resolver;
pub mod summary;
pub mod tracker;
pub mod types;

// re-export key types
pub use config::EngineConfig;
pub use decimal::{Money, Rate};
pub use errors::{FreedomError, Result};
pub use events::{Event, EventStore};
pub use inference::InferenceTable;
pub use payments::{
    compute_installment, AmortizationCalculator, MonthWindow, PaymentStatus,
    PaymentStatusEvaluator, RemainingSchedule, ScheduledInstallment,
};
pub use portfolio::{
    DebtAccount, DebtPortfolio, InstallmentTerms, LoanDetail, LoanOverride, PaymentRecord,
};
pub use projection::{
    freedom_date, project_months_to_freedom, weighted_average_rate, FreedomProjection,
    FreedomProjector,
};
pub use repository::{DebtRepository, InMemoryDebtRepository};
pub use resolver::{InstallmentResolver, ResolvedInstallment};
pub use summary::{format_month_year, DebtSnapshot, FreedomOutlook, FreedomReport, FreedomSummary};
pub use tracker::{build_report, FreedomTracker};
pub use types::{
    AccountId, AmortizationSystem, DebtType, InstallmentSource, PayoffStrategy, TransactionKind,
    UserId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
