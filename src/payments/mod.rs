pub mod amortization;
pub mod status;

pub use amortization::{
    compute_installment, AmortizationCalculator, RemainingSchedule, ScheduledInstallment,
};
pub use status::{MonthWindow, PaymentStatus, PaymentStatusEvaluator};
