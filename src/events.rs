use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{AccountId, AmortizationSystem, UserId};

/// all events that can be emitted by the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    SummaryBuilt {
        user_id: UserId,
        debts: usize,
        total_debt: Money,
        pay_this_month: Money,
        weighted_average_rate: Rate,
        months_to_freedom: u32,
        timestamp: DateTime<Utc>,
    },
    PortfolioUnavailable {
        user_id: UserId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    OverrideWritten {
        account_id: AccountId,
        installment_override: Option<Money>,
        amortization_system: Option<AmortizationSystem>,
        timestamp: DateTime<Utc>,
    },
    OverrideRejected {
        account_id: AccountId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Event::SummaryBuilt { timestamp, .. }
            | Event::PortfolioUnavailable { timestamp, .. }
            | Event::OverrideWritten { timestamp, .. }
            | Event::OverrideRejected { timestamp, .. } => *timestamp,
        }
    }

    /// true for events that report a failed collaborator call
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::PortfolioUnavailable { .. } | Event::OverrideRejected { .. }
        )
    }
}

/// tracker event log, drained by the consumer
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_failure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn test_failures_filtered_and_drained() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let mut store = EventStore::new();
        store.emit(Event::OverrideRejected {
            account_id: Uuid::new_v4(),
            reason: "offline".to_string(),
            timestamp: at,
        });
        store.emit(Event::OverrideWritten {
            account_id: Uuid::new_v4(),
            installment_override: Some(Money::from_major(500)),
            amortization_system: None,
            timestamp: at,
        });

        assert_eq!(store.failures().count(), 1);
        assert_eq!(store.last().map(|e| e.timestamp()), Some(at));
        assert_eq!(store.take_events().len(), 2);
        assert!(store.events().is_empty());
    }
}
