use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use super::order::{Order, OrderStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub customer_number: i32,
    pub first_name: String,
    pub second_name: String,
    pub created_on: DateTime<Utc>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.second_name)
    }
}

/// A customer together with the orders it owns, as returned by reads.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerWithOrders {
    pub customer: Customer,
    pub orders: Vec<Order>,
}

impl CustomerWithOrders {
    pub fn overall_status(&self) -> OverallStatus {
        overall_status(self.orders.iter().map(|o| o.status))
    }
}

/// Status of a customer derived from its orders. Recomputed on every read,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    NoOrders,
    Pending,
    InProgress,
    Completed,
    Canceled,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::NoOrders => "NoOrders",
            OverallStatus::Pending => "Pending",
            OverallStatus::InProgress => "InProgress",
            OverallStatus::Completed => "Completed",
            OverallStatus::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fold a customer's order statuses into one overall status.
pub fn overall_status(statuses: impl IntoIterator<Item = OrderStatus>) -> OverallStatus {
    let statuses: Vec<OrderStatus> = statuses.into_iter().collect();

    if statuses.is_empty() {
        return OverallStatus::NoOrders;
    }
    if statuses.iter().all(|s| *s == OrderStatus::Completed) {
        return OverallStatus::Completed;
    }
    if statuses.iter().all(|s| *s == OrderStatus::Canceled) {
        return OverallStatus::Canceled;
    }
    if statuses.iter().any(|s| *s == OrderStatus::InProgress) {
        return OverallStatus::InProgress;
    }
    OverallStatus::Pending
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_orders_yields_no_orders() {
        assert_eq!(overall_status([]), OverallStatus::NoOrders);
    }

    #[test]
    fn all_completed_yields_completed() {
        assert_eq!(
            overall_status([OrderStatus::Completed, OrderStatus::Completed]),
            OverallStatus::Completed
        );
    }

    #[test]
    fn all_canceled_yields_canceled() {
        assert_eq!(
            overall_status([OrderStatus::Canceled, OrderStatus::Canceled]),
            OverallStatus::Canceled
        );
    }

    #[test]
    fn any_in_progress_wins_over_pending() {
        assert_eq!(
            overall_status([OrderStatus::Pending, OrderStatus::InProgress]),
            OverallStatus::InProgress
        );
    }

    #[test]
    fn mixed_terminal_statuses_yield_pending() {
        // One completed, one canceled: neither "all" rule matches and nothing
        // is in progress, so the customer is reported Pending.
        assert_eq!(
            overall_status([OrderStatus::Completed, OrderStatus::Canceled]),
            OverallStatus::Pending
        );
    }

    #[test]
    fn all_pending_yields_pending() {
        assert_eq!(
            overall_status([OrderStatus::Pending, OrderStatus::Pending]),
            OverallStatus::Pending
        );
    }
}
