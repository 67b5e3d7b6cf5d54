use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of an order.
///
/// `Completed` and `Canceled` are terminal; nothing transitions out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "InProgress",
            OrderStatus::Completed => "Completed",
            OrderStatus::Canceled => "Canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Canceled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "InProgress" => Ok(OrderStatus::InProgress),
            "Completed" => Ok(OrderStatus::Completed),
            "Canceled" => Ok(OrderStatus::Canceled),
            other => Err(format!("unknown order status '{other}'")),
        }
    }
}

/// An order as the rest of the system sees it.
///
/// Invariant: `taken_by_user_id.is_some()` exactly when `status` is
/// `InProgress`. The transition methods below are the only code that touches
/// the `status`/`taken_by_user_id` pair; callers check preconditions first.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: OrderStatus,
    pub taken_by_user_id: Option<Uuid>,
    pub created_on: DateTime<Utc>,
}

impl Order {
    pub fn take(&mut self, user_id: Uuid) {
        self.taken_by_user_id = Some(user_id);
        self.status = OrderStatus::InProgress;
    }

    pub fn release(&mut self) {
        self.taken_by_user_id = None;
        self.status = OrderStatus::Pending;
    }

    pub fn complete(&mut self) {
        self.taken_by_user_id = None;
        self.status = OrderStatus::Completed;
    }

    pub fn cancel(&mut self) {
        self.taken_by_user_id = None;
        self.status = OrderStatus::Canceled;
    }

    pub fn is_taken(&self) -> bool {
        self.taken_by_user_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_order() -> Order {
        Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            title: "Window repair".to_string(),
            description: "Replace the broken pane in the workshop".to_string(),
            status: OrderStatus::Pending,
            taken_by_user_id: None,
            created_on: Utc::now(),
        }
    }

    #[test]
    fn take_sets_holder_and_in_progress() {
        let mut order = pending_order();
        let worker = Uuid::new_v4();

        order.take(worker);

        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.taken_by_user_id, Some(worker));
        assert!(order.is_taken());
    }

    #[test]
    fn release_clears_holder_and_returns_to_pending() {
        let mut order = pending_order();
        order.take(Uuid::new_v4());

        order.release();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.taken_by_user_id, None);
        assert!(!order.is_taken());
    }

    #[test]
    fn complete_clears_holder() {
        let mut order = pending_order();
        order.take(Uuid::new_v4());

        order.complete();

        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.taken_by_user_id, None);
    }

    #[test]
    fn cancel_clears_holder() {
        let mut order = pending_order();
        order.take(Uuid::new_v4());

        order.cancel();

        assert_eq!(order.status, OrderStatus::Canceled);
        assert_eq!(order.taken_by_user_id, None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::InProgress.is_terminal());
    }

    #[test]
    fn status_roundtrips_through_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::InProgress,
            OrderStatus::Completed,
            OrderStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("Unknown".parse::<OrderStatus>().is_err());
    }
}
