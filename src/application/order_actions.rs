use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::ports::OrderStore;

/// Orchestrates the four worker actions on an order: take, release,
/// complete, cancel.
///
/// Each operation loads the order, checks its guards, applies the entity
/// transition and commits it conditionally on the `(status, holder)` pair
/// observed at load time. Guards run before the write, so a failed call
/// never persists anything; the only post-write failure is losing the
/// conditional commit to a concurrent caller, which surfaces as `Conflict`.
pub struct OrderActionService<S> {
    store: S,
}

impl<S: OrderStore> OrderActionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn load_order(&self, order_id: Uuid) -> Result<Order, DomainError> {
        self.store
            .find_order(order_id)?
            .ok_or(DomainError::NotFound)
    }

    fn commit(&self, order: Order, from: (OrderStatus, Option<Uuid>)) -> Result<Order, DomainError> {
        self.store.commit_transition(&order, from.0, from.1)?;
        Ok(order)
    }

    pub fn take_order(&self, order_id: Uuid, user_id: Uuid) -> Result<Order, DomainError> {
        let mut order = self.load_order(order_id)?;

        if order.is_taken() {
            return Err(DomainError::Conflict("Order is already taken".to_string()));
        }
        match order.status {
            OrderStatus::Completed => {
                return Err(DomainError::Conflict("Order is already completed".to_string()))
            }
            OrderStatus::Canceled => {
                return Err(DomainError::Conflict("Order is already canceled".to_string()))
            }
            _ => {}
        }

        let from = (order.status, order.taken_by_user_id);
        order.take(user_id);
        self.commit(order, from)
    }

    pub fn release_order(&self, order_id: Uuid, user_id: Uuid) -> Result<Order, DomainError> {
        let mut order = self.load_order(order_id)?;

        if order.taken_by_user_id != Some(user_id) {
            return Err(DomainError::Forbidden(
                "You can only release your own orders".to_string(),
            ));
        }

        let from = (order.status, order.taken_by_user_id);
        order.release();
        self.commit(order, from)
    }

    pub fn complete_order(&self, order_id: Uuid, user_id: Uuid) -> Result<Order, DomainError> {
        let mut order = self.load_order(order_id)?;

        if order.status == OrderStatus::Completed {
            return Err(DomainError::Conflict("Order is already completed".to_string()));
        }
        if order.taken_by_user_id != Some(user_id) {
            return Err(DomainError::Forbidden(
                "You can only complete your own orders".to_string(),
            ));
        }

        let from = (order.status, order.taken_by_user_id);
        order.complete();
        self.commit(order, from)
    }

    pub fn cancel_order(&self, order_id: Uuid, user_id: Uuid) -> Result<Order, DomainError> {
        let mut order = self.load_order(order_id)?;

        if order.status == OrderStatus::Canceled {
            return Err(DomainError::Conflict("Order is already canceled".to_string()));
        }
        if order.taken_by_user_id != Some(user_id) {
            return Err(DomainError::Forbidden(
                "You can only cancel your own orders".to_string(),
            ));
        }

        let from = (order.status, order.taken_by_user_id);
        order.cancel();
        self.commit(order, from)
    }
}
