use uuid::Uuid;

use super::customer::{Customer, CustomerWithOrders};
use super::errors::DomainError;
use super::order::{Order, OrderStatus};
use super::query::ListQuery;

/// The narrow persistence contract the order action service depends on.
///
/// `commit_transition` is a conditional write: it persists the order's
/// `status`/`taken_by_user_id` pair only if the stored pair still matches
/// `(expected_status, expected_holder)` at write time. Two callers racing on
/// the same order therefore cannot both win; the loser gets `Conflict`
/// (or `NotFound` if the order was deleted in between).
pub trait OrderStore: Send + Sync + 'static {
    fn find_order(&self, id: Uuid) -> Result<Option<Order>, DomainError>;

    fn commit_transition(
        &self,
        order: &Order,
        expected_status: OrderStatus,
        expected_holder: Option<Uuid>,
    ) -> Result<(), DomainError>;
}

/// Full order persistence surface used by the admin/read endpoints.
pub trait OrderRepository: OrderStore {
    fn create(&self, customer_id: Uuid, title: &str, description: &str)
        -> Result<Order, DomainError>;

    fn update_details(
        &self,
        id: Uuid,
        title: &str,
        description: &str,
    ) -> Result<Option<Order>, DomainError>;

    /// Returns the deleted order, or `None` if the id did not exist.
    fn delete(&self, id: Uuid) -> Result<Option<Order>, DomainError>;

    /// All-or-nothing delete. Returns `false`, deleting nothing, if any id
    /// is missing.
    fn delete_many(&self, ids: &[Uuid]) -> Result<bool, DomainError>;

    fn list(&self, query: &ListQuery) -> Result<Vec<Order>, DomainError>;

    fn list_by_customer_number(&self, customer_number: i32) -> Result<Vec<Order>, DomainError>;

    fn list_by_holder(
        &self,
        user_id: Uuid,
        sort_by: Option<&str>,
        is_descending: bool,
    ) -> Result<Vec<Order>, DomainError>;
}

#[derive(Debug, Clone)]
pub struct CustomerFields {
    pub customer_number: i32,
    pub first_name: String,
    pub second_name: String,
}

pub trait CustomerRepository: Send + Sync + 'static {
    fn create(&self, fields: CustomerFields) -> Result<Customer, DomainError>;

    fn update(&self, id: Uuid, fields: CustomerFields) -> Result<Option<Customer>, DomainError>;

    /// Returns the deleted customer, or `None` if the id did not exist.
    /// Deleting a customer also deletes its orders.
    fn delete(&self, id: Uuid) -> Result<Option<Customer>, DomainError>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<CustomerWithOrders>, DomainError>;

    fn find_by_number(&self, customer_number: i32)
        -> Result<Option<CustomerWithOrders>, DomainError>;

    fn id_by_number(&self, customer_number: i32) -> Result<Option<Uuid>, DomainError>;

    fn list(&self, query: &ListQuery) -> Result<Vec<CustomerWithOrders>, DomainError>;
}
