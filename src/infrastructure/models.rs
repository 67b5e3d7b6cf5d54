use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::customer::Customer;
use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::schema::{customers, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerRow {
    pub id: Uuid,
    pub customer_number: i32,
    pub first_name: String,
    pub second_name: String,
    pub created_on: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = customers)]
pub struct NewCustomerRow {
    pub id: Uuid,
    pub customer_number: i32,
    pub first_name: String,
    pub second_name: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = orders)]
#[diesel(belongs_to(CustomerRow, foreign_key = customer_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub taken_by_user_id: Option<Uuid>,
    pub created_on: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
}

impl OrderRow {
    /// Stored statuses always come from `OrderStatus::as_str`; anything else
    /// means the row was written outside the application.
    pub fn into_order(self) -> Result<Order, DomainError> {
        let status = self.status.parse().map_err(DomainError::Internal)?;
        Ok(Order {
            id: self.id,
            customer_id: self.customer_id,
            title: self.title,
            description: self.description,
            status,
            taken_by_user_id: self.taken_by_user_id,
            created_on: self.created_on,
        })
    }
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            customer_number: row.customer_number,
            first_name: row.first_name,
            second_name: row.second_name,
            created_on: row.created_on,
        }
    }
}
