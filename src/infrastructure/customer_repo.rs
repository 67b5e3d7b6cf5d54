use diesel::helper_types::{AsSelect, IntoBoxed, Select};
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::customer::{Customer, CustomerWithOrders};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CustomerFields, CustomerRepository};
use crate::domain::query::ListQuery;
use crate::schema::customers;

use super::models::{CustomerRow, NewCustomerRow, OrderRow};

pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type BoxedCustomerQuery<'a> =
    IntoBoxed<'a, Select<customers::table, AsSelect<CustomerRow, Pg>>, Pg>;

fn apply_sort<'a>(
    q: BoxedCustomerQuery<'a>,
    sort_by: Option<&str>,
    is_descending: bool,
) -> BoxedCustomerQuery<'a> {
    match sort_by.unwrap_or("date").to_lowercase().as_str() {
        "firstname" => {
            if is_descending {
                q.order(customers::first_name.desc())
            } else {
                q.order(customers::first_name.asc())
            }
        }
        "secondname" | "name" => {
            if is_descending {
                q.order(customers::second_name.desc())
            } else {
                q.order(customers::second_name.asc())
            }
        }
        "customernumber" | "number" => {
            if is_descending {
                q.order(customers::customer_number.desc())
            } else {
                q.order(customers::customer_number.asc())
            }
        }
        _ => {
            if is_descending {
                q.order(customers::created_on.desc())
            } else {
                q.order(customers::created_on.asc())
            }
        }
    }
}

fn attach_orders(
    conn: &mut PgConnection,
    rows: Vec<CustomerRow>,
) -> Result<Vec<CustomerWithOrders>, DomainError> {
    let order_rows: Vec<OrderRow> = OrderRow::belonging_to(&rows).load(conn)?;
    let grouped = order_rows.grouped_by(&rows);

    rows.into_iter()
        .zip(grouped)
        .map(|(row, order_rows)| {
            let orders = order_rows
                .into_iter()
                .map(OrderRow::into_order)
                .collect::<Result<Vec<_>, DomainError>>()?;
            Ok(CustomerWithOrders {
                customer: row.into(),
                orders,
            })
        })
        .collect()
}

impl CustomerRepository for DieselCustomerRepository {
    fn create(&self, fields: CustomerFields) -> Result<Customer, DomainError> {
        let mut conn = self.pool.get()?;

        let row: CustomerRow = diesel::insert_into(customers::table)
            .values(&NewCustomerRow {
                id: Uuid::new_v4(),
                customer_number: fields.customer_number,
                first_name: fields.first_name,
                second_name: fields.second_name,
            })
            .returning(CustomerRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    fn update(&self, id: Uuid, fields: CustomerFields) -> Result<Option<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(customers::table.find(id))
            .set((
                customers::customer_number.eq(fields.customer_number),
                customers::first_name.eq(fields.first_name),
                customers::second_name.eq(fields.second_name),
            ))
            .returning(CustomerRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        Ok(row.map(Customer::from))
    }

    fn delete(&self, id: Uuid) -> Result<Option<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        // Orders cascade at the database level.
        let row = diesel::delete(customers::table.find(id))
            .returning(CustomerRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        Ok(row.map(Customer::from))
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<CustomerWithOrders>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = customers::table
            .find(id)
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(attach_orders(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn find_by_number(
        &self,
        customer_number: i32,
    ) -> Result<Option<CustomerWithOrders>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = customers::table
            .filter(customers::customer_number.eq(customer_number))
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(attach_orders(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn id_by_number(&self, customer_number: i32) -> Result<Option<Uuid>, DomainError> {
        let mut conn = self.pool.get()?;

        let id = customers::table
            .filter(customers::customer_number.eq(customer_number))
            .select(customers::id)
            .first(&mut conn)
            .optional()?;

        Ok(id)
    }

    fn list(&self, query: &ListQuery) -> Result<Vec<CustomerWithOrders>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut q = customers::table
            .select(CustomerRow::as_select())
            .into_boxed();

        if let Some(number) = query.customer_number {
            q = q.filter(customers::customer_number.eq(number));
        }
        if let Some(first_name) = &query.first_name {
            q = q.filter(customers::first_name.ilike(format!("%{first_name}%")));
        }
        if let Some(second_name) = &query.second_name {
            q = q.filter(customers::second_name.ilike(format!("%{second_name}%")));
        }
        q = apply_sort(q, query.sort_by.as_deref(), query.is_descending);

        let page = query.page_number.max(1);
        let page_size = query.page_size.clamp(1, 100);

        let rows: Vec<CustomerRow> = q
            .limit(page_size)
            .offset((page - 1) * page_size)
            .load(&mut conn)?;

        attach_orders(&mut conn, rows)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::DieselCustomerRepository;
    use crate::domain::customer::OverallStatus;
    use crate::domain::errors::DomainError;
    use crate::domain::order::OrderStatus;
    use crate::domain::ports::{CustomerFields, CustomerRepository, OrderRepository, OrderStore};
    use crate::domain::query::ListQuery;
    use crate::infrastructure::order_repo::DieselOrderRepository;
    use crate::infrastructure::test_support::setup_db;

    fn fields(number: i32, first: &str, second: &str) -> CustomerFields {
        CustomerFields {
            customer_number: number,
            first_name: first.to_string(),
            second_name: second.to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_find_with_orders() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCustomerRepository::new(pool.clone());
        let orders = DieselOrderRepository::new(pool);

        let customer = repo
            .create(fields(10001, "Ada", "Lovelace"))
            .expect("create failed");
        orders
            .create(customer.id, "Engine tune", "Adjust the difference engine")
            .expect("order create failed");

        let found = repo
            .find_by_id(customer.id)
            .expect("find failed")
            .expect("customer should exist");

        assert_eq!(found.customer, customer);
        assert_eq!(found.orders.len(), 1);
        assert_eq!(found.overall_status(), OverallStatus::Pending);

        let by_number = repo
            .find_by_number(10001)
            .expect("find_by_number failed")
            .expect("customer should exist");
        assert_eq!(by_number.customer.id, customer.id);

        assert_eq!(
            repo.id_by_number(10001).expect("id_by_number failed"),
            Some(customer.id)
        );
        assert_eq!(repo.id_by_number(99999).expect("id_by_number failed"), None);
    }

    #[tokio::test]
    async fn duplicate_customer_number_is_a_conflict() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCustomerRepository::new(pool);

        repo.create(fields(10002, "Grace", "Hopper"))
            .expect("create failed");
        let err = repo.create(fields(10002, "Other", "Person")).unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_rewrites_the_customer_fields() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCustomerRepository::new(pool);

        let customer = repo
            .create(fields(10003, "Alan", "Turing"))
            .expect("create failed");

        let updated = repo
            .update(customer.id, fields(10004, "Alan M.", "Turing"))
            .expect("update failed")
            .expect("customer should exist");

        assert_eq!(updated.customer_number, 10004);
        assert_eq!(updated.first_name, "Alan M.");

        assert!(repo
            .update(Uuid::new_v4(), fields(10005, "No", "One"))
            .expect("update failed")
            .is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_customer_and_its_orders() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCustomerRepository::new(pool.clone());
        let orders = DieselOrderRepository::new(pool);

        let customer = repo
            .create(fields(10006, "Barbara", "Liskov"))
            .expect("create failed");
        let order = orders
            .create(customer.id, "Subtype audit", "Check the substitution rules")
            .expect("order create failed");

        let deleted = repo.delete(customer.id).expect("delete failed").unwrap();
        assert_eq!(deleted.id, customer.id);

        assert!(repo.find_by_id(customer.id).expect("find failed").is_none());
        assert!(orders.find_order(order.id).expect("find failed").is_none());
        assert!(repo.delete(customer.id).expect("delete failed").is_none());
    }

    #[tokio::test]
    async fn list_filters_and_reports_overall_status() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCustomerRepository::new(pool.clone());
        let orders = DieselOrderRepository::new(pool);
        let worker = Uuid::new_v4();

        let smith = repo
            .create(fields(20001, "Anna", "Smith"))
            .expect("create failed");
        repo.create(fields(20002, "Bert", "Jones"))
            .expect("create failed");

        let mut order = orders
            .create(smith.id, "Site visit", "Walk the property with the owner")
            .expect("order create failed");
        order.take(worker);
        orders
            .commit_transition(&order, OrderStatus::Pending, None)
            .expect("commit failed");

        let query = ListQuery {
            second_name: Some("smith".to_string()),
            ..ListQuery::default()
        };
        let result = repo.list(&query).expect("list failed");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].customer.id, smith.id);
        assert_eq!(result[0].overall_status(), OverallStatus::InProgress);

        let all = repo.list(&ListQuery::default()).expect("list failed");
        assert_eq!(all.len(), 2);
    }
}
