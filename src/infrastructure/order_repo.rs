use diesel::helper_types::{AsSelect, InnerJoin, IntoBoxed, Select};
use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::ports::{OrderRepository, OrderStore};
use crate::domain::query::ListQuery;
use crate::schema::{customers, orders};

use super::models::{NewOrderRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match e {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type BoxedOrderQuery<'a> =
    IntoBoxed<'a, Select<InnerJoin<orders::table, customers::table>, AsSelect<OrderRow, Pg>>, Pg>;

fn apply_sort<'a>(
    q: BoxedOrderQuery<'a>,
    sort_by: Option<&str>,
    is_descending: bool,
) -> BoxedOrderQuery<'a> {
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
                q.order(orders::created_on.desc())
            } else {
                q.order(orders::created_on.asc())
            }
        }
    }
}

impl OrderStore for DieselOrderRepository {
    fn find_order(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(OrderRow::into_order).transpose()
    }

    fn commit_transition(
        &self,
        order: &Order,
        expected_status: OrderStatus,
        expected_holder: Option<Uuid>,
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        // Conditional write: only succeeds if the stored (status, holder)
        // pair is still the one the caller loaded. Losing the race leaves
        // zero rows updated instead of silently overwriting the winner.
        let updated = diesel::update(
            orders::table
                .filter(orders::id.eq(order.id))
                .filter(orders::status.eq(expected_status.as_str()))
                .filter(orders::taken_by_user_id.is_not_distinct_from(expected_holder)),
        )
        .set((
            orders::status.eq(order.status.as_str()),
            orders::taken_by_user_id.eq(order.taken_by_user_id),
        ))
        .execute(&mut conn)?;

        if updated == 1 {
            return Ok(());
        }

        let exists = diesel::select(diesel::dsl::exists(
            orders::table.filter(orders::id.eq(order.id)),
        ))
        .get_result::<bool>(&mut conn)?;

        if exists {
            Err(DomainError::Conflict(
                "Order was modified by another request".to_string(),
            ))
        } else {
            Err(DomainError::NotFound)
        }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(
        &self,
        customer_id: Uuid,
        title: &str,
        description: &str,
    ) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        let row: OrderRow = diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                id: Uuid::new_v4(),
                customer_id,
                title: title.to_string(),
                description: description.to_string(),
                status: OrderStatus::Pending.as_str().to_string(),
            })
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)?;

        row.into_order()
    }

    fn update_details(
        &self,
        id: Uuid,
        title: &str,
        description: &str,
    ) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(orders::table.find(id))
            .set((orders::title.eq(title), orders::description.eq(description)))
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        row.map(OrderRow::into_order).transpose()
    }

    fn delete(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::delete(orders::table.find(id))
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        row.map(OrderRow::into_order).transpose()
    }

    fn delete_many(&self, ids: &[Uuid]) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let existing: i64 = orders::table
                .filter(orders::id.eq_any(ids.iter().copied()))
                .count()
                .get_result(conn)?;

            if existing != ids.len() as i64 {
                return Ok(false);
            }

            diesel::delete(orders::table.filter(orders::id.eq_any(ids.iter().copied())))
                .execute(conn)?;
            Ok(true)
        })
    }

    fn list(&self, query: &ListQuery) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut q = orders::table
            .inner_join(customers::table)
            .select(OrderRow::as_select())
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

        let rows: Vec<OrderRow> = q
            .limit(page_size)
            .offset((page - 1) * page_size)
            .load(&mut conn)?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    fn list_by_customer_number(&self, customer_number: i32) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<OrderRow> = orders::table
            .inner_join(customers::table)
            .filter(customers::customer_number.eq(customer_number))
            .order(orders::created_on.desc())
            .select(OrderRow::as_select())
            .load(&mut conn)?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    fn list_by_holder(
        &self,
        user_id: Uuid,
        sort_by: Option<&str>,
        is_descending: bool,
    ) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut q = orders::table
            .inner_join(customers::table)
            .select(OrderRow::as_select())
            .into_boxed();
        q = q.filter(orders::taken_by_user_id.eq(Some(user_id)));
        q = apply_sort(q, sort_by, is_descending);

        let rows: Vec<OrderRow> = q.load(&mut conn)?;
        rows.into_iter().map(OrderRow::into_order).collect()
    }
}
