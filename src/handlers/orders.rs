use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_actions::OrderActionService;
use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::{CustomerRepository, OrderRepository, OrderStore};
use crate::domain::query::ListQuery;
use crate::errors::AppError;
use crate::infrastructure::customer_repo::DieselCustomerRepository;
use crate::infrastructure::order_repo::DieselOrderRepository;

use super::acting_user_id;

pub type OrderActions = OrderActionService<DieselOrderRepository>;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_on: String,
    pub customer_id: Uuid,
    pub taken_by_user_id: Option<Uuid>,
    pub is_taken: bool,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            title: order.title,
            description: order.description,
            status: order.status.to_string(),
            created_on: order.created_on.to_rfc3339(),
            customer_id: order.customer_id,
            taken_by_user_id: order.taken_by_user_id,
            is_taken: order.taken_by_user_id.is_some(),
        }
    }
}

fn validate_order_details(title: &str, description: &str) -> Result<(), AppError> {
    let title_len = title.chars().count();
    if !(2..=25).contains(&title_len) {
        return Err(AppError::InvalidInput(
            "Title must be between 2 and 25 characters".to_string(),
        ));
    }
    let description_len = description.chars().count();
    if !(10..=300).contains(&description_len) {
        return Err(AppError::InvalidInput(
            "Description must be between 10 and 300 characters".to_string(),
        ));
    }
    Ok(())
}

// ── Query parameters ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListParams {
    pub customer_number: Option<i32>,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub is_descending: bool,
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

impl From<OrderListParams> for ListQuery {
    fn from(params: OrderListParams) -> Self {
        ListQuery {
            customer_number: params.customer_number,
            first_name: params.first_name,
            second_name: params.second_name,
            sort_by: params.sort_by,
            is_descending: params.is_descending,
            page_number: params.page_number,
            page_size: params.page_size,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HolderListParams {
    pub sort_by: Option<String>,
    #[serde(default)]
    pub is_descending: bool,
}

// ── Read handlers ────────────────────────────────────────────────────────────

/// GET /orders
///
/// Returns orders filtered by customer fields, sorted and paginated.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("customer_number" = Option<i32>, Query, description = "Exact customer number"),
        ("first_name" = Option<String>, Query, description = "Customer first name substring"),
        ("second_name" = Option<String>, Query, description = "Customer second name substring"),
        ("sort_by" = Option<String>, Query, description = "firstname | secondname | customernumber | date"),
        ("is_descending" = Option<bool>, Query, description = "Sort direction (default ascending)"),
        ("page_number" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("page_size" = Option<i64>, Query, description = "Items per page (default 10, max 100)"),
    ),
    responses(
        (status = 200, description = "Matching orders", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    repo: web::Data<DieselOrderRepository>,
    query: web::Query<OrderListParams>,
) -> Result<HttpResponse, AppError> {
    let query: ListQuery = query.into_inner().into();

    let orders = web::block(move || repo.list(&query))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    repo: web::Data<DieselOrderRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || repo.find_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// GET /orders/by-customer/{customer_number}
#[utoipa::path(
    get,
    path = "/orders/by-customer/{customer_number}",
    params(("customer_number" = i32, Path, description = "Customer number")),
    responses(
        (status = 200, description = "Orders of the customer", body = [OrderResponse]),
        (status = 404, description = "No orders for this customer number"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_by_customer_number(
    repo: web::Data<DieselOrderRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let customer_number = path.into_inner();

    let orders = web::block(move || repo.list_by_customer_number(customer_number))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    if orders.is_empty() {
        return Err(AppError::NotFound);
    }

    let items: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /orders/user-order-list
///
/// Orders currently held by the calling worker.
#[utoipa::path(
    get,
    path = "/orders/user-order-list",
    params(
        ("sort_by" = Option<String>, Query, description = "firstname | secondname | customernumber | date"),
        ("is_descending" = Option<bool>, Query, description = "Sort direction (default ascending)"),
    ),
    responses(
        (status = 200, description = "Orders held by the caller", body = [OrderResponse]),
        (status = 403, description = "Caller id header missing"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn user_order_list(
    req: HttpRequest,
    repo: web::Data<DieselOrderRepository>,
    query: web::Query<HolderListParams>,
) -> Result<HttpResponse, AppError> {
    let user_id = acting_user_id(&req)?;
    let params = query.into_inner();

    let orders = web::block(move || {
        repo.list_by_holder(user_id, params.sort_by.as_deref(), params.is_descending)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

// ── Admin handlers ───────────────────────────────────────────────────────────

/// POST /orders/by-number/{customer_number}
///
/// Creates a Pending order for the customer with the given number.
#[utoipa::path(
    post,
    path = "/orders/by-number/{customer_number}",
    params(("customer_number" = i32, Path, description = "Customer number")),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid title or description"),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    repo: web::Data<DieselOrderRepository>,
    customers: web::Data<DieselCustomerRepository>,
    path: web::Path<i32>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let customer_number = path.into_inner();
    let body = body.into_inner();
    validate_order_details(&body.title, &body.description)?;

    let order = web::block(move || {
        let Some(customer_id) = customers.id_by_number(customer_number)? else {
            return Err(DomainError::NotFound);
        };
        repo.create(customer_id, &body.title, &body.description)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// PUT /orders/{id}
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid title or description"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    repo: web::Data<DieselOrderRepository>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();
    validate_order_details(&body.title, &body.description)?;

    let order = web::block(move || repo.update_details(order_id, &body.title, &body.description))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// DELETE /orders/{id}
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Deleted order", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    repo: web::Data<DieselOrderRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || repo.delete(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// POST /orders/delete-multiple
///
/// Deletes the given orders atomically; if any id is unknown, nothing is
/// deleted.
#[utoipa::path(
    post,
    path = "/orders/delete-multiple",
    request_body = Vec<Uuid>,
    responses(
        (status = 204, description = "All orders deleted"),
        (status = 400, description = "No order ids provided"),
        (status = 409, description = "Not all ids exist; nothing was deleted"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_multiple(
    repo: web::Data<DieselOrderRepository>,
    body: web::Json<Vec<Uuid>>,
) -> Result<HttpResponse, AppError> {
    let ids = body.into_inner();
    if ids.is_empty() {
        return Err(AppError::InvalidInput("No order ids provided".to_string()));
    }

    let deleted = web::block(move || repo.delete_many(&ids))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    if !deleted {
        return Err(AppError::Conflict(
            "Failed to delete all specified orders. No changes were applied".to_string(),
        ));
    }
    Ok(HttpResponse::NoContent().finish())
}

// ── Worker action handlers ───────────────────────────────────────────────────

/// PUT /orders/take/{id}
#[utoipa::path(
    put,
    path = "/orders/take/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order claimed", body = OrderResponse),
        (status = 403, description = "Caller id header missing"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already taken or terminal"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order-actions"
)]
pub async fn take_order(
    req: HttpRequest,
    actions: web::Data<OrderActions>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = acting_user_id(&req)?;
    let order_id = path.into_inner();

    let order = web::block(move || actions.take_order(order_id, user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /orders/release/{id}
#[utoipa::path(
    put,
    path = "/orders/release/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order released", body = OrderResponse),
        (status = 403, description = "Caller is not the holder"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order changed concurrently"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order-actions"
)]
pub async fn release_order(
    req: HttpRequest,
    actions: web::Data<OrderActions>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = acting_user_id(&req)?;
    let order_id = path.into_inner();

    let order = web::block(move || actions.release_order(order_id, user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /orders/complete/{id}
#[utoipa::path(
    put,
    path = "/orders/complete/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order completed", body = OrderResponse),
        (status = 403, description = "Caller is not the holder"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already completed"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order-actions"
)]
pub async fn complete_order(
    req: HttpRequest,
    actions: web::Data<OrderActions>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = acting_user_id(&req)?;
    let order_id = path.into_inner();

    let order = web::block(move || actions.complete_order(order_id, user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /orders/cancel/{id}
#[utoipa::path(
    put,
    path = "/orders/cancel/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order canceled", body = OrderResponse),
        (status = 403, description = "Caller is not the holder"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already canceled"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "order-actions"
)]
pub async fn cancel_order(
    req: HttpRequest,
    actions: web::Data<OrderActions>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = acting_user_id(&req)?;
    let order_id = path.into_inner();

    let order = web::block(move || actions.cancel_order(order_id, user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_details_validation_bounds() {
        assert!(validate_order_details("OK", "A long enough description").is_ok());
        assert!(validate_order_details("x", "A long enough description").is_err());
        assert!(validate_order_details(&"x".repeat(26), "A long enough description").is_err());
        assert!(validate_order_details("Title", "too short").is_err());
        assert!(validate_order_details("Title", &"d".repeat(301)).is_err());
        assert!(validate_order_details("Title", &"d".repeat(300)).is_ok());
    }

    #[test]
    fn order_response_derives_is_taken() {
        use crate::domain::order::{Order, OrderStatus};
        use chrono::Utc;

        let mut order = Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            title: "Title".to_string(),
            description: "A long enough description".to_string(),
            status: OrderStatus::Pending,
            taken_by_user_id: None,
            created_on: Utc::now(),
        };

        let dto = OrderResponse::from(order.clone());
        assert!(!dto.is_taken);
        assert_eq!(dto.status, "Pending");

        let worker = Uuid::new_v4();
        order.take(worker);
        let dto = OrderResponse::from(order);
        assert!(dto.is_taken);
        assert_eq!(dto.taken_by_user_id, Some(worker));
        assert_eq!(dto.status, "InProgress");
    }
}
