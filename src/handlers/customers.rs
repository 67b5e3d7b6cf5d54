use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::customer::CustomerWithOrders;
use crate::domain::ports::{CustomerFields, CustomerRepository};
use crate::domain::query::ListQuery;
use crate::errors::AppError;
use crate::infrastructure::customer_repo::DieselCustomerRepository;

use super::orders::{OrderListParams, OrderResponse};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    pub customer_number: i32,
    pub first_name: String,
    pub second_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCustomerRequest {
    pub customer_number: i32,
    pub first_name: String,
    pub second_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub customer_number: i32,
    pub first_name: String,
    pub second_name: String,
    pub created_on: String,
    pub overall_status: String,
    pub orders: Vec<OrderResponse>,
}

impl From<CustomerWithOrders> for CustomerResponse {
    fn from(c: CustomerWithOrders) -> Self {
        let overall_status = c.overall_status().to_string();
        Self {
            id: c.customer.id,
            customer_number: c.customer.customer_number,
            first_name: c.customer.first_name,
            second_name: c.customer.second_name,
            created_on: c.customer.created_on.to_rfc3339(),
            overall_status,
            orders: c.orders.into_iter().map(OrderResponse::from).collect(),
        }
    }
}

fn validate_customer_fields(
    customer_number: i32,
    first_name: &str,
    second_name: &str,
) -> Result<(), AppError> {
    if !(10000..=99999).contains(&customer_number) {
        return Err(AppError::InvalidInput(
            "Customer number must be a 5-digit number".to_string(),
        ));
    }
    for (label, value) in [("First name", first_name), ("Second name", second_name)] {
        let len = value.chars().count();
        if !(2..=50).contains(&len) {
            return Err(AppError::InvalidInput(format!(
                "{label} must be between 2 and 50 characters"
            )));
        }
    }
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /customers
#[utoipa::path(
    get,
    path = "/customers",
    params(
        ("customer_number" = Option<i32>, Query, description = "Exact customer number"),
        ("first_name" = Option<String>, Query, description = "First name substring"),
        ("second_name" = Option<String>, Query, description = "Second name substring"),
        ("sort_by" = Option<String>, Query, description = "firstname | secondname | customernumber | date"),
        ("is_descending" = Option<bool>, Query, description = "Sort direction (default ascending)"),
        ("page_number" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("page_size" = Option<i64>, Query, description = "Items per page (default 10, max 100)"),
    ),
    responses(
        (status = 200, description = "Matching customers with their orders", body = [CustomerResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn list_customers(
    repo: web::Data<DieselCustomerRepository>,
    query: web::Query<OrderListParams>,
) -> Result<HttpResponse, AppError> {
    let query: ListQuery = query.into_inner().into();

    let customers = web::block(move || repo.list(&query))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let items: Vec<CustomerResponse> = customers.into_iter().map(CustomerResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /customers/{id}
#[utoipa::path(
    get,
    path = "/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn get_customer(
    repo: web::Data<DieselCustomerRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();

    let customer = web::block(move || repo.find_by_id(customer_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match customer {
        Some(customer) => Ok(HttpResponse::Ok().json(CustomerResponse::from(customer))),
        None => Err(AppError::NotFound),
    }
}

/// GET /customers/by-number/{customer_number}
#[utoipa::path(
    get,
    path = "/customers/by-number/{customer_number}",
    params(("customer_number" = i32, Path, description = "Customer number")),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn get_customer_by_number(
    repo: web::Data<DieselCustomerRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let customer_number = path.into_inner();

    let customer = web::block(move || repo.find_by_number(customer_number))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match customer {
        Some(customer) => Ok(HttpResponse::Ok().json(CustomerResponse::from(customer))),
        None => Err(AppError::NotFound),
    }
}

/// POST /customers
#[utoipa::path(
    post,
    path = "/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Invalid customer fields"),
        (status = 409, description = "Customer number already in use"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    repo: web::Data<DieselCustomerRepository>,
    body: web::Json<CreateCustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    validate_customer_fields(body.customer_number, &body.first_name, &body.second_name)?;

    let customer = web::block(move || {
        repo.create(CustomerFields {
            customer_number: body.customer_number,
            first_name: body.first_name,
            second_name: body.second_name,
        })
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CustomerResponse::from(CustomerWithOrders {
        customer,
        orders: vec![],
    })))
}

/// PUT /customers/{id}
#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer id")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Invalid customer fields"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Customer number already in use"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn update_customer(
    repo: web::Data<DieselCustomerRepository>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let body = body.into_inner();
    validate_customer_fields(body.customer_number, &body.first_name, &body.second_name)?;

    let customer = web::block(move || {
        let updated = repo.update(
            customer_id,
            CustomerFields {
                customer_number: body.customer_number,
                first_name: body.first_name,
                second_name: body.second_name,
            },
        )?;
        match updated {
            Some(customer) => repo.find_by_id(customer.id),
            None => Ok(None),
        }
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match customer {
        Some(customer) => Ok(HttpResponse::Ok().json(CustomerResponse::from(customer))),
        None => Err(AppError::NotFound),
    }
}

/// DELETE /customers/{id}
///
/// Deletes the customer together with its orders.
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Deleted customer", body = CustomerResponse),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    repo: web::Data<DieselCustomerRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();

    let customer = web::block(move || repo.delete(customer_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match customer {
        Some(customer) => Ok(HttpResponse::Ok().json(CustomerResponse::from(CustomerWithOrders {
            customer,
            orders: vec![],
        }))),
        None => Err(AppError::NotFound),
    }
}
