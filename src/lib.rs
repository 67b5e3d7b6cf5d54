pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_actions::OrderActionService;
use infrastructure::customer_repo::DieselCustomerRepository;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::list_by_customer_number,
        handlers::orders::user_order_list,
        handlers::orders::create_order,
        handlers::orders::update_order,
        handlers::orders::delete_order,
        handlers::orders::delete_multiple,
        handlers::orders::take_order,
        handlers::orders::release_order,
        handlers::orders::complete_order,
        handlers::orders::cancel_order,
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::get_customer_by_number,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
    ),
    components(schemas(
        handlers::orders::CreateOrderRequest,
        handlers::orders::UpdateOrderRequest,
        handlers::orders::OrderResponse,
        handlers::customers::CreateCustomerRequest,
        handlers::customers::UpdateCustomerRequest,
        handlers::customers::CustomerResponse,
    )),
    tags(
        (name = "orders", description = "Order CRUD and queries"),
        (name = "order-actions", description = "Worker claim lifecycle"),
        (name = "customers", description = "Customer CRUD and queries"),
    )
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        let order_repo = DieselOrderRepository::new(pool.clone());
        let customer_repo = DieselCustomerRepository::new(pool.clone());
        let order_actions = OrderActionService::new(DieselOrderRepository::new(pool.clone()));

        App::new()
            .app_data(web::Data::new(order_repo))
            .app_data(web::Data::new(customer_repo))
            .app_data(web::Data::new(order_actions))
            .wrap(Logger::default())
            .service(
                web::scope("/orders")
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("/user-order-list", web::get().to(handlers::orders::user_order_list))
                    .route(
                        "/by-customer/{customer_number}",
                        web::get().to(handlers::orders::list_by_customer_number),
                    )
                    .route(
                        "/by-number/{customer_number}",
                        web::post().to(handlers::orders::create_order),
                    )
                    .route("/delete-multiple", web::post().to(handlers::orders::delete_multiple))
                    .route("/take/{id}", web::put().to(handlers::orders::take_order))
                    .route("/release/{id}", web::put().to(handlers::orders::release_order))
                    .route("/complete/{id}", web::put().to(handlers::orders::complete_order))
                    .route("/cancel/{id}", web::put().to(handlers::orders::cancel_order))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}", web::put().to(handlers::orders::update_order))
                    .route("/{id}", web::delete().to(handlers::orders::delete_order)),
            )
            .service(
                web::scope("/customers")
                    .route("", web::get().to(handlers::customers::list_customers))
                    .route("", web::post().to(handlers::customers::create_customer))
                    .route(
                        "/by-number/{customer_number}",
                        web::get().to(handlers::customers::get_customer_by_number),
                    )
                    .route("/{id}", web::get().to(handlers::customers::get_customer))
                    .route("/{id}", web::put().to(handlers::customers::update_customer))
                    .route("/{id}", web::delete().to(handlers::customers::delete_customer)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
