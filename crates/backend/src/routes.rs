use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Uploads larger than this are rejected before parsing
const UPLOAD_LIMIT: usize = 20 * 1024 * 1024;

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // A001 ORDERS
        // ========================================
        .route(
            "/api/orders",
            get(handlers::a001_order::list).post(handlers::a001_order::create),
        )
        .route("/api/orders/summary", get(handlers::a001_order::summary))
        .route("/api/orders/export", get(handlers::a001_order::export))
        .route("/api/orders/bulk", post(handlers::a001_order::bulk))
        .route(
            "/api/orders/import",
            post(handlers::a001_order::import).layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
        )
        .route(
            "/api/orders/:id",
            get(handlers::a001_order::get_by_id)
                .put(handlers::a001_order::update)
                .delete(handlers::a001_order::delete),
        )
        .route(
            "/api/orders/:id/stage",
            post(handlers::a001_order::move_to_stage),
        )
        // ========================================
        // A002 CUSTOMERS
        // ========================================
        .route(
            "/api/customers",
            get(handlers::a002_customer::list).post(handlers::a002_customer::create),
        )
        .route("/api/customers/summary", get(handlers::a002_customer::summary))
        .route("/api/customers/export", get(handlers::a002_customer::export))
        .route("/api/customers/bulk", post(handlers::a002_customer::bulk))
        .route(
            "/api/customers/import",
            post(handlers::a002_customer::import).layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
        )
        .route(
            "/api/customers/:id",
            get(handlers::a002_customer::get_by_id)
                .put(handlers::a002_customer::update)
                .delete(handlers::a002_customer::delete),
        )
        // ========================================
        // A003 PRODUCTS
        // ========================================
        .route(
            "/api/products",
            get(handlers::a003_product::list).post(handlers::a003_product::create),
        )
        .route("/api/products/summary", get(handlers::a003_product::summary))
        .route("/api/products/export", get(handlers::a003_product::export))
        .route("/api/products/bulk", post(handlers::a003_product::bulk))
        .route(
            "/api/products/import",
            post(handlers::a003_product::import).layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
        )
        .route(
            "/api/products/:id",
            get(handlers::a003_product::get_by_id)
                .put(handlers::a003_product::update)
                .delete(handlers::a003_product::delete),
        )
        // ========================================
        // A004 PRODUCTION STAGES
        // ========================================
        .route(
            "/api/stages",
            get(handlers::a004_production_stage::list)
                .post(handlers::a004_production_stage::create),
        )
        .route(
            "/api/stages/overview",
            get(handlers::a004_production_stage::overview),
        )
        .route(
            "/api/stages/:id",
            get(handlers::a004_production_stage::get_by_id)
                .put(handlers::a004_production_stage::update)
                .delete(handlers::a004_production_stage::delete),
        )
        // ========================================
        // REPORTS
        // ========================================
        .route("/api/reports/:kind", get(handlers::u503_reports::generate))
}
