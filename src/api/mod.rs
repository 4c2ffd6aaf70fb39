pub mod admin;
pub mod bookings;
pub mod catalog;
pub mod health;
pub mod metrics;
pub mod products;
pub mod reports;
pub mod swagger;
pub mod users;

use actix_web::web;
use mongodb::bson::{oid::ObjectId, Document};
use serde_json::Value;

use crate::{
    database::document_to_json,
    middleware::AuthMiddleware,
    models::Role,
    utils::error::{ApiError, ApiResult},
};

/// Registers every marketplace route. Shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Health & Metrics
        .route("/", web::get().to(health::root))
        .route("/health", web::get().to(health::health_check))
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Users (public)
        .route("/user/{email}", web::put().to(users::upsert_user))
        .route("/users/admin/{email}", web::get().to(users::check_admin))
        .route("/users/seller/{email}", web::get().to(users::check_seller))
        .route("/users/buyer/{email}", web::get().to(users::check_buyer))
        .route("/users/verify/{email}", web::get().to(users::check_verified))
        // Catalog (public)
        .route("/categories", web::get().to(catalog::list_categories))
        .route("/category/{id}", web::get().to(catalog::category_products))
        .route("/alladv", web::get().to(catalog::advertised_products))
        // Buyer
        .service(
            web::resource("/mybooking")
                .wrap(AuthMiddleware::require(Role::Buyer))
                .route(web::post().to(bookings::create_booking)),
        )
        .service(
            web::resource("/bookstatus/{id}")
                .wrap(AuthMiddleware::require(Role::Buyer))
                .route(web::patch().to(bookings::update_booking_status)),
        )
        .service(
            web::resource("/myorders/{key}")
                .wrap(AuthMiddleware::require(Role::Buyer))
                .route(web::get().to(bookings::my_orders))
                .route(web::patch().to(bookings::complete_order)),
        )
        // Any signed-in user
        .service(
            web::resource("/reported/{id}")
                .wrap(AuthMiddleware::authenticated())
                .route(web::put().to(reports::report_product)),
        )
        // Seller
        .service(
            web::resource("/addproduct")
                .wrap(AuthMiddleware::require(Role::Seller))
                .route(web::post().to(products::add_product)),
        )
        .service(
            web::resource("/myproducts/{key}")
                .wrap(AuthMiddleware::require(Role::Seller))
                .route(web::get().to(products::my_products))
                .route(web::delete().to(products::delete_product)),
        )
        .service(
            web::resource("/advertise/{id}")
                .wrap(AuthMiddleware::require(Role::Seller))
                .route(web::patch().to(products::advertise)),
        )
        .service(
            web::resource("/rmvadvertise/{id}")
                .wrap(AuthMiddleware::require(Role::Seller))
                .route(web::patch().to(products::remove_advertise)),
        )
        // Admin
        .service(
            web::resource("/reporteditems")
                .wrap(AuthMiddleware::require(Role::Admin))
                .route(web::get().to(admin::reported_items)),
        )
        .service(
            web::resource("/allsellers")
                .wrap(AuthMiddleware::require(Role::Admin))
                .route(web::get().to(admin::all_sellers)),
        )
        .service(
            web::resource("/allbuyers")
                .wrap(AuthMiddleware::require(Role::Admin))
                .route(web::get().to(admin::all_buyers)),
        )
        .service(
            web::resource("/verifyuser/{email}")
                .wrap(AuthMiddleware::require(Role::Admin))
                .route(web::patch().to(admin::verify_user)),
        )
        .service(
            web::resource("/allusers/{id}")
                .wrap(AuthMiddleware::require(Role::Admin))
                .route(web::delete().to(admin::delete_user)),
        )
        .service(
            web::resource("/itemdelete/{id}")
                .wrap(AuthMiddleware::require(Role::Admin))
                .route(web::delete().to(admin::delete_item)),
        )
        .service(
            web::resource("/reportdelete/{id}")
                .wrap(AuthMiddleware::require(Role::Admin))
                .route(web::delete().to(admin::delete_report)),
        );
}

pub(crate) fn parse_id(id: &str) -> ApiResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| ApiError::InvalidId(id.to_string()))
}

/// Request bodies are free-form, but must be JSON objects.
pub(crate) fn body_document(body: Value) -> ApiResult<Document> {
    match body {
        Value::Object(map) => mongodb::bson::to_document(&map).map_err(|e| ApiError::InvalidBody(e.to_string())),
        other => Err(ApiError::InvalidBody(format!("expected a JSON object, got {}", other))),
    }
}

pub(crate) fn documents_json(documents: Vec<Document>) -> Vec<Value> {
    documents.into_iter().map(document_to_json).collect()
}
