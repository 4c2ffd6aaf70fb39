use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::{
    api::body_document,
    database::Store,
    models::{AdminCheck, BuyerCheck, Role, SellerCheck, VerifiedCheck},
    services::{auth_service::TokenService, user_service},
    utils::error::ApiResult,
};

#[utoipa::path(
    put,
    path = "/user/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email (natural key)")),
    responses(
        (status = 200, description = "Profile upserted and a fresh token issued", body = user_service::ProfileResponse),
        (status = 400, description = "Body is not a JSON object")
    )
)]
pub async fn upsert_user(
    store: web::Data<dyn Store>,
    tokens: web::Data<TokenService>,
    email: web::Path<String>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    log::info!("📝 PUT /user/{}", email);

    let body = body_document(body.into_inner())?;
    let response = user_service::upsert_profile(store.get_ref(), &tokens, &email, &body).await?;

    log::info!("✅ Profile saved: {}", email);
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    get,
    path = "/users/admin/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    responses((status = 200, description = "Whether the user is an Admin", body = AdminCheck))
)]
pub async fn check_admin(store: web::Data<dyn Store>, email: web::Path<String>) -> ApiResult<HttpResponse> {
    let is_admin = user_service::has_role(store.get_ref(), &email, Role::Admin).await?;
    Ok(HttpResponse::Ok().json(AdminCheck { is_admin }))
}

#[utoipa::path(
    get,
    path = "/users/seller/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    responses((status = 200, description = "Whether the user is a Seller", body = SellerCheck))
)]
pub async fn check_seller(store: web::Data<dyn Store>, email: web::Path<String>) -> ApiResult<HttpResponse> {
    let is_seller = user_service::has_role(store.get_ref(), &email, Role::Seller).await?;
    Ok(HttpResponse::Ok().json(SellerCheck { is_seller }))
}

#[utoipa::path(
    get,
    path = "/users/buyer/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    responses((status = 200, description = "Whether the user is a Buyer", body = BuyerCheck))
)]
pub async fn check_buyer(store: web::Data<dyn Store>, email: web::Path<String>) -> ApiResult<HttpResponse> {
    let is_buyer = user_service::has_role(store.get_ref(), &email, Role::Buyer).await?;
    Ok(HttpResponse::Ok().json(BuyerCheck { is_buyer }))
}

#[utoipa::path(
    get,
    path = "/users/verify/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    responses((status = 200, description = "Whether an Admin has verified the user", body = VerifiedCheck))
)]
pub async fn check_verified(store: web::Data<dyn Store>, email: web::Path<String>) -> ApiResult<HttpResponse> {
    let is_verified = user_service::is_verified(store.get_ref(), &email).await?;
    Ok(HttpResponse::Ok().json(VerifiedCheck { is_verified }))
}
