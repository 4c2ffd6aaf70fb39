use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::{
    api::{body_document, documents_json, parse_id},
    database::Store,
    middleware::auth::Claims,
    services::{booking_service, product_service},
    utils::error::ApiResult,
};

#[utoipa::path(
    post,
    path = "/mybooking",
    tag = "Buyer",
    responses(
        (status = 200, description = "Booking stored", body = crate::database::InsertAck),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Caller is not a Buyer")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_booking(
    user: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    log::info!("🛒 POST /mybooking - buyer {}", user.email);

    let body = body_document(body.into_inner())?;
    let ack = booking_service::create_booking(store.get_ref(), &user.email, body).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[utoipa::path(
    patch,
    path = "/bookstatus/{id}",
    tag = "Buyer",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product status updated", body = crate::database::UpdateAck),
        (status = 400, description = "Malformed id or no `status` in body")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_booking_status(
    store: web::Data<dyn Store>,
    id: web::Path<String>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    log::info!("🔖 PATCH /bookstatus/{}", id);

    let id = parse_id(&id)?;
    let body = body_document(body.into_inner())?;
    let ack = product_service::update_status(store.get_ref(), id, &body).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[utoipa::path(
    get,
    path = "/myorders/{email}",
    tag = "Buyer",
    params(("email" = String, Path, description = "Buyer email")),
    responses((status = 200, description = "Bookings made by the buyer")),
    security(("bearer_auth" = []))
)]
pub async fn my_orders(store: web::Data<dyn Store>, email: web::Path<String>) -> ApiResult<HttpResponse> {
    let bookings = booking_service::bookings_by_email(store.get_ref(), &email).await?;
    Ok(HttpResponse::Ok().json(documents_json(bookings)))
}

#[utoipa::path(
    patch,
    path = "/myorders/{id}",
    tag = "Buyer",
    params(("id" = String, Path, description = "Product id of the booked item")),
    responses(
        (status = 200, description = "Booking removed and product status updated", body = crate::database::UpdateAck),
        (status = 400, description = "Malformed id or no `status` in body"),
        (status = 500, description = "Product update failed; the booking was restored")
    ),
    security(("bearer_auth" = []))
)]
pub async fn complete_order(
    store: web::Data<dyn Store>,
    id: web::Path<String>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    log::info!("💳 PATCH /myorders/{}", id);

    let id = parse_id(&id)?;
    let body = body_document(body.into_inner())?;
    let ack = booking_service::complete_order(store.get_ref(), id, &body).await?;

    log::info!("✅ Order completed for product {}", id);
    Ok(HttpResponse::Ok().json(ack))
}
