use actix_web::{web, HttpResponse};

use crate::{
    api::{documents_json, parse_id},
    database::Store,
    models::Role,
    services::{product_service, report_service, user_service},
    utils::error::ApiResult,
};

#[utoipa::path(
    get,
    path = "/reporteditems",
    tag = "Admin",
    responses(
        (status = 200, description = "All reports"),
        (status = 403, description = "Caller is not an Admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reported_items(store: web::Data<dyn Store>) -> ApiResult<HttpResponse> {
    let reports = report_service::list_reports(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(documents_json(reports)))
}

#[utoipa::path(
    get,
    path = "/allsellers",
    tag = "Admin",
    responses((status = 200, description = "Users with the Seller role")),
    security(("bearer_auth" = []))
)]
pub async fn all_sellers(store: web::Data<dyn Store>) -> ApiResult<HttpResponse> {
    let users = user_service::list_by_role(store.get_ref(), Role::Seller).await?;
    Ok(HttpResponse::Ok().json(documents_json(users)))
}

#[utoipa::path(
    get,
    path = "/allbuyers",
    tag = "Admin",
    responses((status = 200, description = "Users with the Buyer role")),
    security(("bearer_auth" = []))
)]
pub async fn all_buyers(store: web::Data<dyn Store>) -> ApiResult<HttpResponse> {
    let users = user_service::list_by_role(store.get_ref(), Role::Buyer).await?;
    Ok(HttpResponse::Ok().json(documents_json(users)))
}

#[utoipa::path(
    patch,
    path = "/verifyuser/{email}",
    tag = "Admin",
    params(("email" = String, Path, description = "Seller email")),
    responses(
        (status = 200, description = "Result of the user write; the seller's products are verified too", body = crate::database::UpdateAck),
        (status = 500, description = "Product update failed; the user flag was restored")
    ),
    security(("bearer_auth" = []))
)]
pub async fn verify_user(store: web::Data<dyn Store>, email: web::Path<String>) -> ApiResult<HttpResponse> {
    log::info!("✔️ PATCH /verifyuser/{}", email);

    let ack = user_service::verify_user(store.get_ref(), &email).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[utoipa::path(
    delete,
    path = "/allusers/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, description = "User removed", body = crate::database::DeleteAck)),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(store: web::Data<dyn Store>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    log::info!("🗑️ DELETE /allusers/{}", id);

    let id = parse_id(&id)?;
    let ack = user_service::delete_user(store.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[utoipa::path(
    delete,
    path = "/itemdelete/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product and its reports removed", body = crate::database::DeleteAck),
        (status = 500, description = "Report cleanup failed; the product was restored")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_item(store: web::Data<dyn Store>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    log::info!("🗑️ DELETE /itemdelete/{}", id);

    let id = parse_id(&id)?;
    let ack = product_service::remove_listing(store.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[utoipa::path(
    delete,
    path = "/reportdelete/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "Report id")),
    responses((status = 200, description = "Report removed", body = crate::database::DeleteAck)),
    security(("bearer_auth" = []))
)]
pub async fn delete_report(store: web::Data<dyn Store>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    log::info!("🗑️ DELETE /reportdelete/{}", id);

    let id = parse_id(&id)?;
    let ack = report_service::delete_report(store.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(ack))
}
