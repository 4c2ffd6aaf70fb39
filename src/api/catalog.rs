use actix_web::{web, HttpResponse};

use crate::{
    api::{documents_json, parse_id},
    database::Store,
    services::product_service,
    utils::error::ApiResult,
};

#[utoipa::path(
    get,
    path = "/categories",
    tag = "Catalog",
    responses((status = 200, description = "All categories"))
)]
pub async fn list_categories(store: web::Data<dyn Store>) -> ApiResult<HttpResponse> {
    let categories = product_service::list_categories(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(documents_json(categories)))
}

#[utoipa::path(
    get,
    path = "/category/{id}",
    tag = "Catalog",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Products in the category; empty for an unknown category"),
        (status = 400, description = "Malformed id")
    )
)]
pub async fn category_products(store: web::Data<dyn Store>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    log::info!("📦 GET /category/{}", id);

    let id = parse_id(&id)?;
    let products = product_service::products_in_category(store.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(documents_json(products)))
}

#[utoipa::path(
    get,
    path = "/alladv",
    tag = "Catalog",
    responses((status = 200, description = "Products currently advertised"))
)]
pub async fn advertised_products(store: web::Data<dyn Store>) -> ApiResult<HttpResponse> {
    let products = product_service::advertised_products(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(documents_json(products)))
}
