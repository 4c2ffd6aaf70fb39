use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::{
    api::{body_document, documents_json, parse_id},
    database::Store,
    models::CurrentUser,
    services::product_service,
    utils::error::ApiResult,
};

#[utoipa::path(
    post,
    path = "/addproduct",
    tag = "Seller",
    responses(
        (status = 200, description = "Product listed under the caller's email", body = crate::database::InsertAck),
        (status = 403, description = "Caller is not a Seller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_product(
    seller: web::ReqData<CurrentUser>,
    store: web::Data<dyn Store>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    log::info!("➕ POST /addproduct - seller {}", seller.email);

    let body = body_document(body.into_inner())?;
    let ack = product_service::add_product(store.get_ref(), &seller, body).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[utoipa::path(
    get,
    path = "/myproducts/{email}",
    tag = "Seller",
    params(("email" = String, Path, description = "Seller email")),
    responses((status = 200, description = "Products owned by the seller")),
    security(("bearer_auth" = []))
)]
pub async fn my_products(store: web::Data<dyn Store>, email: web::Path<String>) -> ApiResult<HttpResponse> {
    let products = product_service::products_by_owner(store.get_ref(), &email).await?;
    Ok(HttpResponse::Ok().json(documents_json(products)))
}

#[utoipa::path(
    delete,
    path = "/myproducts/{id}",
    tag = "Seller",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "`deletedCount` is 0 when nothing matched", body = crate::database::DeleteAck),
        (status = 400, description = "Malformed id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(store: web::Data<dyn Store>, id: web::Path<String>) -> ApiResult<HttpResponse> {
    log::info!("🗑️ DELETE /myproducts/{}", id);

    let id = parse_id(&id)?;
    let ack = product_service::delete_product(store.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[utoipa::path(
    patch,
    path = "/advertise/{id}",
    tag = "Seller",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product status updated", body = crate::database::UpdateAck),
        (status = 400, description = "Malformed id or no `status` in body")
    ),
    security(("bearer_auth" = []))
)]
pub async fn advertise(
    store: web::Data<dyn Store>,
    id: web::Path<String>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    log::info!("📣 PATCH /advertise/{}", id);
    set_status(store, &id, body.into_inner()).await
}

#[utoipa::path(
    patch,
    path = "/rmvadvertise/{id}",
    tag = "Seller",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product status updated", body = crate::database::UpdateAck),
        (status = 400, description = "Malformed id or no `status` in body")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_advertise(
    store: web::Data<dyn Store>,
    id: web::Path<String>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    log::info!("🔕 PATCH /rmvadvertise/{}", id);
    set_status(store, &id, body.into_inner()).await
}

async fn set_status(store: web::Data<dyn Store>, id: &str, body: Value) -> ApiResult<HttpResponse> {
    let id = parse_id(id)?;
    let body = body_document(body)?;
    let ack = product_service::update_status(store.get_ref(), id, &body).await?;
    Ok(HttpResponse::Ok().json(ack))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test};
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::{json, Value};

    use crate::api::testing::{seed, test_app, user_with_role};
    use crate::database::{memory::InMemoryStore, CollectionName};

    #[actix_rt::test]
    async fn test_seller_adds_and_lists_products() {
        let store = Arc::new(InMemoryStore::new());
        let seller = user_with_role(&store, "s@x.com", "Seller").await;
        let app = test_app!(store.clone());

        let req = test::TestRequest::post()
            .uri("/addproduct")
            .insert_header(seller.clone())
            .set_json(json!({ "name": "Lamp", "category": "Home", "email": "someone@else.com" }))
            .to_request();
        let ack: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ack["acknowledged"], true);

        let req = test::TestRequest::get()
            .uri("/myproducts/s@x.com")
            .insert_header(seller)
            .to_request();
        let products: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["email"], "s@x.com");
        assert_eq!(products[0]["isVerified"], false);
    }

    #[actix_rt::test]
    async fn test_buyer_cannot_add_products() {
        let store = Arc::new(InMemoryStore::new());
        let buyer = user_with_role(&store, "b@x.com", "Buyer").await;
        let app = test_app!(store.clone());

        let req = test::TestRequest::post()
            .uri("/addproduct")
            .insert_header(buyer)
            .set_json(json!({ "name": "Lamp" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(store.count(CollectionName::Products), 0);
    }

    #[actix_rt::test]
    async fn test_delete_without_token_is_rejected_and_keeps_product() {
        let store = Arc::new(InMemoryStore::new());
        let product = seed(&store, CollectionName::Products, doc! { "name": "a" }).await;
        let app = test_app!(store.clone());

        let req = test::TestRequest::delete()
            .uri(&format!("/myproducts/{}", product))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(store.count(CollectionName::Products), 1);
    }

    #[actix_rt::test]
    async fn test_delete_product_by_id() {
        let store = Arc::new(InMemoryStore::new());
        let seller = user_with_role(&store, "s@x.com", "Seller").await;
        let target = seed(&store, CollectionName::Products, doc! { "name": "a" }).await;
        seed(&store, CollectionName::Products, doc! { "name": "b" }).await;
        let app = test_app!(store.clone());

        let req = test::TestRequest::delete()
            .uri(&format!("/myproducts/{}", target))
            .insert_header(seller.clone())
            .to_request();
        let ack: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ack["deletedCount"], 1);
        assert_eq!(store.count(CollectionName::Products), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/myproducts/{}", ObjectId::new().to_hex()))
            .insert_header(seller.clone())
            .to_request();
        let ack: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ack["deletedCount"], 0);
        assert_eq!(store.count(CollectionName::Products), 1);

        let req = test::TestRequest::delete()
            .uri("/myproducts/nope")
            .insert_header(seller)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_advertise_round_trip() {
        let store = Arc::new(InMemoryStore::new());
        let seller = user_with_role(&store, "s@x.com", "Seller").await;
        let product = seed(&store, CollectionName::Products, doc! { "status": "Available" }).await;
        let app = test_app!(store.clone());

        let req = test::TestRequest::patch()
            .uri(&format!("/advertise/{}", product))
            .insert_header(seller.clone())
            .set_json(json!({ "status": "Advertised", "isVerified": true }))
            .to_request();
        let ack: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ack["modifiedCount"], 1);

        let req = test::TestRequest::get().uri("/alladv").to_request();
        let advertised: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(advertised.len(), 1);
        assert!(advertised[0].get("isVerified").is_none());

        let req = test::TestRequest::patch()
            .uri(&format!("/rmvadvertise/{}", product))
            .insert_header(seller)
            .set_json(json!({ "status": "Available" }))
            .to_request();
        let ack: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ack["modifiedCount"], 1);

        let req = test::TestRequest::get().uri("/alladv").to_request();
        let advertised: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert!(advertised.is_empty());
    }
}
