use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::{
    database::{CollectionName, DeleteAck, InsertAck, Store, UpdateAck},
    models::{CurrentUser, STATUS_ADVERTISED, STATUS_FIELDS},
    services::update_fields,
    utils::error::ApiResult,
};

pub async fn list_categories(store: &dyn Store) -> ApiResult<Vec<Document>> {
    Ok(store.find_many(CollectionName::Categories, doc! {}).await?)
}

/// Products filed under the category's name. An unknown category yields no products.
pub async fn products_in_category(store: &dyn Store, category_id: ObjectId) -> ApiResult<Vec<Document>> {
    let category = store
        .find_one(CollectionName::Categories, doc! { "_id": category_id })
        .await?;

    let Some(name) = category.as_ref().and_then(|c| c.get_str("name").ok()) else {
        log::debug!("Category {} not found", category_id);
        return Ok(Vec::new());
    };

    Ok(store
        .find_many(CollectionName::Products, doc! { "category": name })
        .await?)
}

/// Inserts a listing owned by the calling seller. Ownership and verification
/// come from the seller's record, not the body.
pub async fn add_product(store: &dyn Store, seller: &CurrentUser, mut body: Document) -> ApiResult<InsertAck> {
    body.remove("_id");
    body.insert("email", seller.email.as_str());
    body.insert("isVerified", seller.is_verified);

    Ok(store.insert_one(CollectionName::Products, body).await?)
}

pub async fn delete_product(store: &dyn Store, id: ObjectId) -> ApiResult<DeleteAck> {
    Ok(store
        .delete_one(CollectionName::Products, doc! { "_id": id })
        .await?)
}

pub async fn products_by_owner(store: &dyn Store, email: &str) -> ApiResult<Vec<Document>> {
    Ok(store
        .find_many(CollectionName::Products, doc! { "email": email })
        .await?)
}

pub async fn advertised_products(store: &dyn Store) -> ApiResult<Vec<Document>> {
    Ok(store
        .find_many(CollectionName::Products, doc! { "status": STATUS_ADVERTISED })
        .await?)
}

/// Applies a status change (booking, advertising) to one product.
pub async fn update_status(store: &dyn Store, id: ObjectId, body: &Document) -> ApiResult<UpdateAck> {
    let set = update_fields(body, STATUS_FIELDS)?;
    Ok(store
        .update_one(CollectionName::Products, doc! { "_id": id }, set, false)
        .await?)
}

/// Removes a product and the reports filed against it.
///
/// If the reports cannot be removed the product is re-inserted so the two
/// collections do not drift apart.
pub async fn remove_listing(store: &dyn Store, id: ObjectId) -> ApiResult<DeleteAck> {
    let snapshot = store
        .find_one(CollectionName::Products, doc! { "_id": id })
        .await?;
    let Some(snapshot) = snapshot else {
        return Ok(DeleteAck {
            acknowledged: true,
            deleted_count: 0,
        });
    };

    let ack = store
        .delete_one(CollectionName::Products, doc! { "_id": id })
        .await?;

    if let Err(e) = store
        .delete_many(CollectionName::Reports, doc! { "productId": id.to_hex() })
        .await
    {
        log::warn!("⚠️ Report cleanup failed for product {}, restoring it: {}", id, e);
        if let Err(restore) = store.insert_one(CollectionName::Products, snapshot).await {
            log::error!("❌ Could not restore product {}: {}", id, restore);
        }
        return Err(e.into());
    }

    Ok(ack)
}
