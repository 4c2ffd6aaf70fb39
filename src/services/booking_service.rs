use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::{
    database::{CollectionName, InsertAck, Store, UpdateAck},
    models::STATUS_FIELDS,
    services::update_fields,
    utils::error::ApiResult,
};

/// Records a booking. The buyer's email is filled in from the token when
/// the body leaves it out.
pub async fn create_booking(store: &dyn Store, buyer_email: &str, mut body: Document) -> ApiResult<InsertAck> {
    body.remove("_id");
    if !body.contains_key("email") {
        body.insert("email", buyer_email);
    }
    Ok(store.insert_one(CollectionName::Bookings, body).await?)
}

pub async fn bookings_by_email(store: &dyn Store, email: &str) -> ApiResult<Vec<Document>> {
    Ok(store
        .find_many(CollectionName::Bookings, doc! { "email": email })
        .await?)
}

/// Closes out an order: drops the booking for the product, then applies the
/// new product status. A failed product update puts the booking back.
pub async fn complete_order(store: &dyn Store, product_id: ObjectId, body: &Document) -> ApiResult<UpdateAck> {
    let set = update_fields(body, STATUS_FIELDS)?;

    let booking = store
        .find_one(CollectionName::Bookings, doc! { "productId": product_id.to_hex() })
        .await?;

    if let Some(booking) = &booking {
        let booking_id = booking.get_object_id("_id").ok();
        let filter = match booking_id {
            Some(id) => doc! { "_id": id },
            None => doc! { "productId": product_id.to_hex() },
        };
        store.delete_one(CollectionName::Bookings, filter).await?;
    }

    match store
        .update_one(CollectionName::Products, doc! { "_id": product_id }, set, false)
        .await
    {
        Ok(ack) => Ok(ack),
        Err(e) => {
            if let Some(booking) = booking {
                log::warn!("⚠️ Product update failed for {}, restoring booking: {}", product_id, e);
                if let Err(restore) = store.insert_one(CollectionName::Bookings, booking).await {
                    log::error!("❌ Could not restore booking for {}: {}", product_id, restore);
                }
            }
            Err(e.into())
        }
    }
}
