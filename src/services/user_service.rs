use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::Serialize;

use crate::{
    database::{CollectionName, DeleteAck, Store, UpdateAck},
    models::{CurrentUser, Role, PROFILE_FIELDS},
    services::{auth_service::TokenService, whitelisted},
    utils::error::ApiResult,
};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub result: UpdateAck,
    pub token: String,
}

/// Creates or refreshes a profile keyed by email and hands back a new token.
/// Fields absent from the body keep their stored values.
pub async fn upsert_profile(
    store: &dyn Store,
    tokens: &TokenService,
    email: &str,
    body: &Document,
) -> ApiResult<ProfileResponse> {
    let mut profile = whitelisted(body, PROFILE_FIELDS);
    profile.insert("email", email);

    let result = store
        .update_one(CollectionName::Users, doc! { "email": email }, profile.clone(), true)
        .await?;
    let token = tokens.issue(&profile)?;

    Ok(ProfileResponse { result, token })
}

pub async fn find_user(store: &dyn Store, email: &str) -> ApiResult<Option<CurrentUser>> {
    let record = store
        .find_one(CollectionName::Users, doc! { "email": email })
        .await?;
    Ok(record.as_ref().and_then(CurrentUser::from_document))
}

pub async fn has_role(store: &dyn Store, email: &str, role: Role) -> ApiResult<bool> {
    Ok(find_user(store, email)
        .await?
        .map(|user| user.has_role(role))
        .unwrap_or(false))
}

pub async fn is_verified(store: &dyn Store, email: &str) -> ApiResult<bool> {
    Ok(find_user(store, email)
        .await?
        .map(|user| user.is_verified)
        .unwrap_or(false))
}

pub async fn list_by_role(store: &dyn Store, role: Role) -> ApiResult<Vec<Document>> {
    Ok(store
        .find_many(CollectionName::Users, doc! { "role": role.as_str() })
        .await?)
}

pub async fn delete_user(store: &dyn Store, id: ObjectId) -> ApiResult<DeleteAck> {
    Ok(store
        .delete_one(CollectionName::Users, doc! { "_id": id })
        .await?)
}

/// Marks a seller and every product they own as verified.
///
/// The user flag is written first; if the products write fails the flag is
/// put back to its previous value. Products of an unknown email are left alone.
pub async fn verify_user(store: &dyn Store, email: &str) -> ApiResult<UpdateAck> {
    let previous = find_user(store, email).await?.map(|user| user.is_verified);

    let ack = store
        .update_one(
            CollectionName::Users,
            doc! { "email": email },
            doc! { "isVerified": true },
            false,
        )
        .await?;

    if ack.matched_count == 0 {
        log::warn!("⚠️ No user {} to verify; products untouched", email);
        return Ok(ack);
    }

    match store
        .update_many(
            CollectionName::Products,
            doc! { "email": email },
            doc! { "isVerified": true },
        )
        .await
    {
        Ok(products) => {
            log::info!("✅ Verified {} and {} of their products", email, products.modified_count);
            Ok(ack)
        }
        Err(e) => {
            log::warn!("⚠️ Product verification failed for {}, restoring user flag: {}", email, e);
            if let Some(was_verified) = previous {
                if let Err(restore) = store
                    .update_one(
                        CollectionName::Users,
                        doc! { "email": email },
                        doc! { "isVerified": was_verified },
                        false,
                    )
                    .await
                {
                    log::error!("❌ Could not restore verification flag for {}: {}", email, restore);
                }
            }
            Err(e.into())
        }
    }
}
