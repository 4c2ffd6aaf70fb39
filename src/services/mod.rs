pub mod auth_service;
pub mod booking_service;
pub mod product_service;
pub mod report_service;
pub mod user_service;

use mongodb::bson::Document;

use crate::utils::error::{ApiError, ApiResult};

/// Copies only the allowed top-level fields of a request body.
pub fn whitelisted(body: &Document, allowed: &[&str]) -> Document {
    body.iter()
        .filter(|(key, _)| allowed.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Like [`whitelisted`], but an update that would change nothing is rejected.
pub fn update_fields(body: &Document, allowed: &[&str]) -> ApiResult<Document> {
    let set = whitelisted(body, allowed);
    if set.is_empty() {
        return Err(ApiError::InvalidBody(format!(
            "expected at least one of: {}",
            allowed.join(", ")
        )));
    }
    Ok(set)
}
