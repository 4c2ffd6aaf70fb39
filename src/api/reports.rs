use actix_web::{web, HttpResponse};
use serde_json::Value;

use crate::{
    api::{body_document, parse_id},
    database::Store,
    middleware::auth::Claims,
    services::report_service,
    utils::error::ApiResult,
};

#[utoipa::path(
    put,
    path = "/reported/{id}",
    tag = "Reports",
    params(("id" = String, Path, description = "Id of the product being reported")),
    responses(
        (status = 200, description = "Report filed or refreshed", body = crate::database::UpdateAck),
        (status = 401, description = "Missing bearer token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn report_product(
    user: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    id: web::Path<String>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    log::info!("🚩 PUT /reported/{} - by {}", id, user.email);

    let id = parse_id(&id)?;
    let body = body_document(body.into_inner())?;
    let ack = report_service::report_product(store.get_ref(), id, &user.email, body).await?;
    Ok(HttpResponse::Ok().json(ack))
}
