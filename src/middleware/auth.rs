use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::{
    database::Store,
    models::Role,
    services::{
        auth_service::{bearer_token, TokenService},
        user_service,
    },
    utils::error::ApiError,
};

pub use crate::services::auth_service::Claims;

/// Bearer-token gate, optionally narrowed to one role.
///
/// On success the verified [`Claims`] are attached to the request; with a
/// required role the caller's stored [`crate::models::CurrentUser`] is
/// attached too. Any rejection ends the request before the handler runs.
#[derive(Clone, Copy)]
pub struct AuthMiddleware {
    role: Option<Role>,
}

impl AuthMiddleware {
    pub fn authenticated() -> Self {
        Self { role: None }
    }

    pub fn require(role: Role) -> Self {
        Self { role: Some(role) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            role: self.role,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    role: Option<Role>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let role = self.role;

        Box::pin(async move {
            if let Err(e) = authorize(&req, role).await {
                log::warn!("🚫 {} {} rejected: {}", req.method(), req.path(), e);
                return Ok(req.error_response(e).map_into_right_body());
            }
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

async fn authorize(req: &ServiceRequest, role: Option<Role>) -> Result<(), ApiError> {
    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| ApiError::Internal("token service not configured".to_string()))?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let claims = tokens.verify(bearer_token(header)?)?;

    if let Some(required) = role {
        let store = req
            .app_data::<web::Data<dyn Store>>()
            .ok_or_else(|| ApiError::Internal("store not configured".to_string()))?;

        // No caching: the stored role is authoritative on every request.
        let user = user_service::find_user(store.get_ref(), &claims.email)
            .await?
            .ok_or(ApiError::Forbidden)?;

        if !user.has_role(required) {
            log::debug!("{} is not {}", claims.email, required);
            return Err(ApiError::Forbidden);
        }
        req.extensions_mut().insert(user);
    }

    req.extensions_mut().insert(claims);
    Ok(())
}
