use crate::services::firebase_service::FirebaseAuth;
use crate::utils::AppError;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

/// Email verificado pelo provedor de identidade, anexado às extensions
/// do request para os gates e handlers a jusante.
#[derive(Debug, Clone)]
pub struct TokenEmail(pub String);

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    // Rc porque a verificação do token precisa de await antes do call interno
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let token = bearer_token(
            req.headers()
                .get("Authorization")
                .and_then(|value| value.to_str().ok()),
        );

        Box::pin(async move {
            let token = token.ok_or_else(|| {
                Error::from(AppError::Unauthenticated("Unauthorized Access".to_string()))
            })?;

            let auth = req
                .app_data::<web::Data<FirebaseAuth>>()
                .cloned()
                .ok_or_else(|| {
                    Error::from(AppError::GatewayError(
                        "Identity verifier not configured".to_string(),
                    ))
                })?;

            let claims = auth.verify_id_token(&token).await.map_err(Error::from)?;

            req.extensions_mut().insert(TokenEmail(claims.email));

            service.call(req).await
        })
    }
}

/// Extrai o token de um header `Authorization: Bearer <token>`
fn bearer_token(header: Option<&str>) -> Option<String> {
    header?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).as_deref(), Some("abc.def.ghi"));
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(Some("abc.def.ghi")), None);
        assert_eq!(bearer_token(None), None);
    }
}
