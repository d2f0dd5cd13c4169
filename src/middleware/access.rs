use crate::database::MongoDB;
use crate::middleware::auth::TokenEmail;
use crate::models::{User, UserRole, UserStatus};
use crate::services::user_service;
use crate::utils::AppError;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

/// Predicado de autorização: um lookup do usuário pelo email verificado
/// e uma comparação de campo.
#[derive(Debug, Clone)]
enum Requirement {
    AnyRole(&'static [UserRole]),
    Status(UserStatus),
}

impl Requirement {
    fn allows(&self, user: &User) -> bool {
        match self {
            Requirement::AnyRole(roles) => roles.contains(&user.role),
            Requirement::Status(status) => user.status == *status,
        }
    }
}

/// Gate de role/status configurável por rota. Substitui os três gates
/// duplicados do serviço original (admin, volunteer-ou-admin, active).
///
/// Depende do TokenEmail inserido pelo AuthMiddleware; o actix executa o
/// wrap registrado por último primeiro, então o AuthMiddleware deve ser
/// registrado DEPOIS do gate no scope.
#[derive(Clone)]
pub struct AccessPolicy {
    requirement: Requirement,
}

impl AccessPolicy {
    pub fn require_role(roles: &'static [UserRole]) -> Self {
        Self {
            requirement: Requirement::AnyRole(roles),
        }
    }

    pub fn require_status(status: UserStatus) -> Self {
        Self {
            requirement: Requirement::Status(status),
        }
    }

    pub fn admin() -> Self {
        Self::require_role(&[UserRole::Admin])
    }

    pub fn volunteer_or_admin() -> Self {
        Self::require_role(&[UserRole::Volunteer, UserRole::Admin])
    }

    pub fn active() -> Self {
        Self::require_status(UserStatus::Active)
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessPolicy
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessPolicyService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessPolicyService {
            service: Rc::new(service),
            requirement: self.requirement.clone(),
        }))
    }
}

pub struct AccessPolicyService<S> {
    service: Rc<S>,
    requirement: Requirement,
}

impl<S, B> Service<ServiceRequest> for AccessPolicyService<S>
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
        let requirement = self.requirement.clone();

        let email = req.extensions().get::<TokenEmail>().map(|e| e.0.clone());

        Box::pin(async move {
            let email = email.ok_or_else(|| {
                Error::from(AppError::Unauthenticated("Unauthorized".to_string()))
            })?;

            let db = req.app_data::<web::Data<MongoDB>>().cloned().ok_or_else(|| {
                Error::from(AppError::DatabaseError("Database not configured".to_string()))
            })?;

            let user = user_service::get_by_email(&db, &email)
                .await
                .map_err(Error::from)?
                .ok_or_else(|| Error::from(AppError::Forbidden("Forbidden access".to_string())))?;

            if !requirement.allows(&user) {
                return Err(Error::from(AppError::Forbidden(
                    "Forbidden access".to_string(),
                )));
            }

            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole, status: UserStatus) -> User {
        User {
            id: None,
            email: "a@x.com".to_string(),
            name: None,
            avatar: None,
            blood_group: None,
            district: None,
            upazila: None,
            role,
            status,
            created_at: None,
            last_logged_in: None,
        }
    }

    #[test]
    fn admin_gate_rejects_everyone_else() {
        let gate = Requirement::AnyRole(&[UserRole::Admin]);
        assert!(gate.allows(&user(UserRole::Admin, UserStatus::Active)));
        assert!(!gate.allows(&user(UserRole::Volunteer, UserStatus::Active)));
        assert!(!gate.allows(&user(UserRole::Donor, UserStatus::Active)));
    }

    #[test]
    fn volunteer_gate_admits_admins_too() {
        let gate = Requirement::AnyRole(&[UserRole::Volunteer, UserRole::Admin]);
        assert!(gate.allows(&user(UserRole::Volunteer, UserStatus::Blocked)));
        assert!(gate.allows(&user(UserRole::Admin, UserStatus::Active)));
        assert!(!gate.allows(&user(UserRole::Donor, UserStatus::Active)));
    }

    #[test]
    fn active_gate_checks_status_not_role() {
        let gate = Requirement::Status(UserStatus::Active);
        assert!(gate.allows(&user(UserRole::Donor, UserStatus::Active)));
        assert!(!gate.allows(&user(UserRole::Admin, UserStatus::Blocked)));
    }
}
