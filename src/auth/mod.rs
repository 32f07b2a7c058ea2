//! Request guards for order routes.
//!
//! - [`AuthUser`]: any caller holding a valid bearer token
//! - [`AdminUser`]: an authenticated caller whose token carries `isAdmin`
//!
//! Both are actix extractors; listing one as a handler argument gates the route.

pub mod jwt;

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use tracing::warn;

use crate::errors::ApiError;
use crate::state::AppState;

pub use jwt::{Claims, JwtError, JwtService};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(c: Claims) -> Self {
        Self {
            id: c.sub,
            name: c.name,
            email: c.email,
            is_admin: c.is_admin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState missing from app data");
        return Err(ApiError::Internal);
    };

    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Err(ApiError::Unauthorized("No Token"));
    };

    let token = value
        .to_str()
        .ok()
        .and_then(JwtService::extract_from_header)
        .ok_or(ApiError::Unauthorized("Invalid Token"))?;

    match state.jwt.validate_token(token) {
        Ok(claims) => Ok(claims.into()),
        Err(e) => {
            warn!(uri = %req.uri(), err = %e, "rejected bearer token");
            Err(ApiError::Unauthorized("Invalid Token"))
        }
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).and_then(|user| {
            if user.is_admin {
                Ok(AdminUser(user))
            } else {
                warn!(user_id = %user.id, uri = %req.uri(), "non-admin on admin route");
                Err(ApiError::Forbidden("Invalid Admin Token"))
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::User;
    use crate::repositories::in_memory::InMemoryStore;
    use actix_web::{http::StatusCode, test, App, HttpResponse, ResponseError};

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

    async fn whoami(user: AuthUser) -> HttpResponse {
        HttpResponse::Ok().body(user.name)
    }

    async fn admin_only(AdminUser(user): AdminUser) -> HttpResponse {
        HttpResponse::Ok().body(user.name)
    }

    fn state() -> web::Data<AppState> {
        AppState::new(InMemoryStore::default(), JwtService::new(SECRET, 30))
    }

    #[actix_web::test]
    async fn missing_header_is_no_token() {
        let req = test::TestRequest::default()
            .app_data(state())
            .to_http_request();
        let err = authenticate(&req).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "No Token");
    }

    #[actix_web::test]
    async fn wrong_scheme_is_invalid_token() {
        let req = test::TestRequest::default()
            .app_data(state())
            .insert_header((header::AUTHORIZATION, "Token abc"))
            .to_http_request();
        let err = authenticate(&req).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Token");
    }

    #[actix_web::test]
    async fn admin_guard_rejects_regular_user_and_admits_admin() {
        let jwt = JwtService::new(SECRET, 30);
        let app = test::init_service(
            App::new()
                .app_data(state())
                .route("/me", web::get().to(whoami))
                .route("/admin", web::get().to(admin_only)),
        )
        .await;

        let jane = jwt
            .generate_token(&User::new("Jane", "jane@example.com", false))
            .unwrap();
        let root = jwt
            .generate_token(&User::new("Root", "root@example.com", true))
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {jane}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header((header::AUTHORIZATION, format!("Bearer {jane}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/admin")
            .insert_header((header::AUTHORIZATION, format!("Bearer {root}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"Root");
    }
}
