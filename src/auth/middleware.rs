use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::Header, web, FromRequest, HttpMessage, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};

use crate::{
    app_state::AppState,
    auth::Claims,
    errors::{AppError, AppResult},
};

/// Extractor for routes that require a valid bearer token.
///
/// The token is validated once per request; the resulting claims are cached
/// in the request extensions.
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &str {
        &self.0.sub
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map(AuthenticatedUser))
    }
}

fn authenticate(req: &HttpRequest) -> AppResult<Claims> {
    if let Some(claims) = req.extensions().get::<Claims>() {
        return Ok(claims.clone());
    }

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalError("Application state not configured".to_string()))?;

    let authorization = Authorization::<Bearer>::parse(req)
        .map_err(|_| AppError::Unauthorized("Not authenticated".to_string()))?;

    let claims = state
        .jwt_service
        .validate_token(authorization.as_ref().token())?;

    req.extensions_mut().insert(claims.clone());
    Ok(claims)
}
