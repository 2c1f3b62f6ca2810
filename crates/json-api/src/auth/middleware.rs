//! Auth middleware.

use freight_app::auth::AuthServiceError;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use salvo::{
    http::header::{AUTHORIZATION, HeaderValue},
    prelude::*,
};
use tracing::{error, warn};

use crate::extensions::*;

/// Header telling the client where to send the user to sign in.
pub(crate) const LOGIN_REDIRECT_HEADER: &str = "x-login-redirect";

/// Path separators stay readable; `?`, `&`, `=` and the rest are escaped.
const REDIRECT_TARGET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        unauthorized(req, res, "Missing or invalid Authorization header");

        return;
    };

    let state = match depot.state_or_500() {
        Ok(state) => state,
        Err(status) => {
            res.render(status);

            return;
        }
    };

    let user = match state.app.auth.authenticate_bearer(token).await {
        Ok(user) => user,
        Err(AuthServiceError::NotFound) => {
            unauthorized(req, res, "Invalid or expired session");

            return;
        }
        Err(AuthServiceError::Token(source)) => {
            warn!("rejected malformed session token: {source}");

            unauthorized(req, res, "Invalid or expired session");

            return;
        }
        Err(AuthServiceError::InvalidReference | AuthServiceError::Sql(_)) => {
            error!("failed to validate session token");

            res.render(StatusError::internal_server_error());

            return;
        }
    };

    depot.insert_user_uuid(user);

    ctrl.call_next(req, depot, res).await;
}

fn unauthorized(req: &Request, res: &mut Response, brief: &str) {
    let target = match req.uri().path_and_query() {
        Some(target) => target.as_str(),
        None => req.uri().path(),
    };

    match HeaderValue::from_str(&login_redirect(target)) {
        Ok(value) => {
            res.headers_mut().insert(LOGIN_REDIRECT_HEADER, value);
        }
        Err(source) => warn!("could not encode login redirect header: {source}"),
    }

    res.render(StatusError::unauthorized().brief(brief));
}

fn login_redirect(target: &str) -> String {
    format!("/login?redirect={}", utf8_percent_encode(target, REDIRECT_TARGET))
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
