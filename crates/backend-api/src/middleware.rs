//! Request guard and request logging.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use rijschool_auth::{authorize, Access};
use tracing::debug;

use crate::util::session_token;
use crate::AppState;

/// Decodes the session (if any) into a request extension and enforces the
/// role rules for back-office paths.
///
/// Requests without the required role are redirected to the matching login
/// page. Public paths pass through untouched apart from the extension.
pub async fn session_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = session_token(request.headers()).and_then(|token| {
        state
            .authenticate(&token)
            .map_err(|error| debug!(%error, "ignoring invalid session token"))
            .ok()
    });

    match authorize(request.uri().path(), session.as_ref()) {
        Access::Allow => {
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        Access::Redirect(login) => {
            debug!(path = %request.uri().path(), login, "redirecting to login");
            Redirect::to(login).into_response()
        }
    }
}

/// Logging middleware for request/response logging
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}
