use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rijschool_auth::{SessionContext, ADMIN_LOGIN_PATH, INSTRUCTOR_LOGIN_PATH};
use rijschool_domain::Role;

use crate::{
    routes::models::{LoginPageResponse, LoginRequest, SessionResponse, SuccessResponse},
    util::{session_token, SESSION_COOKIE},
    ApiError, AppState,
};

fn landing_page(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin/dashboard",
        Role::Instructor => "/instructor/data",
    }
}

fn login_page(state: &AppState, headers: &HeaderMap, login_path: &str) -> LoginPageResponse {
    let session: Option<SessionContext> =
        session_token(headers).and_then(|token| state.authenticate(&token).ok());
    LoginPageResponse {
        login_path: login_path.to_string(),
        authenticated: session.is_some(),
        role: session.map(|s| s.role),
    }
}

async fn login(
    state: &AppState,
    jar: CookieJar,
    req: LoginRequest,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    let (session, token) = state
        .authenticator()
        .login(&req.username, &req.password)
        .await?;

    let cookie = Cookie::build((SESSION_COOKIE, token.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    let response = SessionResponse {
        token: token.token,
        expires_at: token.expires_at.to_rfc3339(),
        role: session.role,
        display_name: session.display_name,
        redirect_to: landing_page(session.role).to_string(),
    };
    Ok((jar.add(cookie), Json(response)))
}

#[utoipa::path(
    get,
    path = "/login",
    tag = "Auth",
    responses((status = 200, description = "Admin login page state", body = LoginPageResponse))
)]
pub async fn admin_login_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<LoginPageResponse> {
    Json(login_page(&state, &headers, ADMIN_LOGIN_PATH))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = SessionResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    login(&state, jar, req).await
}

#[utoipa::path(
    get,
    path = "/instructor/login",
    tag = "Auth",
    responses((status = 200, description = "Instructor login page state", body = LoginPageResponse))
)]
pub async fn instructor_login_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<LoginPageResponse> {
    Json(login_page(&state, &headers, INSTRUCTOR_LOGIN_PATH))
}

#[utoipa::path(
    post,
    path = "/instructor/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = SessionResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn instructor_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    login(&state, jar, req).await
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses((status = 200, description = "Session cookie cleared", body = SuccessResponse))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<SuccessResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(SuccessResponse { success: true }))
}
