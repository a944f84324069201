use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::error::ApiError;
use super::json::Json;
use super::metrics::{record_login_attempt, set_active_sessions};
use super::session::{Session, COOKIE_SESSION_TOKEN_KEY};
use super::state::{GuardedUserManager, ServerState};
use crate::user::{GoogleProfile, LoginSession, RegisterOutcome, UserRole};

#[derive(Deserialize, Debug)]
struct LoginBody {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
struct RegisterBody {
    pub username: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GoogleLoginBody {
    pub token: String,
}

fn session_cookie(state: &ServerState, token: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(COOKIE_SESSION_TOKEN_KEY, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            state.config.session_ttl.as_secs() as i64
        ))
        .build()
}

fn login_response(state: &ServerState, session: LoginSession, status: StatusCode) -> Response {
    let cookie = session_cookie(state, &session.token);
    (
        status,
        [(header::SET_COOKIE, cookie.to_string())],
        Json(json!({ "success": true, "role": session.user.role })),
    )
        .into_response()
}

async fn login(
    State(state): State<ServerState>,
    Json(body): Json<LoginBody>,
) -> Result<Response, ApiError> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }
    match state.user_manager.login(&body.username, &body.password)? {
        Some(session) => {
            record_login_attempt("success");
            set_active_sessions(state.user_manager.sessions().active_count()?);
            Ok(login_response(&state, session, StatusCode::OK))
        }
        None => {
            record_login_attempt("failure");
            Err(ApiError::Unauthenticated)
        }
    }
}

async fn register(
    State(user_manager): State<GuardedUserManager>,
    Json(body): Json<RegisterBody>,
) -> Result<Response, ApiError> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }
    let role = match body.role.as_deref() {
        None => UserRole::User,
        Some(role) => UserRole::from_str(role)
            .ok_or_else(|| ApiError::InvalidInput(format!("Unknown role: {role}")))?,
    };
    match user_manager.register(&body.username, &body.password, role)? {
        RegisterOutcome::Created => Ok((
            StatusCode::CREATED,
            Json(json!({ "success": true })),
        )
            .into_response()),
        RegisterOutcome::UsernameTaken => {
            Err(ApiError::Conflict("Username already taken".to_string()))
        }
    }
}

async fn google_login(
    State(state): State<ServerState>,
    Json(body): Json<GoogleLoginBody>,
) -> Result<Response, ApiError> {
    let profile = GoogleProfile::parse(&body.token)
        .ok_or_else(|| ApiError::InvalidInput("Invalid Google credential".to_string()))?;
    let session = state.user_manager.google_login(&profile)?;
    record_login_attempt("success");
    set_active_sessions(state.user_manager.sessions().active_count()?);
    Ok(login_response(&state, session, StatusCode::OK))
}

async fn logout(
    State(state): State<ServerState>,
    session: Session,
) -> Result<Response, ApiError> {
    state.user_manager.logout(&session.token)?;
    set_active_sessions(state.user_manager.sessions().active_count()?);
    debug!("User {} logged out", session.user.username);

    // Expire the cookie in the past so the browser drops it.
    let cookie = Cookie::build(Cookie::new(COOKIE_SESSION_TOKEN_KEY, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1))
        .build();

    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(json!({ "success": true })),
    )
        .into_response())
}

async fn verify(session: Session) -> Result<Response, ApiError> {
    // The extractor already resolved the token to a full user record.
    Ok(Json(json!({ "success": true, "user": session.user })).into_response())
}

pub fn make_auth_routes(state: ServerState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/google", post(google_login))
        .route("/logout", post(logout))
        .route("/verify", get(verify))
        .route("/session", get(verify))
        .with_state(state)
}
