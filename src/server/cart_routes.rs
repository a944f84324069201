use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::json::Json;
use super::session::Session;
use super::state::{GuardedCartManager, ServerState};
use crate::user::Permission;

#[derive(Deserialize, Debug)]
struct AddToCartBody {
    #[serde(rename = "courseId")]
    course_id: String,
}

#[derive(Deserialize, Debug)]
struct UpdateQuantityBody {
    quantity: i64,
}

async fn get_cart(
    session: Session,
    State(cart_manager): State<GuardedCartManager>,
) -> Result<Response, ApiError> {
    session.require(Permission::OwnCart)?;
    let items = cart_manager.enriched_items(session.user.id)?;
    Ok(Json(items).into_response())
}

async fn add_to_cart(
    session: Session,
    State(cart_manager): State<GuardedCartManager>,
    Json(body): Json<AddToCartBody>,
) -> Result<Response, ApiError> {
    session.require(Permission::OwnCart)?;
    if !cart_manager.add(session.user.id, &body.course_id)? {
        return Err(ApiError::NotFound("Course"));
    }
    Ok(Json(json!({ "success": true })).into_response())
}

async fn update_quantity(
    session: Session,
    State(cart_manager): State<GuardedCartManager>,
    Path(course_id): Path<String>,
    Json(body): Json<UpdateQuantityBody>,
) -> Result<Response, ApiError> {
    session.require(Permission::OwnCart)?;
    if !cart_manager.update_quantity(session.user.id, &course_id, body.quantity)? {
        return Err(ApiError::NotFound("Cart item"));
    }
    Ok(Json(json!({ "success": true })).into_response())
}

async fn remove_from_cart(
    session: Session,
    State(cart_manager): State<GuardedCartManager>,
    Path(course_id): Path<String>,
) -> Result<Response, ApiError> {
    session.require(Permission::OwnCart)?;
    cart_manager.remove(session.user.id, &course_id)?;
    Ok(Json(json!({ "success": true })).into_response())
}

async fn clear_cart(
    session: Session,
    State(cart_manager): State<GuardedCartManager>,
) -> Result<Response, ApiError> {
    session.require(Permission::OwnCart)?;
    cart_manager.clear(session.user.id)?;
    Ok(Json(json!({ "success": true })).into_response())
}

async fn cart_count(
    session: Session,
    State(cart_manager): State<GuardedCartManager>,
) -> Result<Response, ApiError> {
    session.require(Permission::OwnCart)?;
    let count = cart_manager.count(session.user.id)?;
    Ok(Json(json!({ "count": count })).into_response())
}

pub fn make_cart_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(get_cart))
        .route("/", post(add_to_cart))
        // Fixed segments first, so "clear" and "count" are not read as
        // course ids.
        .route("/clear", post(clear_cart))
        .route("/count", get(cart_count))
        .route("/{course_id}", put(update_quantity))
        .route("/{course_id}", delete(remove_from_cart))
        .with_state(state)
}
