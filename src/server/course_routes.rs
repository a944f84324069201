use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::json::Json;
use super::metrics::set_catalog_courses;
use super::session::Session;
use super::state::{GuardedCourseStore, ServerState};
use crate::catalog_store::CourseDraft;
use crate::user::Permission;

#[derive(Deserialize, Debug)]
struct ListCoursesQuery {
    category: Option<String>,
}

async fn list_courses(
    State(course_store): State<GuardedCourseStore>,
    Query(query): Query<ListCoursesQuery>,
) -> Result<Response, ApiError> {
    let courses = course_store.list(query.category.as_deref())?;
    Ok(Json(courses).into_response())
}

async fn get_course(
    State(course_store): State<GuardedCourseStore>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match course_store.get(&id)? {
        Some(course) => Ok(Json(course).into_response()),
        None => Err(ApiError::NotFound("Course")),
    }
}

async fn get_categories(
    State(course_store): State<GuardedCourseStore>,
) -> Result<Response, ApiError> {
    Ok(Json(course_store.categories()?).into_response())
}

fn validated(draft: CourseDraft) -> Result<CourseDraft, ApiError> {
    draft.validate().map_err(ApiError::InvalidInput)?;
    Ok(draft)
}

async fn create_course(
    session: Session,
    State(course_store): State<GuardedCourseStore>,
    Json(draft): Json<CourseDraft>,
) -> Result<Response, ApiError> {
    session.require(Permission::ManageCatalog)?;
    let course = course_store.create(validated(draft)?)?;
    set_catalog_courses(course_store.count());
    Ok((StatusCode::CREATED, Json(course)).into_response())
}

async fn update_course(
    session: Session,
    State(course_store): State<GuardedCourseStore>,
    Path(id): Path<String>,
    Json(draft): Json<CourseDraft>,
) -> Result<Response, ApiError> {
    session.require(Permission::ManageCatalog)?;
    match course_store.update(&id, validated(draft)?)? {
        Some(course) => Ok(Json(course).into_response()),
        None => Err(ApiError::NotFound("Course")),
    }
}

async fn delete_course(
    session: Session,
    State(course_store): State<GuardedCourseStore>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    session.require(Permission::ManageCatalog)?;
    if !course_store.delete(&id)? {
        return Err(ApiError::NotFound("Course"));
    }
    set_catalog_courses(course_store.count());
    Ok(Json(json!({ "success": true })).into_response())
}

pub fn make_course_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(list_courses))
        .route("/", post(create_course))
        // Registered before the {id} routes so "categories" is not read as
        // a course id.
        .route("/categories/all", get(get_categories))
        .route("/{id}", get(get_course))
        .route("/{id}", put(update_course))
        .route("/{id}", delete(delete_course))
        .with_state(state)
}
