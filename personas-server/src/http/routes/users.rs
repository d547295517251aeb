//! User endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{User, UserRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{NewUser, UserPatch};

/// Create user request
///
/// Fields are optional at the wire level so a missing field reaches
/// validation (400 with a contract message) instead of being rejected
/// by the JSON deserializer.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Update user request
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// User response
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

/// Echo body for PUT in its default mode: the path id as a string and
/// only the fields the client actually submitted.
#[derive(Serialize)]
pub struct UserEcho {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// PUT response, shaped by the refetch-after-update setting
#[derive(Serialize)]
#[serde(untagged)]
pub enum UpdateUserResponse {
    Stored(UserResponse),
    Echo(UserEcho),
}

/// GET /users - list all users
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = UserRepo::new(&state.pool)
        .list()
        .await
        .map_err(|e| ApiError::db(e, "Error fetching users"))?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /users - create a new user
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let new_user = NewUser::new(req.name, req.email)?;
    let user = UserRepo::new(&state.pool)
        .create(&new_user)
        .await
        .map_err(|e| ApiError::db(e, "Error creating user"))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /users/{id} - get a single user
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.pool)
        .get(id)
        .await
        .map_err(|e| ApiError::db(e, "Error fetching user"))?;

    Ok(Json(UserResponse::from(user)))
}

/// PUT /users/{id} - partially update a user
///
/// Submitted fields overwrite the stored columns; omitted fields are
/// left alone via COALESCE. The default response echoes the request
/// back; with refetch enabled the stored row is returned instead.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>, ApiError> {
    let patch = UserPatch::new(req.name, req.email)?;
    let repo = UserRepo::new(&state.pool);
    repo.update(id, &patch)
        .await
        .map_err(|e| ApiError::db(e, "Error updating user"))?;

    if state.refetch_after_update {
        let user = repo
            .get(id)
            .await
            .map_err(|e| ApiError::db(e, "Error updating user"))?;
        return Ok(Json(UpdateUserResponse::Stored(user.into())));
    }

    let (name, email) = patch.into_parts();
    Ok(Json(UpdateUserResponse::Echo(UserEcho {
        id: id.to_string(),
        name,
        email,
    })))
}

/// DELETE /users/{id} - delete a user, 204 on success
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    UserRepo::new(&state.pool)
        .delete(id)
        .await
        .map_err(|e| ApiError::db(e, "Error deleting user"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::db::{create_pool, DbConfig};

    /// Lazy pool state: requests that fail validation or path parsing
    /// never touch the database.
    fn app() -> Router {
        let state = Arc::new(AppState::new(create_pool(&DbConfig::default()), false));
        router().with_state(state)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_without_fields_is_400() {
        let response = app()
            .oneshot(json_request("POST", "/users", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Name and email are required" })
        );
    }

    #[tokio::test]
    async fn create_with_only_name_is_400() {
        let response = app()
            .oneshot(json_request("POST", "/users", r#"{"name":"Ada"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Name and email are required" })
        );
    }

    #[tokio::test]
    async fn update_without_fields_is_400() {
        let response = app()
            .oneshot(json_request("PUT", "/users/1", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Name or email is required" })
        );
    }

    #[tokio::test]
    async fn update_with_non_numeric_id_is_400() {
        let response = app()
            .oneshot(json_request("PUT", "/users/abc", r#"{"name":"Ada"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn echo_omits_absent_fields() {
        let echo = UserEcho {
            id: "1".into(),
            name: Some("Ada L.".into()),
            email: None,
        };
        assert_eq!(
            serde_json::to_string(&echo).unwrap(),
            r#"{"id":"1","name":"Ada L."}"#
        );
    }

    #[test]
    fn echo_keeps_submitted_empty_string() {
        let echo = UserEcho {
            id: "2".into(),
            name: Some("".into()),
            email: Some("ada@example.com".into()),
        };
        assert_eq!(
            serde_json::to_string(&echo).unwrap(),
            r#"{"id":"2","name":"","email":"ada@example.com"}"#
        );
    }

    #[test]
    fn stored_update_response_serializes_as_row() {
        let response = UpdateUserResponse::Stored(UserResponse {
            id: 3,
            name: "Ada L.".into(),
            email: "ada@example.com".into(),
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "id": 3, "name": "Ada L.", "email": "ada@example.com" })
        );
    }
}
