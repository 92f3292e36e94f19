//! User controller and its HTTP routes.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use common::{AppError, AppResult, OptionExt};

use crate::domain::{NewUser, User, UserId};
use crate::service::UserService;

/// Exposes the user service operations one-to-one.
pub struct UserController {
    user_service: Arc<dyn UserService>,
}

impl UserController {
    pub fn new(user_service: Arc<dyn UserService>) -> Self {
        Self { user_service }
    }

    pub async fn create_user(&self, username: String, email: String) -> AppResult<User> {
        self.user_service.create_user(username, email).await
    }

    pub async fn get_user(&self, id: UserId) -> AppResult<Option<User>> {
        self.user_service.get_user_by_id(id).await
    }

    pub async fn get_all_users(&self) -> AppResult<Vec<User>> {
        self.user_service.get_all_users().await
    }

    pub async fn delete_user(&self, id: UserId) -> AppResult<()> {
        self.user_service.delete_user(id).await
    }
}

/// Create user routes
pub fn routes() -> Router<Arc<UserController>> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).delete(delete_user))
}

/// Create a user; the response carries the assigned identity
async fn create_user(
    State(controller): State<Arc<UserController>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> AppResult<(StatusCode, Json<User>)> {
    let Json(payload) =
        payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let user = controller
        .create_user(payload.username, payload.email)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(State(controller): State<Arc<UserController>>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(controller.get_all_users().await?))
}

/// Get user by ID; absence becomes a 404 only here at the HTTP edge
async fn get_user(
    State(controller): State<Arc<UserController>>,
    Path(id): Path<UserId>,
) -> AppResult<Json<User>> {
    let user = controller.get_user(id).await?.ok_or_not_found()?;
    Ok(Json(user))
}

async fn delete_user(
    State(controller): State<Arc<UserController>>,
    Path(id): Path<UserId>,
) -> AppResult<StatusCode> {
    controller.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
