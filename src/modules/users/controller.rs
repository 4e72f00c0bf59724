use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use physipro_core::AppError;
use physipro_models::{CreateUserDto, UpdateProfileDto, UpdateUserDto, UserFilter, UserProfile};
use tracing::instrument;
use uuid::Uuid;

use super::service::UserService;
use crate::middleware::auth::{AuthUser, RequireAdmin, RequireStaff};
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    Ok(Json(
        UserService::list_users(&state, admin.profile(), filter).await?,
    ))
}

#[instrument(skip_all, fields(%id))]
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(
        UserService::get_user(&state, auth_user.profile(), id).await?,
    ))
}

/// Create a user (admins: any type, trainers: own students)
#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    RequireStaff(actor): RequireStaff,
    Json(dto): Json<CreateUserDto>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let user = UserService::create_user(&state, actor.profile(), dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip_all, fields(%id))]
pub async fn update_user(
    State(state): State<AppState>,
    RequireStaff(actor): RequireStaff,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateUserDto>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(
        UserService::update_user(&state, actor.profile(), id, dto).await?,
    ))
}

#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(dto): Json<UpdateProfileDto>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(
        UserService::update_profile(&state, auth_user.profile(), dto).await?,
    ))
}

#[instrument(skip_all, fields(%id))]
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireStaff(actor): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(
        UserService::deactivate_user(&state, actor.profile(), id).await?,
    ))
}

#[instrument(skip_all, fields(%id))]
pub async fn reactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(
        UserService::reactivate_user(&state, admin.profile(), id).await?,
    ))
}

#[instrument(skip_all, fields(%id))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    UserService::delete_user(&state, admin.profile(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(%trainer_id))]
pub async fn list_students(
    State(state): State<AppState>,
    RequireStaff(actor): RequireStaff,
    Path(trainer_id): Path<Uuid>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    Ok(Json(
        UserService::list_students(&state, actor.profile(), trainer_id).await?,
    ))
}
