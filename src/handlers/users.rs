use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use model::entities::{role, user, user_role};

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Username (must be unique)
    pub username: String,
}

/// Request body for granting a role to a user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GrantRoleRequest {
    /// Role name (e.g. "hr_user" or "hr_manager")
    pub role: String,
}

/// User response model
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
        }
    }
}

/// Role grant response model
#[derive(Debug, Serialize, ToSchema)]
pub struct UserRoleResponse {
    pub user_id: i32,
    pub role: String,
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_user function");
    debug!("Creating user with username: {}", request.username);

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        ..Default::default()
    };

    trace!("Attempting to insert new user into database");
    match new_user.insert(&state.db).await {
        Ok(user_model) => {
            info!(
                "User created successfully with ID: {}, username: {}",
                user_model.id, user_model.username
            );
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create user '{}': {}", request.username, db_error);

            // Handle specific database errors
            match db_error {
                DbErr::Exec(ref exec_err) => {
                    // Check for unique constraint violations
                    let error_msg = exec_err.to_string().to_lowercase();
                    if error_msg.contains("unique") || error_msg.contains("constraint") {
                        Err((
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Username '{}' already exists", request.username),
                                code: "USERNAME_ALREADY_EXISTS".to_string(),
                                success: false,
                            }),
                        ))
                    } else {
                        Err((
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(ErrorResponse {
                                error: "Failed to create user due to database constraint"
                                    .to_string(),
                                code: "DATABASE_CONSTRAINT_ERROR".to_string(),
                                success: false,
                            }),
                        ))
                    }
                }
                _ => Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error while creating user".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                )),
            }
        }
    }
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, StatusCode> {
    trace!("Entering get_users function");
    debug!("Fetching all users from database");

    match user::Entity::find().all(&state.db).await {
        Ok(users) => {
            let user_count = users.len();
            debug!("Retrieved {} users from database", user_count);

            let user_responses: Vec<UserResponse> =
                users.into_iter().map(UserResponse::from).collect();

            info!("Successfully retrieved {} users", user_count);
            let response = ApiResponse {
                data: user_responses,
                message: "Users retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve users from database: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, StatusCode> {
    trace!("Entering get_user function for user_id: {}", user_id);
    debug!("Fetching user with ID: {}", user_id);

    match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user_model)) => {
            info!(
                "Successfully retrieved user with ID: {}, username: {}",
                user_model.id, user_model.username
            );
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("User with ID {} not found", user_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve user with ID {}: {}", user_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Grant a role to a user
///
/// Role names are fixed by the deployment (the migrations seed `hr_user`
/// and `hr_manager`); granting an unknown role is rejected.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/roles",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = GrantRoleRequest,
    responses(
        (status = 201, description = "Role granted successfully", body = ApiResponse<UserRoleResponse>),
        (status = 400, description = "Unknown role", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn grant_role(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<GrantRoleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserRoleResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering grant_role function for user_id: {}", user_id);
    debug!("Granting role '{}' to user {}", request.role, user_id);

    // The user must exist
    match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!("User with ID {} not found for role grant", user_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("User with id {} does not exist", user_id),
                    code: "USER_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!("Failed to lookup user {} for role grant: {}", user_id, db_error);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while granting role".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    }

    // Resolve the role by name; roles are seeded, not created on the fly
    let role_model = match role::Entity::find()
        .filter(role::Column::Name.eq(request.role.as_str()))
        .one(&state.db)
        .await
    {
        Ok(Some(role_model)) => role_model,
        Ok(None) => {
            warn!("Unknown role '{}' requested for user {}", request.role, user_id);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Role '{}' does not exist", request.role),
                    code: "UNKNOWN_ROLE".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!("Failed to lookup role '{}': {}", request.role, db_error);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while granting role".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let grant = user_role::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role_model.id),
    };

    trace!("Attempting to insert role grant into database");
    match grant.insert(&state.db).await {
        Ok(_) => {
            info!("Granted role '{}' to user {}", request.role, user_id);
            let response = ApiResponse {
                data: UserRoleResponse {
                    user_id,
                    role: role_model.name,
                },
                message: "Role granted successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(DbErr::Exec(ref exec_err))
            if exec_err.to_string().to_lowercase().contains("unique")
                || exec_err.to_string().to_lowercase().contains("constraint") =>
        {
            // Granting twice is a no-op
            debug!("User {} already holds role '{}'", user_id, request.role);
            let response = ApiResponse {
                data: UserRoleResponse {
                    user_id,
                    role: role_model.name,
                },
                message: "Role was already granted".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(db_error) => {
            error!(
                "Failed to grant role '{}' to user {}: {}",
                request.role, user_id, db_error
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while granting role".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
