use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use axum_valid::Valid;
use chrono::{Local, NaiveDate};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::handlers::acting_user_id;
use crate::schemas::{
    ApiResponse, AppState, CachedData, EmployeeListQuery, ErrorResponse, WorkingHoursQuery,
};
use common::{OvertimeSummary, WorkingHoursReport};
use compute::error::ComputeError;
use compute::guard::OvertimeConfigUpdate;
use model::entities::{employee, user};

/// Request body for creating a new employee
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateEmployeeRequest {
    /// Employee name
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// IANA timezone of the employee (e.g. "Europe/Brussels")
    pub tz: Option<String>,
    /// Linked login user, if the employee can sign in
    pub user_id: Option<i32>,
    /// Manager of the employee
    pub parent_id: Option<i32>,
    /// Manually entered starting overtime balance in hours (defaults to 0)
    #[validate(range(min = -10000.0, max = 10000.0))]
    pub initial_overtime: Option<f64>,
    /// Date from which sheet overtime is counted (defaults to January 1st of
    /// the current year)
    pub overtime_start_date: Option<NaiveDate>,
}

/// Request body for updating an employee
///
/// All fields are optional; absent fields are left untouched. Changing
/// `initial_overtime` or `overtime_start_date` to a new value requires an
/// elevated HR role on the acting user.
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub tz: Option<String>,
    pub user_id: Option<i32>,
    pub parent_id: Option<i32>,
    pub active: Option<bool>,
    #[validate(range(min = -10000.0, max = 10000.0))]
    pub initial_overtime: Option<f64>,
    pub overtime_start_date: Option<NaiveDate>,
}

/// Employee response model
#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeResponse {
    pub id: i32,
    pub name: String,
    pub tz: Option<String>,
    pub user_id: Option<i32>,
    pub parent_id: Option<i32>,
    pub initial_overtime: f64,
    pub overtime_start_date: NaiveDate,
    pub active: bool,
}

impl From<employee::Model> for EmployeeResponse {
    fn from(model: employee::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            tz: model.tz,
            user_id: model.user_id,
            parent_id: model.parent_id,
            initial_overtime: model.initial_overtime,
            overtime_start_date: model.overtime_start_date,
            active: model.active,
        }
    }
}

/// Result of an overtime visibility check
#[derive(Debug, Serialize, ToSchema)]
pub struct OvertimeAccessResponse {
    pub employee_id: i32,
    pub acting_user_id: i32,
    pub has_overtime_access: bool,
}

/// Maps a compute-layer error onto the API error contract.
fn map_compute_error(err: ComputeError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        ComputeError::Configuration(message) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: message,
                code: "MISSING_TIMEZONE".to_string(),
                success: false,
            }),
        ),
        ComputeError::Date(message) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: message,
                code: "INVALID_DATE_RANGE".to_string(),
                success: false,
            }),
        ),
        ComputeError::AccessDenied(message) => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: message,
                code: "OVERTIME_WRITE_FORBIDDEN".to_string(),
                success: false,
            }),
        ),
        ComputeError::Database(db_error) => {
            error!("Database error during computation: {}", db_error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error during computation".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            )
        }
        other => {
            error!("Computation failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error during computation".to_string(),
                    code: "COMPUTE_ERROR".to_string(),
                    success: false,
                }),
            )
        }
    }
}

/// Missing `x-acting-user` header on an endpoint that needs an identity.
fn missing_acting_user() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Missing or malformed x-acting-user header".to_string(),
            code: "MISSING_ACTING_USER".to_string(),
            success: false,
        }),
    )
}

/// Create a new employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    tag = "employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created successfully", body = ApiResponse<EmployeeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_employee(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateEmployeeRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<EmployeeResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_employee function");
    debug!("Creating employee with name: {}", request.name);

    // Validate that the linked user exists if provided
    if let Some(user_id) = request.user_id {
        trace!("Validating linked user ID: {}", user_id);
        match user::Entity::find_by_id(user_id).one(&state.db).await {
            Ok(Some(_)) => {
                debug!("Linked user {} validated successfully", user_id);
            }
            Ok(None) => {
                warn!("Invalid user ID provided: {}", user_id);
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("User with id {} does not exist", user_id),
                        code: "INVALID_USER_ID".to_string(),
                        success: false,
                    }),
                ));
            }
            Err(db_error) => {
                error!("Database error validating user {}: {}", user_id, db_error);
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error while validating user".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                ));
            }
        }
    }

    // Validate that the manager exists if provided
    if let Some(parent_id) = request.parent_id {
        trace!("Validating manager ID: {}", parent_id);
        match employee::Entity::find_by_id(parent_id).one(&state.db).await {
            Ok(Some(_)) => {
                debug!("Manager {} validated successfully", parent_id);
            }
            Ok(None) => {
                warn!("Invalid manager ID provided: {}", parent_id);
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Employee with id {} does not exist", parent_id),
                        code: "INVALID_PARENT_ID".to_string(),
                        success: false,
                    }),
                ));
            }
            Err(db_error) => {
                error!(
                    "Database error validating manager {}: {}",
                    parent_id, db_error
                );
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error while validating manager".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                ));
            }
        }
    }

    let overtime_start_date = request
        .overtime_start_date
        .unwrap_or_else(|| compute::overtime::default_overtime_start_date(None));

    let new_employee = employee::ActiveModel {
        name: Set(request.name.clone()),
        tz: Set(request.tz.clone()),
        user_id: Set(request.user_id),
        parent_id: Set(request.parent_id),
        initial_overtime: Set(request.initial_overtime.unwrap_or(0.0)),
        overtime_start_date: Set(overtime_start_date),
        active: Set(true),
        ..Default::default()
    };

    trace!("Attempting to insert new employee into database");
    match new_employee.insert(&state.db).await {
        Ok(employee_model) => {
            info!(
                "Employee created successfully with ID: {}, name: {}",
                employee_model.id, employee_model.name
            );
            let response = ApiResponse {
                data: EmployeeResponse::from(employee_model),
                message: "Employee created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to create employee '{}': {}", request.name, db_error);

            match db_error {
                DbErr::Exec(ref exec_err) => {
                    let error_msg = exec_err.to_string().to_lowercase();
                    if error_msg.contains("unique") || error_msg.contains("constraint") {
                        Err((
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: "Employee violates a database constraint".to_string(),
                                code: "DATABASE_CONSTRAINT_ERROR".to_string(),
                                success: false,
                            }),
                        ))
                    } else {
                        Err((
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(ErrorResponse {
                                error: "Failed to create employee".to_string(),
                                code: "DATABASE_ERROR".to_string(),
                                success: false,
                            }),
                        ))
                    }
                }
                _ => Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error while creating employee".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                )),
            }
        }
    }
}

/// Get all employees
///
/// Archived employees are hidden unless `include_archived=true` is passed.
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    tag = "employees",
    params(
        ("include_archived" = Option<bool>, Query, description = "Include archived employees"),
    ),
    responses(
        (status = 200, description = "Employees retrieved successfully", body = ApiResponse<Vec<EmployeeResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_employees(
    State(state): State<AppState>,
    Query(query): Query<EmployeeListQuery>,
) -> Result<Json<ApiResponse<Vec<EmployeeResponse>>>, StatusCode> {
    trace!("Entering get_employees function");
    let include_archived = query.include_archived.unwrap_or(false);
    debug!(
        "Fetching employees from database (include_archived: {})",
        include_archived
    );

    let mut finder = employee::Entity::find();
    if !include_archived {
        finder = finder.filter(employee::Column::Active.eq(true));
    }

    match finder.all(&state.db).await {
        Ok(employees) => {
            let employee_count = employees.len();
            debug!("Retrieved {} employees from database", employee_count);

            let employee_responses: Vec<EmployeeResponse> =
                employees.into_iter().map(EmployeeResponse::from).collect();

            info!("Successfully retrieved {} employees", employee_count);
            let response = ApiResponse {
                data: employee_responses,
                message: "Employees retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve employees from database: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    tag = "employees",
    params(
        ("employee_id" = i32, Path, description = "Employee ID"),
    ),
    responses(
        (status = 200, description = "Employee retrieved successfully", body = ApiResponse<EmployeeResponse>),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_employee(
    Path(employee_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<EmployeeResponse>>, StatusCode> {
    trace!("Entering get_employee function for employee_id: {}", employee_id);
    debug!("Fetching employee with ID: {}", employee_id);

    match employee::Entity::find_by_id(employee_id).one(&state.db).await {
        Ok(Some(employee_model)) => {
            info!(
                "Successfully retrieved employee with ID: {}, name: {}",
                employee_model.id, employee_model.name
            );
            let response = ApiResponse {
                data: EmployeeResponse::from(employee_model),
                message: "Employee retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Employee with ID {} not found", employee_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve employee with ID {}: {}",
                employee_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update an employee
///
/// Requires the `x-acting-user` header. Changing `initial_overtime` or
/// `overtime_start_date` to a new value is rejected with 403 unless the
/// acting user holds the `hr_user` or `hr_manager` role; re-sending the
/// stored values passes for anyone. A rejected update persists nothing.
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    tag = "employees",
    params(
        ("employee_id" = i32, Path, description = "Employee ID"),
        ("x-acting-user" = i32, Header, description = "User performing the update"),
    ),
    request_body = UpdateEmployeeRequest,
    responses(
        (status = 200, description = "Employee updated successfully", body = ApiResponse<EmployeeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing acting user", body = ErrorResponse),
        (status = 403, description = "Overtime fields are protected", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn update_employee(
    Path(employee_id): Path<i32>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Valid(Json(request)): Valid<Json<UpdateEmployeeRequest>>,
) -> Result<Json<ApiResponse<EmployeeResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_employee function for employee_id: {}", employee_id);

    let Some(acting_user) = acting_user_id(&headers) else {
        warn!("Update of employee {} rejected: no acting user", employee_id);
        return Err(missing_acting_user());
    };
    debug!("User {} updating employee {}", acting_user, employee_id);

    let existing = match employee::Entity::find_by_id(employee_id).one(&state.db).await {
        Ok(Some(employee_model)) => employee_model,
        Ok(None) => {
            warn!("Employee with ID {} not found for update", employee_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Employee with id {} does not exist", employee_id),
                    code: "EMPLOYEE_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve employee {} for update: {}",
                employee_id, db_error
            );
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while updating employee".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    // The guard runs before anything is written so a rejected update
    // persists no field at all, including the unprotected ones.
    let overtime_update = OvertimeConfigUpdate {
        initial_overtime: request.initial_overtime,
        overtime_start_date: request.overtime_start_date,
    };
    if let Err(err) =
        compute::guard::check_overtime_update(&state.db, acting_user, &existing, &overtime_update)
            .await
    {
        warn!(
            "Overtime configuration update of employee {} by user {} rejected",
            employee_id, acting_user
        );
        return Err(map_compute_error(err));
    }

    // Validate referenced records before touching the row
    if let Some(user_id) = request.user_id {
        match user::Entity::find_by_id(user_id).one(&state.db).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!("Invalid user ID provided in update: {}", user_id);
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("User with id {} does not exist", user_id),
                        code: "INVALID_USER_ID".to_string(),
                        success: false,
                    }),
                ));
            }
            Err(db_error) => {
                error!("Database error validating user {}: {}", user_id, db_error);
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error while validating user".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                ));
            }
        }
    }
    if let Some(parent_id) = request.parent_id {
        match employee::Entity::find_by_id(parent_id).one(&state.db).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!("Invalid manager ID provided in update: {}", parent_id);
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Employee with id {} does not exist", parent_id),
                        code: "INVALID_PARENT_ID".to_string(),
                        success: false,
                    }),
                ));
            }
            Err(db_error) => {
                error!(
                    "Database error validating manager {}: {}",
                    parent_id, db_error
                );
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error while validating manager".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                ));
            }
        }
    }

    let mut active_employee: employee::ActiveModel = existing.into();
    let mut updated_fields = Vec::new();

    if let Some(name) = request.name {
        active_employee.name = Set(name);
        updated_fields.push("name");
    }
    if let Some(tz) = request.tz {
        active_employee.tz = Set(Some(tz));
        updated_fields.push("tz");
    }
    if let Some(user_id) = request.user_id {
        active_employee.user_id = Set(Some(user_id));
        updated_fields.push("user_id");
    }
    if let Some(parent_id) = request.parent_id {
        active_employee.parent_id = Set(Some(parent_id));
        updated_fields.push("parent_id");
    }
    if let Some(active) = request.active {
        active_employee.active = Set(active);
        updated_fields.push("active");
    }
    if let Some(initial_overtime) = request.initial_overtime {
        active_employee.initial_overtime = Set(initial_overtime);
        updated_fields.push("initial_overtime");
    }
    if let Some(overtime_start_date) = request.overtime_start_date {
        active_employee.overtime_start_date = Set(overtime_start_date);
        updated_fields.push("overtime_start_date");
    }

    if updated_fields.is_empty() {
        debug!("No fields provided to update for employee {}", employee_id);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No fields provided to update".to_string(),
                code: "EMPTY_UPDATE".to_string(),
                success: false,
            }),
        ));
    }

    debug!(
        "Updating fields [{}] of employee {}",
        updated_fields.join(", "),
        employee_id
    );
    match active_employee.update(&state.db).await {
        Ok(employee_model) => {
            // Stored configuration changed, cached totals may be stale
            let cache_key = format!("overtime_{}", employee_id);
            state.cache.invalidate(&cache_key).await;
            trace!("Invalidated cache key: {}", cache_key);

            // A timezone change moves the local day boundaries, so every
            // cached working-hours range of this employee goes too.
            if updated_fields.contains(&"tz") {
                let prefix = format!("working_hours_{}_", employee_id);
                if state
                    .cache
                    .invalidate_entries_if(move |key, _| key.starts_with(&prefix))
                    .is_err()
                {
                    warn!(
                        "Could not invalidate working-hours cache entries of employee {}",
                        employee_id
                    );
                }
            }

            info!(
                "Employee {} updated successfully by user {}",
                employee_id, acting_user
            );
            let response = ApiResponse {
                data: EmployeeResponse::from(employee_model),
                message: "Employee updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update employee {}: {}", employee_id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while updating employee".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Archive an employee
///
/// Archiving keeps the row but hides the employee from default listings and
/// from overtime accrual of other computations that filter on `active`.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    tag = "employees",
    params(
        ("employee_id" = i32, Path, description = "Employee ID"),
    ),
    responses(
        (status = 200, description = "Employee archived successfully", body = ApiResponse<EmployeeResponse>),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_employee(
    Path(employee_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<EmployeeResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering delete_employee function for employee_id: {}", employee_id);
    debug!("Archiving employee with ID: {}", employee_id);

    let existing = match employee::Entity::find_by_id(employee_id).one(&state.db).await {
        Ok(Some(employee_model)) => employee_model,
        Ok(None) => {
            warn!("Employee with ID {} not found for archive", employee_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Employee with id {} does not exist", employee_id),
                    code: "EMPLOYEE_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve employee {} for archive: {}",
                employee_id, db_error
            );
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while archiving employee".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let mut active_employee: employee::ActiveModel = existing.into();
    active_employee.active = Set(false);

    match active_employee.update(&state.db).await {
        Ok(employee_model) => {
            let cache_key = format!("overtime_{}", employee_id);
            state.cache.invalidate(&cache_key).await;
            trace!("Invalidated cache key: {}", cache_key);

            info!("Employee {} archived successfully", employee_id);
            let response = ApiResponse {
                data: EmployeeResponse::from(employee_model),
                message: "Employee archived successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to archive employee {}: {}", employee_id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while archiving employee".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get the overtime balance of an employee
///
/// The summary is cached; employee and timesheet sheet mutations invalidate
/// the cached entry explicitly, so a fresh value follows every write.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/overtime",
    tag = "overtime",
    params(
        ("employee_id" = i32, Path, description = "Employee ID"),
    ),
    responses(
        (status = 200, description = "Overtime retrieved successfully", body = ApiResponse<OvertimeSummary>),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_employee_overtime(
    Path(employee_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<OvertimeSummary>>, (StatusCode, Json<ErrorResponse>)> {
    trace!(
        "Entering get_employee_overtime function for employee_id: {}",
        employee_id
    );

    let cache_key = format!("overtime_{}", employee_id);
    trace!("Checking cache for key: {}", cache_key);
    if let Some(CachedData::Overtime(summary)) = state.cache.get(&cache_key).await {
        debug!("Cache hit for overtime of employee {}", employee_id);
        return Ok(Json(ApiResponse {
            data: summary,
            message: "Overtime retrieved from cache".to_string(),
            success: true,
        }));
    }
    debug!("Cache miss for overtime of employee {}", employee_id);

    let employee_model = match employee::Entity::find_by_id(employee_id).one(&state.db).await {
        Ok(Some(employee_model)) => employee_model,
        Ok(None) => {
            warn!("Employee with ID {} not found for overtime", employee_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Employee with id {} does not exist", employee_id),
                    code: "EMPLOYEE_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve employee {} for overtime: {}",
                employee_id, db_error
            );
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while computing overtime".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    match compute::overtime::overtime_summary(&state.db, &employee_model).await {
        Ok(summary) => {
            state
                .cache
                .insert(cache_key.clone(), CachedData::Overtime(summary.clone()))
                .await;
            trace!("Cached overtime under key: {}", cache_key);

            info!(
                "Computed overtime for employee {}: {} hours",
                employee_id, summary.total_overtime
            );
            Ok(Json(ApiResponse {
                data: summary,
                message: "Overtime computed successfully".to_string(),
                success: true,
            }))
        }
        Err(err) => {
            error!(
                "Failed to compute overtime for employee {}: {}",
                employee_id, err
            );
            Err(map_compute_error(err))
        }
    }
}

/// Check whether the acting user may see an employee's overtime
///
/// Visibility is granted to holders of the elevated HR roles, to the
/// employee's own linked user, and to users whose linked employees are
/// (transitive) managers of the employee. The answer depends on the acting
/// identity, so it is never cached.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/overtime-access",
    tag = "overtime",
    params(
        ("employee_id" = i32, Path, description = "Employee ID"),
        ("x-acting-user" = i32, Header, description = "User asking for visibility"),
    ),
    responses(
        (status = 200, description = "Access evaluated successfully", body = ApiResponse<OvertimeAccessResponse>),
        (status = 401, description = "Missing acting user", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn get_employee_overtime_access(
    Path(employee_id): Path<i32>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<OvertimeAccessResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!(
        "Entering get_employee_overtime_access function for employee_id: {}",
        employee_id
    );

    let Some(acting_user) = acting_user_id(&headers) else {
        warn!(
            "Overtime access check of employee {} rejected: no acting user",
            employee_id
        );
        return Err(missing_acting_user());
    };
    debug!(
        "Evaluating overtime access of user {} to employee {}",
        acting_user, employee_id
    );

    let employee_model = match employee::Entity::find_by_id(employee_id).one(&state.db).await {
        Ok(Some(employee_model)) => employee_model,
        Ok(None) => {
            warn!(
                "Employee with ID {} not found for access check",
                employee_id
            );
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Employee with id {} does not exist", employee_id),
                    code: "EMPLOYEE_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve employee {} for access check: {}",
                employee_id, db_error
            );
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while evaluating access".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    match compute::access::has_overtime_access(&state.db, acting_user, &employee_model).await {
        Ok(has_access) => {
            info!(
                "Overtime access of user {} to employee {}: {}",
                acting_user, employee_id, has_access
            );
            Ok(Json(ApiResponse {
                data: OvertimeAccessResponse {
                    employee_id,
                    acting_user_id: acting_user,
                    has_overtime_access: has_access,
                },
                message: "Overtime access evaluated successfully".to_string(),
                success: true,
            }))
        }
        Err(err) => {
            error!(
                "Failed to evaluate overtime access for employee {}: {}",
                employee_id, err
            );
            Err(map_compute_error(err))
        }
    }
}

/// Get the working hours of an employee
///
/// Without query parameters the current day is evaluated against the local
/// date of the server process; that answer shifts at midnight and is never
/// cached. With `start_date` (and optionally `end_date`) a fixed inclusive
/// range is evaluated and the report is cached under its range.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}/working-hours",
    tag = "overtime",
    params(
        ("employee_id" = i32, Path, description = "Employee ID"),
        ("start_date" = Option<String>, Query, description = "Range start (YYYY-MM-DD); omit for the current day"),
        ("end_date" = Option<String>, Query, description = "Range end (YYYY-MM-DD), inclusive; defaults to start_date"),
    ),
    responses(
        (status = 200, description = "Working hours retrieved successfully", body = ApiResponse<WorkingHoursReport>),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 422, description = "Employee has no usable timezone", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_employee_working_hours(
    Path(employee_id): Path<i32>,
    State(state): State<AppState>,
    Query(query): Query<WorkingHoursQuery>,
) -> Result<Json<ApiResponse<WorkingHoursReport>>, (StatusCode, Json<ErrorResponse>)> {
    trace!(
        "Entering get_employee_working_hours function for employee_id: {}",
        employee_id
    );

    if query.start_date.is_none() && query.end_date.is_some() {
        warn!("Working hours query with end_date but no start_date");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "end_date requires start_date".to_string(),
                code: "INVALID_DATE_RANGE".to_string(),
                success: false,
            }),
        ));
    }

    // Current-day answers depend on the clock, so only explicit ranges are
    // cache candidates.
    let explicit_range = query.start_date.is_some();
    let start_date = query
        .start_date
        .unwrap_or_else(|| Local::now().date_naive());
    let end_date = query.end_date.unwrap_or(start_date);

    let cache_key = format!("working_hours_{}_{}_{}", employee_id, start_date, end_date);
    if explicit_range {
        trace!("Checking cache for key: {}", cache_key);
        if let Some(CachedData::WorkingHours(report)) = state.cache.get(&cache_key).await {
            debug!("Cache hit for working hours of employee {}", employee_id);
            return Ok(Json(ApiResponse {
                data: report,
                message: "Working hours retrieved from cache".to_string(),
                success: true,
            }));
        }
        debug!("Cache miss for working hours of employee {}", employee_id);
    }

    let employee_model = match employee::Entity::find_by_id(employee_id).one(&state.db).await {
        Ok(Some(employee_model)) => employee_model,
        Ok(None) => {
            warn!(
                "Employee with ID {} not found for working hours",
                employee_id
            );
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Employee with id {} does not exist", employee_id),
                    code: "EMPLOYEE_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve employee {} for working hours: {}",
                employee_id, db_error
            );
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error while computing working hours".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let calendar = compute::default_calendar();
    match compute::schedule::list_working_time(
        &state.db,
        &calendar,
        &employee_model,
        start_date,
        query.end_date,
    )
    .await
    {
        Ok(work_time) => {
            let report = WorkingHoursReport::new(employee_id, start_date, end_date, work_time);

            if explicit_range {
                state
                    .cache
                    .insert(cache_key.clone(), CachedData::WorkingHours(report.clone()))
                    .await;
                trace!("Cached working hours under key: {}", cache_key);
            }

            info!(
                "Computed working hours for employee {} over [{}, {}]: {} hours",
                employee_id, start_date, end_date, report.total_hours
            );
            Ok(Json(ApiResponse {
                data: report,
                message: "Working hours computed successfully".to_string(),
                success: true,
            }))
        }
        Err(err) => {
            error!(
                "Failed to compute working hours for employee {}: {}",
                employee_id, err
            );
            Err(map_compute_error(err))
        }
    }
}
