use crate::handlers::{
    employees::{
        create_employee, delete_employee, get_employee, get_employee_overtime,
        get_employee_overtime_access, get_employee_working_hours, get_employees, update_employee,
    },
    health::health_check,
    timesheet_sheets::{
        create_timesheet_sheet, get_timesheet_sheet, get_timesheet_sheets, update_timesheet_sheet,
    },
    users::{create_user, get_user, get_users, grant_role},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
#[cfg(not(test))]
use axum_prometheus::PrometheusMetricLayer;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Prometheus metrics are disabled in test builds: the recorder is a
    // process-wide global and test binaries would race on installing it.
    #[cfg(not(test))]
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // User CRUD and role grants
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id/roles", post(grant_role))
        // Employee CRUD routes
        .route("/api/v1/employees", post(create_employee))
        .route("/api/v1/employees", get(get_employees))
        .route("/api/v1/employees/:employee_id", get(get_employee))
        .route("/api/v1/employees/:employee_id", put(update_employee))
        .route("/api/v1/employees/:employee_id", delete(delete_employee))
        // Overtime and working time routes
        .route(
            "/api/v1/employees/:employee_id/overtime",
            get(get_employee_overtime),
        )
        .route(
            "/api/v1/employees/:employee_id/overtime-access",
            get(get_employee_overtime_access),
        )
        .route(
            "/api/v1/employees/:employee_id/working-hours",
            get(get_employee_working_hours),
        )
        // Timesheet sheet CRUD routes
        .route("/api/v1/timesheet-sheets", post(create_timesheet_sheet))
        .route("/api/v1/timesheet-sheets", get(get_timesheet_sheets))
        .route("/api/v1/timesheet-sheets/:sheet_id", get(get_timesheet_sheet))
        .route("/api/v1/timesheet-sheets/:sheet_id", put(update_timesheet_sheet))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    #[cfg(not(test))]
    let router = router
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer);

    router
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
