//! Common transport-layer types shared between the backend and API clients.
//! These structs mirror the backend handlers' request/response payloads so
//! callers can deserialize API responses without duplicating shapes.

mod overtime;
mod schedule;

pub use overtime::OvertimeSummary;
pub use schedule::{DayWorkTime, WorkingHoursReport};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
/// Note: The backend has its own definition in workrust/src/schemas.rs with
/// the same field names. We mirror it here for clients to reuse.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}
