//! Persistent data model of the HR overtime tracker.
//!
//! The entity modules describe the schema the rest of the system runs on:
//! employees with their manager hierarchy and overtime configuration,
//! timesheet sheets, working-time calendars with their attendance spans,
//! employment contracts, and the user/role tables behind the permission
//! checks.

pub mod entities;
