//! Shared types and models for the Leather Factory Tracker
//!
//! This crate contains the domain records and the cost aggregation policy
//! shared between the backend and its tests.

pub mod costing;
pub mod models;
pub mod types;

pub use costing::*;
pub use models::*;
pub use types::*;
