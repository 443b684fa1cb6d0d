//! Shared types and models for LabDesk
//!
//! This crate contains domain types shared between the backend and any
//! other components of the laboratory front-office system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
