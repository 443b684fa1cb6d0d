//! HTTP handlers for patient intake endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use shared::PaginatedResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::cashier::TransactionRecord;
use crate::services::patient::{
    PatientRecord, PatientSearchQuery, RegisterPatientInput, UpdatePatientInput,
};
use crate::services::{CashierService, PatientService};
use crate::AppState;

/// Register a new patient
pub async fn register_patient(
    State(state): State<AppState>,
    Json(input): Json<RegisterPatientInput>,
) -> AppResult<Json<PatientRecord>> {
    let service = PatientService::new(state.db);
    let patient = service.register(input).await?;
    Ok(Json(patient))
}

/// Get a patient by id
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> AppResult<Json<PatientRecord>> {
    let service = PatientService::new(state.db);
    let patient = service.get(patient_id).await?;
    Ok(Json(patient))
}

/// Update a patient's demographics
pub async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    Json(input): Json<UpdatePatientInput>,
) -> AppResult<Json<PatientRecord>> {
    let service = PatientService::new(state.db);
    let patient = service.update(patient_id, input).await?;
    Ok(Json(patient))
}

/// List/search patients
pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<PatientSearchQuery>,
) -> AppResult<Json<PaginatedResponse<PatientRecord>>> {
    let service = PatientService::new(state.db);
    let patients = service.list(&query).await?;
    Ok(Json(patients))
}

/// Delete a patient
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = PatientService::new(state.db);
    service.delete(patient_id).await?;
    Ok(Json(()))
}

/// List a patient's transactions
pub async fn get_patient_transactions(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> AppResult<Json<Vec<TransactionRecord>>> {
    // Surface missing patients as 404 rather than an empty list
    PatientService::new(state.db.clone()).get(patient_id).await?;

    let service = CashierService::new(state.db, state.config.billing.clone());
    let transactions = service.list_for_patient(patient_id).await?;
    Ok(Json(transactions))
}
