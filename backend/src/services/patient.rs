//! Patient intake service

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{validation, PaginatedResponse, PaginationMeta, Sex};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Patient service for intake and demographic maintenance
#[derive(Clone)]
pub struct PatientService {
    db: PgPool,
}

/// Patient record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PatientRecord {
    pub id: Uuid,
    pub patient_code: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub philhealth_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a patient
#[derive(Debug, Deserialize)]
pub struct RegisterPatientInput {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub sex: Sex,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub philhealth_number: Option<String>,
}

/// Input for updating a patient
#[derive(Debug, Deserialize)]
pub struct UpdatePatientInput {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub philhealth_number: Option<String>,
}

/// Query parameters for the patient list
#[derive(Debug, Deserialize)]
pub struct PatientSearchQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn validate_contact_fields(
    contact_number: Option<&str>,
    email: Option<&str>,
    philhealth_number: Option<&str>,
) -> AppResult<()> {
    if let Some(number) = contact_number {
        validation::validate_ph_mobile(number).map_err(|msg| AppError::Validation {
            field: "contact_number".to_string(),
            message: msg.to_string(),
        })?;
    }
    if let Some(email) = email {
        validation::validate_email(email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
        })?;
    }
    if let Some(pin) = philhealth_number {
        validation::validate_philhealth_number(pin).map_err(|msg| AppError::Validation {
            field: "philhealth_number".to_string(),
            message: msg.to_string(),
        })?;
    }
    Ok(())
}

impl PatientService {
    /// Create a new PatientService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Generate the next patient code: PT-YYYY-NNNNN
    async fn generate_patient_code(&self) -> AppResult<String> {
        let year = Utc::now().year();
        let prefix = format!("PT-{}-", year);

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM patients WHERE patient_code LIKE $1")
                .bind(format!("{}%", prefix))
                .fetch_one(&self.db)
                .await?;

        Ok(format!("{}{:05}", prefix, count + 1))
    }

    /// Register a new patient
    pub async fn register(&self, input: RegisterPatientInput) -> AppResult<PatientRecord> {
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "First and last name are required".to_string(),
            });
        }
        validate_contact_fields(
            input.contact_number.as_deref(),
            input.email.as_deref(),
            input.philhealth_number.as_deref(),
        )?;

        let patient_code = self.generate_patient_code().await?;

        let patient = sqlx::query_as::<_, PatientRecord>(
            r#"
            INSERT INTO patients (
                patient_code, first_name, middle_name, last_name, birth_date, sex,
                contact_number, email, address, philhealth_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, patient_code, first_name, middle_name, last_name, birth_date, sex,
                      contact_number, email, address, philhealth_number, created_at, updated_at
            "#,
        )
        .bind(&patient_code)
        .bind(input.first_name.trim())
        .bind(&input.middle_name)
        .bind(input.last_name.trim())
        .bind(input.birth_date)
        .bind(input.sex.as_str())
        .bind(&input.contact_number)
        .bind(&input.email)
        .bind(&input.address)
        .bind(&input.philhealth_number)
        .fetch_one(&self.db)
        .await?;

        Ok(patient)
    }

    /// Get a patient by id
    pub async fn get(&self, patient_id: Uuid) -> AppResult<PatientRecord> {
        sqlx::query_as::<_, PatientRecord>(
            r#"
            SELECT id, patient_code, first_name, middle_name, last_name, birth_date, sex,
                   contact_number, email, address, philhealth_number, created_at, updated_at
            FROM patients
            WHERE id = $1
            "#,
        )
        .bind(patient_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Patient".to_string()))
    }

    /// Update a patient's demographics
    pub async fn update(
        &self,
        patient_id: Uuid,
        input: UpdatePatientInput,
    ) -> AppResult<PatientRecord> {
        let existing = self.get(patient_id).await?;

        let first_name = input.first_name.unwrap_or(existing.first_name);
        let middle_name = input.middle_name.or(existing.middle_name);
        let last_name = input.last_name.unwrap_or(existing.last_name);
        let birth_date = input.birth_date.unwrap_or(existing.birth_date);
        let sex = input
            .sex
            .map(|s| s.as_str().to_string())
            .unwrap_or(existing.sex);
        let contact_number = input.contact_number.or(existing.contact_number);
        let email = input.email.or(existing.email);
        let address = input.address.or(existing.address);
        let philhealth_number = input.philhealth_number.or(existing.philhealth_number);

        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "First and last name are required".to_string(),
            });
        }
        validate_contact_fields(
            contact_number.as_deref(),
            email.as_deref(),
            philhealth_number.as_deref(),
        )?;

        let patient = sqlx::query_as::<_, PatientRecord>(
            r#"
            UPDATE patients
            SET first_name = $1, middle_name = $2, last_name = $3, birth_date = $4, sex = $5,
                contact_number = $6, email = $7, address = $8, philhealth_number = $9,
                updated_at = NOW()
            WHERE id = $10
            RETURNING id, patient_code, first_name, middle_name, last_name, birth_date, sex,
                      contact_number, email, address, philhealth_number, created_at, updated_at
            "#,
        )
        .bind(first_name.trim())
        .bind(&middle_name)
        .bind(last_name.trim())
        .bind(birth_date)
        .bind(&sex)
        .bind(&contact_number)
        .bind(&email)
        .bind(&address)
        .bind(&philhealth_number)
        .bind(patient_id)
        .fetch_one(&self.db)
        .await?;

        Ok(patient)
    }

    /// List patients with optional name/code search, paginated
    pub async fn list(
        &self,
        query: &PatientSearchQuery,
    ) -> AppResult<PaginatedResponse<PatientRecord>> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page as i64 - 1) * per_page as i64;
        let pattern = query
            .search
            .as_deref()
            .map(|s| format!("%{}%", s.trim()));

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM patients
            WHERE $1::text IS NULL
               OR first_name ILIKE $1 OR last_name ILIKE $1 OR patient_code ILIKE $1
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.db)
        .await?;

        let patients = sqlx::query_as::<_, PatientRecord>(
            r#"
            SELECT id, patient_code, first_name, middle_name, last_name, birth_date, sex,
                   contact_number, email, address, philhealth_number, created_at, updated_at
            FROM patients
            WHERE $1::text IS NULL
               OR first_name ILIKE $1 OR last_name ILIKE $1 OR patient_code ILIKE $1
            ORDER BY last_name ASC, first_name ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(per_page as i64)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: patients,
            pagination: PaginationMeta::new(page, per_page, total as u64),
        })
    }

    /// Delete a patient; rejected while transactions reference them
    pub async fn delete(&self, patient_id: Uuid) -> AppResult<()> {
        let has_transactions: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM transactions WHERE patient_id = $1)",
        )
        .bind(patient_id)
        .fetch_one(&self.db)
        .await?;

        if has_transactions {
            return Err(AppError::Conflict(
                "Patient has recorded transactions and cannot be deleted".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(patient_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Patient".to_string()));
        }

        Ok(())
    }
}
