//! Lab test catalog service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validation, TestCategory};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Catalog service for the tests the laboratory offers
#[derive(Clone)]
pub struct LabTestService {
    db: PgPool,
}

/// Lab test record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LabTestRecord {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub turnaround_hours: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for adding a test to the catalog
#[derive(Debug, Deserialize)]
pub struct CreateLabTestInput {
    pub code: String,
    pub name: String,
    pub category: TestCategory,
    pub price: Decimal,
    pub turnaround_hours: Option<i32>,
}

/// Input for updating a catalog entry
#[derive(Debug, Deserialize)]
pub struct UpdateLabTestInput {
    pub name: Option<String>,
    pub category: Option<TestCategory>,
    pub price: Option<Decimal>,
    pub turnaround_hours: Option<i32>,
}

/// Query parameters for the catalog list
#[derive(Debug, Deserialize)]
pub struct LabTestListQuery {
    pub active_only: Option<bool>,
    pub category: Option<TestCategory>,
}

impl LabTestService {
    /// Create a new LabTestService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Add a test to the catalog
    pub async fn create(&self, input: CreateLabTestInput) -> AppResult<LabTestRecord> {
        let code = input.code.trim().to_uppercase();
        validation::validate_test_code(&code).map_err(|msg| AppError::Validation {
            field: "code".to_string(),
            message: msg.to_string(),
        })?;
        validation::validate_price(input.price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
        })?;
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Test name is required".to_string(),
            });
        }

        let code_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM lab_tests WHERE code = $1)")
                .bind(&code)
                .fetch_one(&self.db)
                .await?;

        if code_exists {
            return Err(AppError::DuplicateEntry("test code".to_string()));
        }

        let test = sqlx::query_as::<_, LabTestRecord>(
            r#"
            INSERT INTO lab_tests (code, name, category, price, turnaround_hours, is_active)
            VALUES ($1, $2, $3, $4, $5, true)
            RETURNING id, code, name, category, price, turnaround_hours, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(&code)
        .bind(input.name.trim())
        .bind(input.category.as_str())
        .bind(input.price)
        .bind(input.turnaround_hours)
        .fetch_one(&self.db)
        .await?;

        Ok(test)
    }

    /// Get a catalog entry by id
    pub async fn get(&self, test_id: Uuid) -> AppResult<LabTestRecord> {
        sqlx::query_as::<_, LabTestRecord>(
            r#"
            SELECT id, code, name, category, price, turnaround_hours, is_active,
                   created_at, updated_at
            FROM lab_tests
            WHERE id = $1
            "#,
        )
        .bind(test_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lab test".to_string()))
    }

    /// Update a catalog entry
    pub async fn update(
        &self,
        test_id: Uuid,
        input: UpdateLabTestInput,
    ) -> AppResult<LabTestRecord> {
        let existing = self.get(test_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let category = input
            .category
            .map(|c| c.as_str().to_string())
            .unwrap_or(existing.category);
        let price = input.price.unwrap_or(existing.price);
        let turnaround_hours = input.turnaround_hours.or(existing.turnaround_hours);

        validation::validate_price(price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
        })?;

        let test = sqlx::query_as::<_, LabTestRecord>(
            r#"
            UPDATE lab_tests
            SET name = $1, category = $2, price = $3, turnaround_hours = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, code, name, category, price, turnaround_hours, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(name.trim())
        .bind(&category)
        .bind(price)
        .bind(turnaround_hours)
        .bind(test_id)
        .fetch_one(&self.db)
        .await?;

        Ok(test)
    }

    /// List catalog entries
    pub async fn list(&self, query: &LabTestListQuery) -> AppResult<Vec<LabTestRecord>> {
        let active_only = query.active_only.unwrap_or(false);
        let category = query.category.map(|c| c.as_str().to_string());

        let tests = sqlx::query_as::<_, LabTestRecord>(
            r#"
            SELECT id, code, name, category, price, turnaround_hours, is_active,
                   created_at, updated_at
            FROM lab_tests
            WHERE (NOT $1 OR is_active)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY category ASC, code ASC
            "#,
        )
        .bind(active_only)
        .bind(&category)
        .fetch_all(&self.db)
        .await?;

        Ok(tests)
    }

    /// Remove a test from the cashier picker without touching history
    pub async fn deactivate(&self, test_id: Uuid) -> AppResult<LabTestRecord> {
        self.set_active(test_id, false).await
    }

    /// Return a previously deactivated test to the picker
    pub async fn reactivate(&self, test_id: Uuid) -> AppResult<LabTestRecord> {
        self.set_active(test_id, true).await
    }

    async fn set_active(&self, test_id: Uuid, is_active: bool) -> AppResult<LabTestRecord> {
        sqlx::query_as::<_, LabTestRecord>(
            r#"
            UPDATE lab_tests
            SET is_active = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, code, name, category, price, turnaround_hours, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(is_active)
        .bind(test_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lab test".to_string()))
    }
}
