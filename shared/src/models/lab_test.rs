//! Lab test catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A test offered by the laboratory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabTest {
    pub id: Uuid,
    /// Short code used on receipts and worklists (e.g., CBC, FBS)
    pub code: String,
    pub name: String,
    pub category: TestCategory,
    pub price: Decimal,
    /// Expected turnaround in hours, if published
    pub turnaround_hours: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Laboratory sections a test belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TestCategory {
    Hematology,
    ClinicalMicroscopy,
    Chemistry,
    Serology,
    Imaging,
    Other,
}

impl TestCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestCategory::Hematology => "hematology",
            TestCategory::ClinicalMicroscopy => "clinical_microscopy",
            TestCategory::Chemistry => "chemistry",
            TestCategory::Serology => "serology",
            TestCategory::Imaging => "imaging",
            TestCategory::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "hematology" => Some(TestCategory::Hematology),
            "clinical_microscopy" => Some(TestCategory::ClinicalMicroscopy),
            "chemistry" => Some(TestCategory::Chemistry),
            "serology" => Some(TestCategory::Serology),
            "imaging" => Some(TestCategory::Imaging),
            "other" => Some(TestCategory::Other),
            _ => None,
        }
    }
}
