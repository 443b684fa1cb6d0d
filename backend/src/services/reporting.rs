//! Reporting service for financial summaries and data export

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppResult;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Daily sales summary (voided transactions excluded from sums)
#[derive(Debug, Serialize)]
pub struct DailySalesSummary {
    pub date: NaiveDate,
    pub transaction_count: i64,
    pub voided_count: i64,
    pub gross_amount: Decimal,
    pub discount_amount: Decimal,
    pub philhealth_amount: Decimal,
    pub net_amount: Decimal,
}

/// Revenue aggregated per catalog test
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RevenueByTest {
    pub test_code: String,
    pub test_name: String,
    pub times_ordered: i64,
    pub revenue: Decimal,
}

/// Front-office dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub patients_today: i64,
    pub transactions_today: i64,
    pub pending_queue: i64,
    pub collections_today: Decimal,
    pub low_stock_items: i64,
}

/// Report filter parameters
#[derive(Debug, Deserialize)]
pub struct ReportRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// CSV row for the transaction export
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TransactionExportRow {
    pub receipt_number: String,
    pub transaction_date: NaiveDate,
    pub patient_code: String,
    pub patient_name: String,
    pub cashier_name: String,
    pub status: String,
    pub gross_amount: Decimal,
    pub discount_amount: Decimal,
    pub philhealth_amount: Decimal,
    pub net_amount: Decimal,
    pub voided: bool,
}

fn range_bounds(query: &ReportRangeQuery) -> (NaiveDate, NaiveDate) {
    let start = query
        .start_date
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date"));
    let end = query
        .end_date
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2100, 12, 31).expect("valid date"));
    (start, end)
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Daily sales summary for a date
    pub async fn daily_sales_summary(&self, date: NaiveDate) -> AppResult<DailySalesSummary> {
        let row: (i64, i64, Decimal, Decimal, Decimal, Decimal) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE voided_at IS NULL) AS transaction_count,
                COUNT(*) FILTER (WHERE voided_at IS NOT NULL) AS voided_count,
                COALESCE(SUM(gross_amount) FILTER (WHERE voided_at IS NULL), 0),
                COALESCE(SUM(discount_amount) FILTER (WHERE voided_at IS NULL), 0),
                COALESCE(SUM(philhealth_amount) FILTER (WHERE voided_at IS NULL), 0),
                COALESCE(SUM(net_amount) FILTER (WHERE voided_at IS NULL), 0)
            FROM transactions
            WHERE transaction_date = $1
            "#,
        )
        .bind(date)
        .fetch_one(&self.db)
        .await?;

        Ok(DailySalesSummary {
            date,
            transaction_count: row.0,
            voided_count: row.1,
            gross_amount: row.2,
            discount_amount: row.3,
            philhealth_amount: row.4,
            net_amount: row.5,
        })
    }

    /// Revenue per test over a date range, voided excluded
    pub async fn revenue_by_test(
        &self,
        query: &ReportRangeQuery,
    ) -> AppResult<Vec<RevenueByTest>> {
        let (start, end) = range_bounds(query);

        let rows = sqlx::query_as::<_, RevenueByTest>(
            r#"
            SELECT ti.test_code, ti.test_name,
                   COUNT(*) AS times_ordered,
                   COALESCE(SUM(ti.price), 0) AS revenue
            FROM transaction_items ti
            JOIN transactions t ON t.id = ti.transaction_id
            WHERE t.transaction_date BETWEEN $1 AND $2
              AND t.voided_at IS NULL
            GROUP BY ti.test_code, ti.test_name
            ORDER BY revenue DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Front-office dashboard metrics
    pub async fn dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let patients_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM patients WHERE created_at::date = CURRENT_DATE",
        )
        .fetch_one(&self.db)
        .await?;

        let transactions_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM transactions WHERE transaction_date = CURRENT_DATE AND voided_at IS NULL",
        )
        .fetch_one(&self.db)
        .await?;

        let pending_queue: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM transactions
            WHERE transaction_date = CURRENT_DATE
              AND voided_at IS NULL
              AND status IN ('pending', 'processing')
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let collections_today: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(net_amount), 0) FROM transactions
            WHERE transaction_date = CURRENT_DATE AND voided_at IS NULL
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let low_stock_items: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM inventory_items i
            WHERE i.is_active
              AND COALESCE((
                  SELECT SUM(CASE WHEN st.transaction_type = 'stock_out'
                                  THEN -st.quantity ELSE st.quantity END)
                  FROM stock_transactions st WHERE st.item_id = i.id
              ), 0) <= i.reorder_level
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            patients_today,
            transactions_today,
            pending_queue,
            collections_today,
            low_stock_items,
        })
    }

    /// Transactions over a date range, for the CSV export
    pub async fn transactions_for_export(
        &self,
        query: &ReportRangeQuery,
    ) -> AppResult<Vec<TransactionExportRow>> {
        let (start, end) = range_bounds(query);

        let rows = sqlx::query_as::<_, TransactionExportRow>(
            r#"
            SELECT t.receipt_number, t.transaction_date,
                   p.patient_code,
                   p.last_name || ', ' || p.first_name AS patient_name,
                   t.cashier_name, t.status,
                   t.gross_amount, t.discount_amount, t.philhealth_amount, t.net_amount,
                   (t.voided_at IS NOT NULL) AS voided
            FROM transactions t
            JOIN patients p ON p.id = t.patient_id
            WHERE t.transaction_date BETWEEN $1 AND $2
            ORDER BY t.transaction_date ASC, t.queue_number ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Serialize report rows as CSV
    pub fn export_to_csv<T: serde::Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| crate::error::AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
