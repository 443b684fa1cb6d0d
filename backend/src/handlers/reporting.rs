//! HTTP handlers for reports and exports

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::reporting::{
    DailySalesSummary, DashboardMetrics, ReportRangeQuery, RevenueByTest,
};
use crate::services::ReportingService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SalesDateQuery {
    pub date: Option<NaiveDate>,
}

/// Daily sales summary (defaults to today)
pub async fn daily_sales_report(
    State(state): State<AppState>,
    Query(query): Query<SalesDateQuery>,
) -> AppResult<Json<DailySalesSummary>> {
    let date = query.date.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let service = ReportingService::new(state.db);
    let summary = service.daily_sales_summary(date).await?;
    Ok(Json(summary))
}

/// Revenue aggregated per catalog test
pub async fn revenue_by_test_report(
    State(state): State<AppState>,
    Query(query): Query<ReportRangeQuery>,
) -> AppResult<Json<Vec<RevenueByTest>>> {
    let service = ReportingService::new(state.db);
    let rows = service.revenue_by_test(&query).await?;
    Ok(Json(rows))
}

/// Front-office dashboard metrics
pub async fn dashboard_metrics(
    State(state): State<AppState>,
) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.db);
    let metrics = service.dashboard_metrics().await?;
    Ok(Json(metrics))
}

/// Export transactions over a date range as CSV
pub async fn export_transactions_csv(
    State(state): State<AppState>,
    Query(query): Query<ReportRangeQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let rows = service.transactions_for_export(&query).await?;
    let csv_data = ReportingService::export_to_csv(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        csv_data,
    ))
}
