//! HTTP handlers for inventory tracking

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::inventory::{
    CreateItemInput, InventoryItemRecord, RecordStockInput, StockTransactionRecord,
    UpdateItemInput,
};
use crate::services::InventoryService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct InventoryListQuery {
    pub include_inactive: Option<bool>,
}

/// Create an inventory item
pub async fn create_inventory_item(
    State(state): State<AppState>,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<InventoryItemRecord>> {
    let service = InventoryService::new(state.db);
    let item = service.create_item(input).await?;
    Ok(Json(item))
}

/// Get an inventory item with its on-hand quantity
pub async fn get_inventory_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<InventoryItemRecord>> {
    let service = InventoryService::new(state.db);
    let item = service.get_item(item_id).await?;
    Ok(Json(item))
}

/// Update an inventory item
pub async fn update_inventory_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<InventoryItemRecord>> {
    let service = InventoryService::new(state.db);
    let item = service.update_item(item_id, input).await?;
    Ok(Json(item))
}

/// List inventory items
pub async fn list_inventory_items(
    State(state): State<AppState>,
    Query(query): Query<InventoryListQuery>,
) -> AppResult<Json<Vec<InventoryItemRecord>>> {
    let service = InventoryService::new(state.db);
    let items = service
        .list_items(query.include_inactive.unwrap_or(false))
        .await?;
    Ok(Json(items))
}

/// Record a stock movement
pub async fn record_stock_transaction(
    State(state): State<AppState>,
    Json(input): Json<RecordStockInput>,
) -> AppResult<Json<StockTransactionRecord>> {
    let service = InventoryService::new(state.db);
    let transaction = service.record_stock(input).await?;
    Ok(Json(transaction))
}

/// List an item's stock movements
pub async fn list_stock_transactions(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockTransactionRecord>>> {
    let service = InventoryService::new(state.db);
    let transactions = service.list_item_transactions(item_id).await?;
    Ok(Json(transactions))
}

/// List items at or below their reorder level
pub async fn list_low_stock(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InventoryItemRecord>>> {
    let service = InventoryService::new(state.db);
    let items = service.low_stock().await?;
    Ok(Json(items))
}
