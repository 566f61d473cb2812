//! Diesel-backed dish catalog lookups.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::Dish;
use crate::domain::ports::{DishCatalog, StoreError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DishRow, row_to_dish};
use super::pool::DbPool;
use super::schema::dishes;

/// Diesel-backed [`DishCatalog`] implementation.
#[derive(Clone)]
pub struct DieselDishCatalog {
    pool: DbPool,
    asset_base: String,
}

impl DieselDishCatalog {
    /// Create a catalog reading through the shared pool; `asset_base` roots
    /// stored dish image filenames into servable paths.
    pub fn new(pool: DbPool, asset_base: impl Into<String>) -> Self {
        Self {
            pool,
            asset_base: asset_base.into(),
        }
    }
}

#[async_trait]
impl DishCatalog for DieselDishCatalog {
    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Dish>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Soft-deleted and hidden rows are returned too; availability is the
        // caller's distinction to make.
        let rows: Vec<DishRow> = dishes::table
            .filter(dishes::id.eq_any(ids))
            .select(DishRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| row_to_dish(row, &self.asset_base))
            .collect())
    }
}
