use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

use super::dto::{Food, FoodPatch, ItemId, ItemKind, NewFood, NewSupply, Supply, SupplyPatch};
use super::repo_types::SupplyRow;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: ItemKind, id: ItemId },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Both collections read at the same point in time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub foods: Vec<Food>,
    pub supplies: Vec<Supply>,
}

/// The only way inventory state is read or mutated.
///
/// Listing order is part of the contract: foods by expiry date, supplies by
/// name, both falling back to id.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn list_foods(&self) -> Result<Vec<Food>, StoreError>;
    async fn create_food(&self, new: NewFood) -> Result<Food, StoreError>;
    async fn update_food(&self, id: ItemId, patch: FoodPatch) -> Result<Food, StoreError>;
    async fn delete_food(&self, id: ItemId) -> Result<(), StoreError>;

    async fn list_supplies(&self) -> Result<Vec<Supply>, StoreError>;
    async fn create_supply(&self, new: NewSupply) -> Result<Supply, StoreError>;
    async fn update_supply(&self, id: ItemId, patch: SupplyPatch) -> Result<Supply, StoreError>;
    async fn delete_supply(&self, id: ItemId) -> Result<(), StoreError>;

    async fn snapshot(&self) -> Result<Snapshot, StoreError>;
}

const FOOD_COLUMNS: &str = "id, name, quantity, expiry_date";
const SUPPLY_COLUMNS: &str = "id, name, stock_level";

// "C" collation compares bytes, matching `str::cmp` in the memory store.
const FOOD_ORDER: &str = "ORDER BY expiry_date, id";
const SUPPLY_ORDER: &str = r#"ORDER BY name COLLATE "C", id"#;

#[derive(Clone)]
pub struct PgInventory {
    db: PgPool,
}

impl PgInventory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_supplies(rows: Vec<SupplyRow>) -> Result<Vec<Supply>, StoreError> {
    rows.into_iter()
        .map(|r| Supply::try_from(r).map_err(StoreError::Corrupt))
        .collect()
}

async fn fetch_foods(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Food>, StoreError> {
    let rows = sqlx::query_as::<_, Food>(&format!(
        "SELECT {FOOD_COLUMNS} FROM food_items {FOOD_ORDER}"
    ))
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows)
}

async fn fetch_supplies(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Supply>, StoreError> {
    let rows = sqlx::query_as::<_, SupplyRow>(&format!(
        "SELECT {SUPPLY_COLUMNS} FROM supply_items {SUPPLY_ORDER}"
    ))
    .fetch_all(&mut **tx)
    .await?;
    into_supplies(rows)
}

#[async_trait]
impl InventoryStore for PgInventory {
    async fn list_foods(&self) -> Result<Vec<Food>, StoreError> {
        let mut tx = self.db.begin().await?;
        let foods = fetch_foods(&mut tx).await?;
        tx.commit().await?;
        Ok(foods)
    }

    async fn create_food(&self, new: NewFood) -> Result<Food, StoreError> {
        let food = sqlx::query_as::<_, Food>(&format!(
            r#"
            INSERT INTO food_items (name, quantity, expiry_date)
            VALUES ($1, $2, $3)
            RETURNING {FOOD_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(new.quantity)
        .bind(new.expiry_date)
        .fetch_one(&self.db)
        .await?;
        Ok(food)
    }

    async fn update_food(&self, id: ItemId, patch: FoodPatch) -> Result<Food, StoreError> {
        sqlx::query_as::<_, Food>(&format!(
            r#"
            UPDATE food_items
            SET name = COALESCE($2, name),
                quantity = COALESCE($3, quantity),
                expiry_date = COALESCE($4, expiry_date),
                updated_at = now()
            WHERE id = $1
            RETURNING {FOOD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.quantity)
        .bind(patch.expiry_date)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound {
            kind: ItemKind::Food,
            id,
        })
    }

    async fn delete_food(&self, id: ItemId) -> Result<(), StoreError> {
        let done = sqlx::query("DELETE FROM food_items WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                kind: ItemKind::Food,
                id,
            });
        }
        Ok(())
    }

    async fn list_supplies(&self) -> Result<Vec<Supply>, StoreError> {
        let mut tx = self.db.begin().await?;
        let supplies = fetch_supplies(&mut tx).await?;
        tx.commit().await?;
        Ok(supplies)
    }

    async fn create_supply(&self, new: NewSupply) -> Result<Supply, StoreError> {
        let row = sqlx::query_as::<_, SupplyRow>(&format!(
            r#"
            INSERT INTO supply_items (name, stock_level)
            VALUES ($1, $2)
            RETURNING {SUPPLY_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(new.stock_level.as_str())
        .fetch_one(&self.db)
        .await?;
        Supply::try_from(row).map_err(StoreError::Corrupt)
    }

    async fn update_supply(&self, id: ItemId, patch: SupplyPatch) -> Result<Supply, StoreError> {
        let row = sqlx::query_as::<_, SupplyRow>(&format!(
            r#"
            UPDATE supply_items
            SET name = COALESCE($2, name),
                stock_level = COALESCE($3, stock_level),
                updated_at = now()
            WHERE id = $1
            RETURNING {SUPPLY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.stock_level.map(|l| l.as_str()))
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound {
            kind: ItemKind::Supply,
            id,
        })?;
        Supply::try_from(row).map_err(StoreError::Corrupt)
    }

    async fn delete_supply(&self, id: ItemId) -> Result<(), StoreError> {
        let done = sqlx::query("DELETE FROM supply_items WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                kind: ItemKind::Supply,
                id,
            });
        }
        Ok(())
    }

    async fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let mut tx = self.db.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;
        let foods = fetch_foods(&mut tx).await?;
        let supplies = fetch_supplies(&mut tx).await?;
        tx.commit().await?;
        Ok(Snapshot { foods, supplies })
    }
}
