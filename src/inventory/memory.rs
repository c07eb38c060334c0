use async_trait::async_trait;
use tokio::sync::RwLock;

use super::dto::{Food, FoodPatch, ItemId, ItemKind, NewFood, NewSupply, Supply, SupplyPatch};
use super::repo::{InventoryStore, Snapshot, StoreError};

/// Process-local inventory. Used when no database is configured and in tests.
#[derive(Default)]
pub struct MemoryInventory {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_food_id: ItemId,
    last_supply_id: ItemId,
    foods: Vec<Food>,
    supplies: Vec<Supply>,
}

impl Inner {
    fn sorted_foods(&self) -> Vec<Food> {
        let mut foods = self.foods.clone();
        foods.sort_by(|a, b| a.expiry_date.cmp(&b.expiry_date).then(a.id.cmp(&b.id)));
        foods
    }

    fn sorted_supplies(&self) -> Vec<Supply> {
        let mut supplies = self.supplies.clone();
        supplies.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        supplies
    }
}

#[async_trait]
impl InventoryStore for MemoryInventory {
    async fn list_foods(&self) -> Result<Vec<Food>, StoreError> {
        Ok(self.inner.read().await.sorted_foods())
    }

    async fn create_food(&self, new: NewFood) -> Result<Food, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_food_id += 1;
        let food = Food {
            id: inner.last_food_id,
            name: new.name,
            quantity: new.quantity,
            expiry_date: new.expiry_date,
        };
        inner.foods.push(food.clone());
        Ok(food)
    }

    async fn update_food(&self, id: ItemId, patch: FoodPatch) -> Result<Food, StoreError> {
        let mut inner = self.inner.write().await;
        let food = inner
            .foods
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::NotFound {
                kind: ItemKind::Food,
                id,
            })?;
        if let Some(name) = patch.name {
            food.name = name;
        }
        if let Some(quantity) = patch.quantity {
            food.quantity = quantity;
        }
        if let Some(expiry_date) = patch.expiry_date {
            food.expiry_date = expiry_date;
        }
        Ok(food.clone())
    }

    async fn delete_food(&self, id: ItemId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.foods.len();
        inner.foods.retain(|f| f.id != id);
        if inner.foods.len() == before {
            return Err(StoreError::NotFound {
                kind: ItemKind::Food,
                id,
            });
        }
        Ok(())
    }

    async fn list_supplies(&self) -> Result<Vec<Supply>, StoreError> {
        Ok(self.inner.read().await.sorted_supplies())
    }

    async fn create_supply(&self, new: NewSupply) -> Result<Supply, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_supply_id += 1;
        let supply = Supply {
            id: inner.last_supply_id,
            name: new.name,
            stock_level: new.stock_level,
        };
        inner.supplies.push(supply.clone());
        Ok(supply)
    }

    async fn update_supply(&self, id: ItemId, patch: SupplyPatch) -> Result<Supply, StoreError> {
        let mut inner = self.inner.write().await;
        let supply = inner
            .supplies
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound {
                kind: ItemKind::Supply,
                id,
            })?;
        if let Some(name) = patch.name {
            supply.name = name;
        }
        if let Some(level) = patch.stock_level {
            supply.stock_level = level;
        }
        Ok(supply.clone())
    }

    async fn delete_supply(&self, id: ItemId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.supplies.len();
        inner.supplies.retain(|s| s.id != id);
        if inner.supplies.len() == before {
            return Err(StoreError::NotFound {
                kind: ItemKind::Supply,
                id,
            });
        }
        Ok(())
    }

    async fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let inner = self.inner.read().await;
        Ok(Snapshot {
            foods: inner.sorted_foods(),
            supplies: inner.sorted_supplies(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::dto::StockLevel;
    use time::macros::date;

    fn milk() -> NewFood {
        NewFood {
            name: "牛乳".into(),
            quantity: 1,
            expiry_date: date!(2024 - 01 - 01),
        }
    }

    fn supply(name: &str, stock_level: StockLevel) -> NewSupply {
        NewSupply {
            name: name.into(),
            stock_level,
        }
    }

    #[tokio::test]
    async fn create_list_delete_round_trip() {
        let store = MemoryInventory::default();

        let created = store.create_food(milk()).await.unwrap();
        let foods = store.list_foods().await.unwrap();
        let matching: Vec<_> = foods.iter().filter(|f| f.name == "牛乳").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id, created.id);
        assert_eq!(matching[0].expiry_date, date!(2024 - 01 - 01));

        store.delete_food(created.id).await.unwrap();
        assert!(store.list_foods().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ids_are_unique_and_not_reused() {
        let store = MemoryInventory::default();
        let a = store.create_food(milk()).await.unwrap();
        store.delete_food(a.id).await.unwrap();
        let b = store.create_food(milk()).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn update_unknown_supply_leaves_store_unchanged() {
        let store = MemoryInventory::default();
        store
            .create_supply(supply("洗剤", StockLevel::Normal))
            .await
            .unwrap();
        let before = store.list_supplies().await.unwrap();

        let err = store
            .update_supply(
                999,
                SupplyPatch {
                    name: Some("別物".into()),
                    stock_level: Some(StockLevel::Low),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: ItemKind::Supply,
                id: 999
            }
        ));
        assert_eq!(store.list_supplies().await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_unknown_food_is_not_found() {
        let store = MemoryInventory::default();
        let err = store.delete_food(42).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: ItemKind::Food, .. }));
    }

    #[tokio::test]
    async fn partial_update_touches_only_given_fields() {
        let store = MemoryInventory::default();
        let food = store.create_food(milk()).await.unwrap();
        let updated = store
            .update_food(
                food.id,
                FoodPatch {
                    quantity: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quantity, 4);
        assert_eq!(updated.name, "牛乳");
        assert_eq!(updated.expiry_date, food.expiry_date);
    }

    #[tokio::test]
    async fn lists_follow_store_order() {
        let store = MemoryInventory::default();
        for (name, expiry) in [
            ("豆腐", date!(2024 - 03 - 05)),
            ("卵", date!(2024 - 03 - 01)),
            ("納豆", date!(2024 - 03 - 05)),
        ] {
            store
                .create_food(NewFood {
                    name: name.into(),
                    quantity: 1,
                    expiry_date: expiry,
                })
                .await
                .unwrap();
        }
        store.create_supply(supply("ラップ", StockLevel::Low)).await.unwrap();
        store.create_supply(supply("アルミホイル", StockLevel::High)).await.unwrap();

        let snap = store.snapshot().await.unwrap();
        let food_names: Vec<_> = snap.foods.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(food_names, vec!["卵", "豆腐", "納豆"]);
        let supply_names: Vec<_> = snap.supplies.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(supply_names, vec!["アルミホイル", "ラップ"]);
    }
}
