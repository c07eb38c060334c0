use serde::Serialize;

use crate::inventory::dto::{FoodResponse, ItemId, ItemKind, SupplyResponse};

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub expiring_foods: Vec<FoodResponse>,
    pub low_supplies: Vec<SupplyResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingEntry {
    /// `"<type>:<id>"`, stable across refetches; clients key check state on it.
    pub key: String,
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct ShoppingList {
    pub items: Vec<ShoppingEntry>,
}
