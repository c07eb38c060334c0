use time::Date;

use crate::inventory::dto::{Food, FoodResponse, ItemId, ItemKind, Supply, SupplyResponse};

use super::classify::{is_expiring_soon, is_low};
use super::dto::{DashboardSummary, ShoppingEntry};

const LOW_STOCK_DETAIL: &str = "残量: 少ない";

/// Alert sets for the dashboard. Input order is kept.
pub fn summarize(foods: &[Food], supplies: &[Supply], today: Date) -> DashboardSummary {
    DashboardSummary {
        expiring_foods: foods
            .iter()
            .filter(|f| is_expiring_soon(f, today))
            .map(|f| FoodResponse::at(f.clone(), today))
            .collect(),
        low_supplies: supplies
            .iter()
            .filter(|s| is_low(s))
            .map(|s| SupplyResponse::from(s.clone()))
            .collect(),
    }
}

/// Expiring foods first, then low supplies, each group in input order.
pub fn derive_shopping_list(foods: &[Food], supplies: &[Supply], today: Date) -> Vec<ShoppingEntry> {
    let food_entries = foods
        .iter()
        .filter(|f| is_expiring_soon(f, today))
        .map(|f| entry(ItemKind::Food, f.id, &f.name, expiry_detail(f.expiry_date)));
    let supply_entries = supplies
        .iter()
        .filter(|s| is_low(s))
        .map(|s| entry(ItemKind::Supply, s.id, &s.name, LOW_STOCK_DETAIL.to_string()));

    food_entries.chain(supply_entries).collect()
}

fn entry(kind: ItemKind, id: ItemId, name: &str, detail: String) -> ShoppingEntry {
    ShoppingEntry {
        key: format!("{kind}:{id}"),
        id,
        name: name.to_string(),
        kind,
        detail,
    }
}

fn expiry_detail(expiry: Date) -> String {
    format!(
        "期限: {:04}-{:02}-{:02}",
        expiry.year(),
        u8::from(expiry.month()),
        expiry.day()
    )
}
