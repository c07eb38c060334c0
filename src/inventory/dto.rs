use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

use crate::alerts::classify;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

pub type ItemId = i64;

/// Which inventory collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Food,
    Supply,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Food => "food",
            ItemKind::Supply => "supply",
        }
    }

    pub fn not_found_message(&self) -> &'static str {
        match self {
            ItemKind::Food => "食材が見つかりません",
            ItemKind::Supply => "日用品が見つかりません",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockLevel {
    #[serde(rename = "多い")]
    High,
    #[default]
    #[serde(rename = "普通")]
    Normal,
    #[serde(rename = "少ない")]
    Low,
}

impl StockLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockLevel::High => "多い",
            StockLevel::Normal => "普通",
            StockLevel::Low => "少ない",
        }
    }
}

impl FromStr for StockLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "多い" => Ok(StockLevel::High),
            "普通" => Ok(StockLevel::Normal),
            "少ない" => Ok(StockLevel::Low),
            other => Err(format!("unknown stock level {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Food {
    pub id: ItemId,
    pub name: String,
    pub quantity: i32,
    #[serde(with = "iso_date")]
    pub expiry_date: Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Supply {
    pub id: ItemId,
    pub name: String,
    pub stock_level: StockLevel,
}

// --- request bodies ---

#[derive(Debug, Deserialize)]
pub struct FoodCreate {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(with = "iso_date")]
    pub expiry_date: Date,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Default, Deserialize)]
pub struct FoodUpdate {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    #[serde(default, with = "iso_date::option")]
    pub expiry_date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct SupplyCreate {
    pub name: String,
    #[serde(default)]
    pub stock_level: StockLevel,
}

#[derive(Debug, Default, Deserialize)]
pub struct SupplyUpdate {
    pub name: Option<String>,
    pub stock_level: Option<StockLevel>,
}

// --- validated writes handed to the store ---

#[derive(Debug, Clone)]
pub struct NewFood {
    pub name: String,
    pub quantity: i32,
    pub expiry_date: Date,
}

#[derive(Debug, Clone, Default)]
pub struct FoodPatch {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub expiry_date: Option<Date>,
}

#[derive(Debug, Clone)]
pub struct NewSupply {
    pub name: String,
    pub stock_level: StockLevel,
}

#[derive(Debug, Clone, Default)]
pub struct SupplyPatch {
    pub name: Option<String>,
    pub stock_level: Option<StockLevel>,
}

// --- responses ---

#[derive(Debug, Clone, Serialize)]
pub struct FoodResponse {
    pub id: ItemId,
    pub name: String,
    pub quantity: i32,
    #[serde(with = "iso_date")]
    pub expiry_date: Date,
    pub days_left: i64,
    pub is_expiring_soon: bool,
}

impl FoodResponse {
    pub fn at(food: Food, today: Date) -> Self {
        let days_left = classify::days_left(food.expiry_date, today);
        Self {
            id: food.id,
            name: food.name,
            quantity: food.quantity,
            expiry_date: food.expiry_date,
            days_left,
            is_expiring_soon: classify::within_expiry_window(days_left),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SupplyResponse {
    pub id: ItemId,
    pub name: String,
    pub stock_level: StockLevel,
    pub is_low: bool,
}

impl From<Supply> for SupplyResponse {
    fn from(s: Supply) -> Self {
        let is_low = classify::is_low(&s);
        Self {
            id: s.id,
            name: s.name,
            stock_level: s.stock_level,
            is_low,
        }
    }
}
