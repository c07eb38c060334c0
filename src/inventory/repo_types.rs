use sqlx::FromRow;

use super::dto::{ItemId, Supply};

#[derive(Debug, FromRow)]
pub struct SupplyRow {
    pub id: ItemId,
    pub name: String,
    pub stock_level: String,
}

impl TryFrom<SupplyRow> for Supply {
    type Error = String;

    fn try_from(r: SupplyRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            name: r.name,
            stock_level: r.stock_level.parse()?,
        })
    }
}
