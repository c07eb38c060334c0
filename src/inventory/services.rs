use crate::error::AppError;

use super::dto::{
    FoodCreate, FoodPatch, FoodUpdate, NewFood, NewSupply, SupplyCreate, SupplyPatch, SupplyUpdate,
};

fn clean_name(raw: String) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::Validation("名前を入力してください".into()));
    }
    Ok(name.to_string())
}

fn check_quantity(quantity: i64) -> Result<i32, AppError> {
    if quantity < 1 {
        return Err(AppError::Validation("数量は1以上で入力してください".into()));
    }
    i32::try_from(quantity).map_err(|_| AppError::Validation("数量が大きすぎます".into()))
}

pub fn validate_new_food(input: FoodCreate) -> Result<NewFood, AppError> {
    Ok(NewFood {
        name: clean_name(input.name)?,
        quantity: check_quantity(input.quantity)?,
        expiry_date: input.expiry_date,
    })
}

pub fn validate_food_patch(input: FoodUpdate) -> Result<FoodPatch, AppError> {
    Ok(FoodPatch {
        name: input.name.map(clean_name).transpose()?,
        quantity: input.quantity.map(check_quantity).transpose()?,
        expiry_date: input.expiry_date,
    })
}

pub fn validate_new_supply(input: SupplyCreate) -> Result<NewSupply, AppError> {
    Ok(NewSupply {
        name: clean_name(input.name)?,
        stock_level: input.stock_level,
    })
}

pub fn validate_supply_patch(input: SupplyUpdate) -> Result<SupplyPatch, AppError> {
    Ok(SupplyPatch {
        name: input.name.map(clean_name).transpose()?,
        stock_level: input.stock_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::dto::StockLevel;
    use time::macros::date;

    fn food(name: &str, quantity: i64) -> FoodCreate {
        FoodCreate {
            name: name.into(),
            quantity,
            expiry_date: date!(2024 - 01 - 01),
        }
    }

    #[test]
    fn trims_names() {
        let new = validate_new_food(food("  牛乳 ", 2)).unwrap();
        assert_eq!(new.name, "牛乳");
        assert_eq!(new.quantity, 2);
    }

    #[test]
    fn rejects_blank_name() {
        assert!(matches!(
            validate_new_food(food("   ", 1)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_new_supply(SupplyCreate {
                name: "".into(),
                stock_level: StockLevel::Low
            }),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn rejects_quantity_below_one() {
        assert!(matches!(
            validate_new_food(food("牛乳", 0)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_new_food(food("牛乳", -3)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_new_food(food("牛乳", i64::from(i32::MAX) + 1)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn patches_validate_only_present_fields() {
        let patch = validate_food_patch(FoodUpdate::default()).unwrap();
        assert!(patch.name.is_none() && patch.quantity.is_none());

        let err = validate_food_patch(FoodUpdate {
            quantity: Some(0),
            ..Default::default()
        });
        assert!(matches!(err, Err(AppError::Validation(_))));

        let err = validate_supply_patch(SupplyUpdate {
            name: Some(" ".into()),
            ..Default::default()
        });
        assert!(matches!(err, Err(AppError::Validation(_))));
    }
}
