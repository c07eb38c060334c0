//! Expiry and stock-level classification.

use time::{Date, OffsetDateTime, UtcOffset};

use crate::inventory::dto::{Food, StockLevel, Supply};

/// Foods with this many days left or fewer are expiring soon.
pub const EXPIRY_WINDOW_DAYS: i64 = 3;

/// Calendar date of `now` at the given offset. Dropping the time of day is
/// what makes a partial day count as a whole day remaining.
pub fn today(now: OffsetDateTime, offset: UtcOffset) -> Date {
    now.to_offset(offset).date()
}

/// Whole days from `today` until `expiry`; negative once past.
pub fn days_left(expiry: Date, today: Date) -> i64 {
    (expiry - today).whole_days()
}

pub fn within_expiry_window(days_left: i64) -> bool {
    days_left <= EXPIRY_WINDOW_DAYS
}

pub fn is_expiring_soon(food: &Food, today: Date) -> bool {
    within_expiry_window(days_left(food.expiry_date, today))
}

pub fn is_low(supply: &Supply) -> bool {
    supply.stock_level == StockLevel::Low
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};
    use time::Duration;

    fn food_expiring(expiry: Date) -> Food {
        Food {
            id: 1,
            name: "豆腐".into(),
            quantity: 1,
            expiry_date: expiry,
        }
    }

    #[test]
    fn days_left_around_expiry() {
        let expiry = date!(2024 - 06 - 15);
        assert_eq!(days_left(expiry, expiry), 0);
        assert_eq!(days_left(expiry, expiry - Duration::days(1)), 1);
        assert_eq!(days_left(expiry, expiry + Duration::days(1)), -1);
    }

    #[test]
    fn days_left_spans_month_and_year_boundaries() {
        assert_eq!(days_left(date!(2024 - 03 - 01), date!(2024 - 02 - 28)), 2);
        assert_eq!(days_left(date!(2025 - 01 - 02), date!(2024 - 12 - 30)), 3);
    }

    #[test]
    fn expiring_soon_boundaries() {
        let today = date!(2024 - 06 - 15);
        for (offset_days, expected) in [(-1, true), (0, true), (3, true), (4, false)] {
            let food = food_expiring(today + Duration::days(offset_days));
            assert_eq!(
                is_expiring_soon(&food, today),
                expected,
                "days_left = {offset_days}"
            );
        }
    }

    #[test]
    fn long_expired_food_is_still_expiring() {
        let food = food_expiring(date!(2023 - 01 - 01));
        assert!(is_expiring_soon(&food, date!(2024 - 06 - 15)));
    }

    #[test]
    fn partial_day_rounds_up_to_a_whole_day() {
        // 23:00 on the 14th: one hour of the day left still counts as a full day.
        let now = datetime!(2024 - 06 - 14 23:00 UTC);
        let expiry = date!(2024 - 06 - 15);
        assert_eq!(days_left(expiry, today(now, UtcOffset::UTC)), 1);
    }

    #[test]
    fn today_respects_offset() {
        let now = datetime!(2024 - 06 - 14 20:00 UTC);
        assert_eq!(today(now, UtcOffset::UTC), date!(2024 - 06 - 14));
        assert_eq!(today(now, offset!(+9)), date!(2024 - 06 - 15));
    }

    #[test]
    fn only_lowest_level_is_low() {
        let mut supply = Supply {
            id: 1,
            name: "トイレットペーパー".into(),
            stock_level: StockLevel::Low,
        };
        assert!(is_low(&supply));
        supply.stock_level = StockLevel::Normal;
        assert!(!is_low(&supply));
        supply.stock_level = StockLevel::High;
        assert!(!is_low(&supply));
    }
}
