use lazy_static::lazy_static;
use regex::Regex;
use time::Date;
use tracing::info;

use crate::{
    alerts::classify::{days_left, within_expiry_window},
    error::AppError,
    inventory::dto::Food,
    state::AppState,
};

use super::dto::RecipeResponse;

pub const DEFAULT_TITLE: &str = "おすすめレシピ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub quantity: i32,
    pub days_left: i64,
    pub urgent: bool,
}

/// Foods ordered by fewest days left; ties keep store order.
pub fn prioritize(foods: &[Food], today: Date) -> Vec<Ingredient> {
    let mut out: Vec<Ingredient> = foods
        .iter()
        .map(|f| {
            let days_left = days_left(f.expiry_date, today);
            Ingredient {
                name: f.name.clone(),
                quantity: f.quantity,
                days_left,
                urgent: within_expiry_window(days_left),
            }
        })
        .collect();
    out.sort_by_key(|i| i.days_left);
    out
}

pub fn build_prompt(ingredients: &[Ingredient]) -> String {
    let stock = ingredients
        .iter()
        .map(|i| {
            let mark = if i.urgent { "【期限切れ間近！】" } else { "" };
            format!(
                "- {mark}{} (数量: {}, 期限まで: {}日)",
                i.name, i.quantity, i.days_left
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "あなたは家庭料理の専門家です。以下の食材在庫をもとに、作れるレシピを1つ提案してください。\n\
         \n\
         ## 現在の食材在庫\n\
         {stock}\n\
         \n\
         ## ルール\n\
         - 1行目は【料理名】の形式にすること\n\
         - 賞味期限が近い食材を優先的に使うこと\n\
         - 家庭で簡単に作れるレシピにすること\n\
         - 材料・手順・ポイントを含めること\n\
         - 日本語で回答すること\n"
    )
}

/// Canned recipe from the most urgent foods, or the first three when none are urgent.
pub fn demo_recipe(ingredients: &[Ingredient]) -> String {
    let urgent: Vec<&Ingredient> = ingredients.iter().filter(|i| i.urgent).collect();
    let used: Vec<&Ingredient> = if urgent.is_empty() {
        ingredients.iter().take(3).collect()
    } else {
        urgent
    };
    let names = used
        .iter()
        .map(|i| i.name.as_str())
        .collect::<Vec<_>>()
        .join("、");
    let materials = used
        .iter()
        .map(|i| format!("・{} … {}個", i.name, i.quantity))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "【提案レシピ】{names}の簡単炒め物（デモモード）\n\
         \n\
         ※ これはデモ用のレシピです。ANTHROPIC_API_KEYを設定するとAIが在庫に合わせたレシピを提案します。\n\
         \n\
         ■ 材料\n\
         {materials}\n\
         ・塩こしょう … 適量\n\
         ・サラダ油 … 大さじ1\n\
         \n\
         ■ 手順\n\
         1. {names}を食べやすい大きさに切る\n\
         2. フライパンにサラダ油を熱し、中火で炒める\n\
         3. 塩こしょうで味を調えて完成\n\
         \n\
         ■ ポイント\n\
         ・賞味期限が近い食材（{names}）を優先的に使っています\n\
         ・お好みで醤油やめんつゆを加えても美味しいです"
    )
}

/// Display title from the first line. A leading `【...】` tag is dropped; when
/// the tag is the whole line its contents are the title.
pub fn recipe_title(recipe: &str) -> String {
    lazy_static! {
        static ref LEADING_TAG: Regex = Regex::new(r"^【(.*?)】(.*)$").unwrap();
    }
    let first = recipe.lines().next().unwrap_or("").trim();
    let title = match LEADING_TAG.captures(first) {
        Some(caps) => {
            let rest = caps.get(2).map_or("", |m| m.as_str()).trim();
            if rest.is_empty() {
                caps.get(1).map_or("", |m| m.as_str()).trim()
            } else {
                rest
            }
        }
        None => first,
    };
    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title.to_string()
    }
}

pub async fn request_recipe(state: &AppState) -> Result<RecipeResponse, AppError> {
    let foods = state.store.list_foods().await?;
    if foods.is_empty() {
        return Err(AppError::BadRequest("食材が登録されていません".into()));
    }

    let ingredients = prioritize(&foods, state.today());
    let urgent = ingredients.iter().filter(|i| i.urgent).count();
    let recipe = state.recipes.generate(&ingredients).await?;
    let title = recipe_title(&recipe);
    info!(ingredients = ingredients.len(), urgent, %title, "recipe generated");

    Ok(RecipeResponse { recipe, title })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2024 - 06 - 15);

    fn food(name: &str, expiry: Date) -> Food {
        Food {
            id: 0,
            name: name.into(),
            quantity: 2,
            expiry_date: expiry,
        }
    }

    fn ingredient(name: &str, days_left: i64) -> Ingredient {
        Ingredient {
            name: name.into(),
            quantity: 1,
            days_left,
            urgent: within_expiry_window(days_left),
        }
    }

    #[test]
    fn title_strips_leading_bracket_tag() {
        assert_eq!(
            recipe_title("【豚肉とキャベツの味噌炒め】\n■ 材料"),
            "豚肉とキャベツの味噌炒め"
        );
        assert_eq!(
            recipe_title("【提案レシピ】豚肉とキャベツの味噌炒め\n..."),
            "豚肉とキャベツの味噌炒め"
        );
    }

    #[test]
    fn title_without_tag_is_first_line() {
        assert_eq!(recipe_title("親子丼\n■ 材料"), "親子丼");
        assert_eq!(recipe_title("  親子丼  "), "親子丼");
    }

    #[test]
    fn title_strips_only_one_tag() {
        assert_eq!(recipe_title("【A】【B】カレー"), "【B】カレー");
    }

    #[test]
    fn empty_first_line_falls_back_to_default() {
        assert_eq!(recipe_title(""), DEFAULT_TITLE);
        assert_eq!(recipe_title("【 】"), DEFAULT_TITLE);
        assert_eq!(recipe_title("\n本文"), DEFAULT_TITLE);
    }

    #[test]
    fn prioritize_orders_by_days_left() {
        let foods = vec![
            food("米", date!(2024 - 09 - 01)),
            food("牛乳", date!(2024 - 06 - 16)),
            food("卵", date!(2024 - 06 - 14)),
            food("豆腐", date!(2024 - 06 - 16)),
        ];
        let got = prioritize(&foods, TODAY);
        let names: Vec<_> = got.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["卵", "牛乳", "豆腐", "米"]);
        assert_eq!(got[0].days_left, -1);
        assert!(got[0].urgent && got[1].urgent && !got[3].urgent);
    }

    #[test]
    fn prompt_marks_urgent_items() {
        let prompt = build_prompt(&[ingredient("牛乳", 1), ingredient("米", 40)]);
        assert!(prompt.contains("- 【期限切れ間近！】牛乳 (数量: 1, 期限まで: 1日)"));
        assert!(prompt.contains("- 米 (数量: 1, 期限まで: 40日)"));
    }

    #[test]
    fn demo_recipe_prefers_urgent_foods() {
        let recipe = demo_recipe(&[
            ingredient("牛乳", 0),
            ingredient("卵", 2),
            ingredient("米", 40),
        ]);
        assert!(recipe.starts_with("【提案レシピ】牛乳、卵の簡単炒め物"));
        assert!(!recipe.contains("米"));
        assert_eq!(recipe_title(&recipe), "牛乳、卵の簡単炒め物（デモモード）");
    }

    #[test]
    fn demo_recipe_falls_back_to_first_three() {
        let recipe = demo_recipe(&[
            ingredient("A", 10),
            ingredient("B", 11),
            ingredient("C", 12),
            ingredient("D", 13),
        ]);
        assert!(recipe.starts_with("【提案レシピ】A、B、Cの"));
        assert!(!recipe.contains("・D"));
    }
}
