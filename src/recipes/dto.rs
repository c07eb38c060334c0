use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub recipe: String,
    pub title: String,
}
