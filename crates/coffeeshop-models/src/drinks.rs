//! Drink domain models, DTOs and response views.
//!
//! A recipe arrives either as one ingredient object or as a list of them.
//! It is stored exactly as supplied and only normalized to a list when a
//! view is built, so both views always expose `recipe` as an array.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    /// Kept as the JSON number it was sent as, so `1` stays `1`
    #[schema(value_type = f64)]
    pub parts: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Recipe {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl Recipe {
    pub fn ingredients(&self) -> &[Ingredient] {
        match self {
            Recipe::Many(ingredients) => ingredients,
            Recipe::One(ingredient) => std::slice::from_ref(ingredient),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Json<Recipe>,
}

/// Public projection of an ingredient: no name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IngredientShort {
    pub color: String,
    #[schema(value_type = f64)]
    pub parts: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .ingredients()
                .iter()
                .map(|ingredient| IngredientShort {
                    color: ingredient.color.clone(),
                    parts: ingredient.parts.clone(),
                })
                .collect(),
        }
    }

    pub fn long(&self) -> DrinkLong {
        DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.ingredients().to_vec(),
        }
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("title must not be empty".into()));
    }
    Ok(())
}

fn validate_recipe(recipe: &Recipe) -> Result<(), ValidationError> {
    if recipe.is_empty() {
        return Err(
            ValidationError::new("empty").with_message("recipe must have an ingredient".into()),
        );
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDrinkDto {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(custom(function = "validate_recipe"))]
    pub recipe: Recipe,
}

/// Partial update. Absent, `null` and empty values (`""`, `[]`) all leave the
/// stored field unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDrinkDto {
    pub title: Option<String>,
    pub recipe: Option<Recipe>,
}

/// The fields an update actually replaces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrinkChanges {
    pub title: Option<String>,
    pub recipe: Option<Recipe>,
}

impl DrinkChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}

impl From<UpdateDrinkDto> for DrinkChanges {
    fn from(dto: UpdateDrinkDto) -> Self {
        Self {
            title: dto.title.filter(|title| !title.is_empty()),
            recipe: dto.recipe.filter(|recipe| !recipe.is_empty()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DrinksShortResponse {
    pub success: bool,
    pub drinks: Vec<DrinkShort>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DrinksLongResponse {
    pub success: bool,
    pub drinks: Vec<DrinkLong>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    /// Id of the deleted drink
    pub delete: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn water() -> Ingredient {
        serde_json::from_value(json!({"name": "water", "color": "blue", "parts": 1})).unwrap()
    }

    fn drink(recipe: Recipe) -> Drink {
        Drink {
            id: 1,
            title: "Water".to_string(),
            recipe: Json(recipe),
        }
    }

    #[test]
    fn test_recipe_accepts_single_object() {
        let recipe: Recipe =
            serde_json::from_value(json!({"name": "water", "color": "blue", "parts": 1})).unwrap();

        assert_eq!(recipe, Recipe::One(water()));
        assert_eq!(recipe.ingredients().len(), 1);
    }

    #[test]
    fn test_recipe_accepts_list() {
        let recipe: Recipe = serde_json::from_value(json!([
            {"name": "espresso", "color": "brown", "parts": 1},
            {"name": "milk", "color": "white", "parts": 2.5}
        ]))
        .unwrap();

        assert_eq!(recipe.ingredients().len(), 2);
        assert_eq!(recipe.ingredients()[1].parts.as_f64(), Some(2.5));
    }

    #[test]
    fn test_recipe_rejects_incomplete_ingredient() {
        let result: Result<Recipe, _> = serde_json::from_value(json!({"name": "water"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_single_ingredient_round_trips_unchanged() {
        let recipe = Recipe::One(water());
        let text = serde_json::to_string(&recipe).unwrap();

        assert_eq!(text, r#"{"name":"water","color":"blue","parts":1}"#);
        assert_eq!(serde_json::from_str::<Recipe>(&text).unwrap(), recipe);
    }

    #[test]
    fn test_views_normalize_single_ingredient_to_list() {
        let drink = drink(Recipe::One(water()));

        let short = serde_json::to_value(drink.short()).unwrap();
        let long = serde_json::to_value(drink.long()).unwrap();

        assert_eq!(
            short,
            json!({"id": 1, "title": "Water", "recipe": [{"color": "blue", "parts": 1}]})
        );
        assert_eq!(
            long,
            json!({"id": 1, "title": "Water", "recipe": [{"name": "water", "color": "blue", "parts": 1}]})
        );
    }

    #[test]
    fn test_short_never_has_names_long_always_does() {
        let drink = drink(Recipe::Many(vec![water(), water()]));

        for ingredient in serde_json::to_value(drink.short()).unwrap()["recipe"]
            .as_array()
            .unwrap()
        {
            assert!(ingredient.get("name").is_none());
        }
        for ingredient in serde_json::to_value(drink.long()).unwrap()["recipe"]
            .as_array()
            .unwrap()
        {
            assert_eq!(ingredient["name"], "water");
        }
    }

    #[test]
    fn test_create_dto_validation() {
        let valid = CreateDrinkDto {
            title: "Water".to_string(),
            recipe: Recipe::One(water()),
        };
        assert!(valid.validate().is_ok());

        let blank_title = CreateDrinkDto {
            title: "   ".to_string(),
            ..valid.clone()
        };
        assert!(blank_title.validate().is_err());

        let empty_recipe = CreateDrinkDto {
            recipe: Recipe::Many(vec![]),
            ..valid
        };
        assert!(empty_recipe.validate().is_err());
    }

    #[test]
    fn test_falsy_update_fields_are_dropped() {
        let dto: UpdateDrinkDto = serde_json::from_value(json!({"title": "", "recipe": []})).unwrap();
        let changes = DrinkChanges::from(dto);

        assert!(changes.is_empty());
    }

    #[test]
    fn test_whitespace_update_title_is_kept() {
        let dto: UpdateDrinkDto = serde_json::from_value(json!({"title": "   "})).unwrap();
        assert_eq!(DrinkChanges::from(dto).title.as_deref(), Some("   "));
    }

    #[test]
    fn test_null_and_absent_update_fields() {
        let dto: UpdateDrinkDto = serde_json::from_value(json!({"title": null})).unwrap();
        assert!(DrinkChanges::from(dto).is_empty());
    }

    #[test]
    fn test_update_keeps_supplied_fields() {
        let dto: UpdateDrinkDto = serde_json::from_value(json!({
            "title": "Iced Water",
            "recipe": {"name": "ice", "color": "white", "parts": 1}
        }))
        .unwrap();
        let changes = DrinkChanges::from(dto);

        assert_eq!(changes.title.as_deref(), Some("Iced Water"));
        assert_eq!(changes.recipe.unwrap().ingredients()[0].name, "ice");
    }
}
