//! # Coffee Shop Models
//!
//! Domain models and DTOs for the Coffee Shop API.
//!
//! - [`drinks`]: The drink entity, its recipe, request DTOs and the two
//!   response projections (short and long)
//!
//! # Example
//!
//! ```ignore
//! use coffeeshop_models::drinks::Drink;
//!
//! let public = drink.short();   // ingredient names stripped
//! let detailed = drink.long();  // full recipe
//! ```

pub mod drinks;

// Re-export commonly used types at crate root for convenience
pub use drinks::{
    CreateDrinkDto, DeleteDrinkResponse, Drink, DrinkChanges, DrinkLong, DrinkShort,
    DrinksLongResponse, DrinksShortResponse, Ingredient, IngredientShort, Recipe, UpdateDrinkDto,
};
