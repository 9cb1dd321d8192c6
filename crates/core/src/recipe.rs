//! Recipe suggestions.
//!
//! The recipe service asks a text model for a JSON object with Italian keys;
//! [`Recipe`] maps them to English field names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title used when no recipe could be produced.
pub const FALLBACK_TITLE: &str = "Chef in sciopero";

/// The model's answer was not a recipe object.
#[derive(Debug, Error)]
pub enum RecipeParseError {
    #[error("empty response")]
    Empty,
    #[error("invalid recipe JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A suggested recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "titolo")]
    pub title: String,
    #[serde(rename = "difficolta")]
    pub difficulty: String,
    #[serde(rename = "tempo")]
    pub time: String,
    #[serde(rename = "procedimento")]
    pub procedure: String,
}

impl Recipe {
    /// The placeholder shown instead of an error when generation fails.
    #[must_use]
    pub fn fallback(reason: &str) -> Self {
        Self {
            title: FALLBACK_TITLE.to_string(),
            difficulty: "-".to_string(),
            time: "-".to_string(),
            procedure: format!("Non sono riuscito a cucinare: {reason}"),
        }
    }

    /// Parse a recipe from JSON text, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `RecipeParseError` if the text is blank or is not an object
    /// with all four recipe keys.
    pub fn from_json(text: &str) -> Result<Self, RecipeParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RecipeParseError::Empty);
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Whether this is the placeholder produced by [`Recipe::fallback`].
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.title == FALLBACK_TITLE && self.difficulty == "-" && self.time == "-"
    }
}

/// Build the chef prompt for a list of ingredient names.
#[must_use]
pub fn build_prompt(ingredients: &[String]) -> String {
    format!(
        "Agisci come uno chef esperto. Ho questi ingredienti: {}.\n\
         Suggeriscimi una ricetta creativa.\n\
         Rispondi ESCLUSIVAMENTE con un oggetto JSON puro, senza testo aggiuntivo.\n\
         Schema richiesto:\n\
         {{\n  \"titolo\": \"string\",\n  \"difficolta\": \"string\",\n  \
         \"tempo\": \"string\",\n  \"procedimento\": \"string\"\n}}",
        ingredients.join(", ")
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_uses_italian_keys() {
        let json = r#"{
            "titolo": "Frittata di verdure",
            "difficolta": "Facile",
            "tempo": "20 minuti",
            "procedimento": "Sbatti le uova..."
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.title, "Frittata di verdure");
        assert_eq!(recipe.time, "20 minuti");
        assert!(!recipe.is_fallback());
    }

    #[test]
    fn test_from_json_rejects_partial_and_blank() {
        assert!(matches!(
            Recipe::from_json("  \n"),
            Err(RecipeParseError::Empty)
        ));
        assert!(matches!(
            Recipe::from_json(r#"{"titolo": "Solo titolo"}"#),
            Err(RecipeParseError::Json(_))
        ));

        let recipe = Recipe::from_json(
            "\n{\"titolo\":\"A\",\"difficolta\":\"B\",\"tempo\":\"C\",\"procedimento\":\"D\"}\n",
        )
        .unwrap();
        assert_eq!(recipe.procedure, "D");
    }

    #[test]
    fn test_fallback_mentions_reason() {
        let recipe = Recipe::fallback("quota esaurita");
        assert_eq!(recipe.title, "Chef in sciopero");
        assert_eq!(recipe.procedure, "Non sono riuscito a cucinare: quota esaurita");
        assert!(recipe.is_fallback());
    }

    #[test]
    fn test_prompt_lists_ingredients() {
        let prompt = build_prompt(&["uova".to_string(), "zucchine".to_string()]);
        assert!(prompt.contains("uova, zucchine."));
        assert!(prompt.contains("\"procedimento\""));
    }
}
