use serde_json::json;
use sqlx::types::JsonValue;

use crate::dtos::generation::GenerateRecipeRequest;

pub struct ComposedRecipe {
    pub title: String,
    pub summary: String,
    pub ingredients: JsonValue,
    pub steps: JsonValue,
}

fn title_case(words: &str) -> String {
    words
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deterministic recipe composer. Builds a dish around the first listed
/// ingredient; the surrounding quota flow is what this module exists
/// for, not culinary ambition.
pub fn compose_recipe(req: &GenerateRecipeRequest) -> ComposedRecipe {
    let main = req
        .ingredients
        .first()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "seasonal vegetables".to_string());
    let cuisine = req
        .cuisine
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let servings = req.servings.unwrap_or(2).clamp(1, 12);

    let title = match &cuisine {
        Some(cuisine) => format!("{} {}", title_case(cuisine), title_case(&main)),
        None => format!("Pan-Seared {}", title_case(&main)),
    };
    let summary = format!(
        "A simple {} dish for {} built around {}.",
        cuisine.as_deref().unwrap_or("weeknight"),
        if servings == 1 { "one".to_string() } else { format!("{} people", servings) },
        main
    );

    let mut ingredients: Vec<String> = req
        .ingredients
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if ingredients.is_empty() {
        ingredients.push(main.clone());
    }
    for staple in ["olive oil", "salt", "black pepper"] {
        if !ingredients.iter().any(|i| i == staple) {
            ingredients.push(staple.to_string());
        }
    }

    let steps = vec![
        format!("Prep the {} and measure out the remaining ingredients.", main),
        "Heat the olive oil in a large pan over medium-high heat.".to_string(),
        format!("Add the {} and cook until just done, seasoning as you go.", main),
        format!("Plate for {} and serve immediately.", servings),
    ];

    ComposedRecipe {
        title,
        summary,
        ingredients: json!(ingredients),
        steps: json!(steps),
    }
}

/// Storyboard scenes for a recipe video, one scene per step.
pub fn compose_storyboard(title: &str, steps: &JsonValue) -> JsonValue {
    let scenes: Vec<JsonValue> = steps
        .as_array()
        .map(|steps| {
            steps
                .iter()
                .enumerate()
                .map(|(idx, step)| {
                    json!({
                        "scene": idx + 1,
                        "caption": step,
                        "seconds": 8,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    json!({
        "title": title,
        "scenes": scenes,
    })
}

/// Pantry staples that pair with the given ingredients.
pub fn compose_suggestions(ingredients: &[String]) -> Vec<String> {
    let pairings: &[(&str, &[&str])] = &[
        ("tomato", &["basil", "mozzarella", "garlic"]),
        ("chicken", &["lemon", "thyme", "garlic"]),
        ("mushroom", &["parsley", "cream", "shallot"]),
        ("salmon", &["dill", "lemon", "capers"]),
        ("egg", &["chives", "butter", "gruyere"]),
    ];

    let mut suggestions = Vec::new();
    for ingredient in ingredients {
        let needle = ingredient.trim().to_lowercase();
        for (base, pairs) in pairings {
            if needle.contains(base) {
                for pair in *pairs {
                    if !suggestions.iter().any(|s| s == pair) {
                        suggestions.push(pair.to_string());
                    }
                }
            }
        }
    }
    if suggestions.is_empty() {
        suggestions.extend(["garlic", "lemon", "flat-leaf parsley"].map(String::from));
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_a_titled_recipe_from_ingredients() {
        let req = GenerateRecipeRequest {
            ingredients: vec!["Chicken".to_string(), "lemon".to_string()],
            cuisine: Some("greek".to_string()),
            servings: Some(4),
        };
        let recipe = compose_recipe(&req);
        assert_eq!(recipe.title, "Greek Chicken");
        let ingredients = recipe.ingredients.as_array().unwrap();
        assert!(ingredients.iter().any(|i| i == "chicken"));
        assert!(ingredients.iter().any(|i| i == "salt"));
        assert_eq!(recipe.steps.as_array().unwrap().len(), 4);
    }

    #[test]
    fn empty_request_still_produces_a_dish() {
        let req = GenerateRecipeRequest {
            ingredients: vec![],
            cuisine: None,
            servings: None,
        };
        let recipe = compose_recipe(&req);
        assert!(recipe.title.contains("Seasonal Vegetables"));
        assert!(!recipe.ingredients.as_array().unwrap().is_empty());
    }

    #[test]
    fn storyboard_has_one_scene_per_step() {
        let steps = serde_json::json!(["chop", "cook", "serve"]);
        let storyboard = compose_storyboard("Test", &steps);
        assert_eq!(storyboard["scenes"].as_array().unwrap().len(), 3);
        assert_eq!(storyboard["scenes"][0]["scene"], 1);
    }

    #[test]
    fn suggestions_match_known_pairings() {
        let suggestions = compose_suggestions(&["cherry tomato".to_string()]);
        assert!(suggestions.iter().any(|s| s == "basil"));
    }
}
