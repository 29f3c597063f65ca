//! Prompt construction for the confirmation call.

use crossell_core::ConfirmationRequest;

/// The system message pins the reply format so [`parse_reply`] can key off
/// the first word.
///
/// [`parse_reply`]: crossell_core::parse_reply
pub const SYSTEM_PROMPT: &str = "You are a B2B food-industry sourcing specialist. \
You judge whether a catalog product is a sensible supply match for a recipe \
ingredient. Answer with YES or NO as the first word, followed by one short \
sentence of reasoning.";

/// Render the user message for one candidate.
pub fn confirmation_prompt(request: &ConfirmationRequest) -> String {
    format!(
        "A customer produces \"{item}\" (category: {category}). \
Product description: {description}. \
Full ingredient list: {ingredients}.\n\n\
For the ingredient \"{ingredient}\", would the product \"{product}\" be a \
suitable supply match? Consider whether the product genuinely is that \
ingredient or a direct substitute for it, not merely a related item. \
Start your answer with YES or NO.",
        item = request.catalogue_item_name,
        category = request.category,
        description = request.description,
        ingredients = request.ingredient_text,
        ingredient = request.ingredient,
        product = request.candidate_product,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ConfirmationRequest {
        ConfirmationRequest {
            ingredient: "Rye Flour".to_string(),
            candidate_product: "Dark Rye Flour".to_string(),
            catalogue_item_name: "Rustic Rye Bread".to_string(),
            category: "Bakery".to_string(),
            description: "Stone-baked sourdough rye loaf".to_string(),
            ingredient_text: "Rye Flour, Water, Salt; Yeast".to_string(),
        }
    }

    #[test]
    fn prompt_carries_both_sides_of_the_pair() {
        let rendered = confirmation_prompt(&request());
        assert!(rendered.contains("\"Rye Flour\""));
        assert!(rendered.contains("\"Dark Rye Flour\""));
    }

    #[test]
    fn prompt_carries_the_catalogue_item_context() {
        let rendered = confirmation_prompt(&request());
        assert!(rendered.contains("Rustic Rye Bread"));
        assert!(rendered.contains("Bakery"));
        assert!(rendered.contains("Rye Flour, Water, Salt; Yeast"));
    }

    #[test]
    fn prompt_demands_a_parseable_verdict() {
        assert!(SYSTEM_PROMPT.contains("YES or NO"));
        assert!(confirmation_prompt(&request()).contains("Start your answer with YES or NO"));
    }
}
