//! Prompt construction for the relay
//!
//! Builds the persona/system instructions and the structured product
//! summaries embedded in user instructions. Display strings live in
//! `i18n`; everything here is addressed to the model.

use serde_json::json;

use crate::i18n::Locale;
use crate::types::Product;

/// System instruction for routine generation
pub fn routine_system_prompt(locale: Locale) -> String {
    let mut prompt = String::from(
        "You are a beauty and skincare expert with access to current information. \
         Create a personalized routine using the provided products. Include the \
         order of use, application tips, and timing (morning/evening). Also search \
         for any recent product updates, reviews, or application techniques. \
         Include current information and cite any sources you find.",
    );
    append_language_instruction(&mut prompt, locale);
    prompt
}

/// User instruction for routine generation, embedding a structured
/// summary (name, brand, category, description) of each selected product
pub fn routine_user_prompt(selection: &[Product]) -> String {
    let product_info: Vec<_> = selection
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "brand": p.brand,
                "category": p.category,
                "description": p.description,
            })
        })
        .collect();
    format!(
        "Create a personalized beauty routine using these products: {}. Please \
         also search for any current information about these specific products, \
         application techniques, or recent reviews that might help optimize the \
         routine.",
        serde_json::Value::Array(product_info)
    )
}

/// System instruction for follow-up chat, optionally referencing the
/// generated routine and the selected product names
pub fn chat_system_prompt(
    locale: Locale,
    routine_context: Option<&str>,
    selection: &[Product],
) -> String {
    let mut prompt = String::from(
        "You are a beauty and skincare expert assistant with access to current web \
         information. Answer questions about beauty routines, skincare, haircare, \
         makeup, fragrance, and related topics. Search for current information \
         when relevant. Keep responses helpful and concise. Include citations for \
         any current information you find.",
    );
    if routine_context.is_some() && !selection.is_empty() {
        let names: Vec<&str> = selection.iter().map(|p| p.name.as_str()).collect();
        prompt.push_str(&format!(
            " The user has generated a routine with these products: {}. You can \
             reference this routine and these products in your answers.",
            names.join(", ")
        ));
    }
    append_language_instruction(&mut prompt, locale);
    prompt
}

/// Marker recorded in the conversation log after a successful routine
/// generation; sent upstream as context on later turns
pub fn routine_marker(selection: &[Product]) -> String {
    let names: Vec<&str> = selection.iter().map(|p| p.name.as_str()).collect();
    format!("Generated routine for products: {}", names.join(", "))
}

fn append_language_instruction(prompt: &mut String, locale: Locale) {
    if locale == Locale::Ar {
        prompt.push_str(" Respond in Arabic.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products() -> Vec<Product> {
        vec![
            Product {
                id: 1,
                name: "Revitalift Serum".into(),
                brand: "L'Oréal Paris".into(),
                category: "skincare".into(),
                description: "Anti-aging serum.".into(),
                image: "revitalift.jpg".into(),
            },
            Product {
                id: 2,
                name: "True Match Foundation".into(),
                brand: "L'Oréal Paris".into(),
                category: "makeup".into(),
                description: "Blendable foundation.".into(),
                image: "truematch.jpg".into(),
            },
        ]
    }

    #[test]
    fn routine_user_prompt_embeds_structured_summaries() {
        let prompt = routine_user_prompt(&products());
        assert!(prompt.contains("\"name\":\"Revitalift Serum\""));
        assert!(prompt.contains("\"category\":\"makeup\""));
        // Image references are display-only and stay out of the prompt
        assert!(!prompt.contains("revitalift.jpg"));
    }

    #[test]
    fn chat_prompt_references_routine_only_when_present() {
        let bare = chat_system_prompt(Locale::En, None, &products());
        assert!(!bare.contains("Revitalift"));

        let with_routine = chat_system_prompt(Locale::En, Some("Apply nightly."), &products());
        assert!(with_routine.contains("Revitalift Serum, True Match Foundation"));
    }

    #[test]
    fn arabic_locale_adds_language_instruction() {
        assert!(routine_system_prompt(Locale::Ar).ends_with("Respond in Arabic."));
        assert!(!routine_system_prompt(Locale::En).contains("Respond in Arabic."));
    }

    #[test]
    fn routine_marker_lists_names_in_selection_order() {
        assert_eq!(
            routine_marker(&products()),
            "Generated routine for products: Revitalift Serum, True Match Foundation"
        );
    }
}
