//! Topic guard
//!
//! A single allow-list vocabulary decides whether a free-text message is
//! in the assistant's domain before anything is sent upstream. Matching
//! is case-insensitive substring membership, not tokenized, so a term
//! may match inside a larger word ("moisturizers" matches "moisturizer").

/// Domain vocabulary: category nouns, brand names, beauty verbs, and
/// Arabic equivalents. One list gates every path that forwards free
/// text to the relay.
const DOMAIN_TERMS: &[&str] = &[
    // Skincare
    "skin",
    "skincare",
    "serum",
    "moisturizer",
    "moisturiser",
    "cleans",
    "sunscreen",
    "spf",
    "retinol",
    "toner",
    "lotion",
    "cream",
    "acne",
    "wrinkle",
    "hydrat",
    "exfoliat",
    "complexion",
    "pore",
    // Makeup
    "makeup",
    "foundation",
    "concealer",
    "mascara",
    "lipstick",
    "lip liner",
    "lip gloss",
    "blush",
    "eyeliner",
    "eyeshadow",
    "primer",
    "contour",
    // Hair
    "hair",
    "shampoo",
    "conditioner",
    "scalp",
    "frizz",
    "styling gel",
    "hair color",
    "hair colour",
    "hair dye",
    // Fragrance
    "fragrance",
    "perfume",
    "cologne",
    "eau de parfum",
    "eau de toilette",
    // Brands
    "lumiere",
    "l'oréal",
    "l'oreal",
    "loreal",
    "cerave",
    "garnier",
    "maybelline",
    "lancôme",
    "lancome",
    "kiehl",
    "vichy",
    "la roche-posay",
    "urban decay",
    "yves saint laurent",
    // Generic beauty vocabulary
    "beauty",
    "cosmetic",
    "routine",
    "grooming",
    "glow",
    // Arabic equivalents
    "بشرة",
    "شعر",
    "مكياج",
    "عطر",
    "روتين",
    "جمال",
    "ترطيب",
    "تنظيف",
    "واقي الشمس",
    "سيروم",
    "شامبو",
];

/// True iff the message contains at least one domain term. Pure and
/// side-effect free; the caller decides what to do with the verdict.
pub fn is_on_topic(message: &str) -> bool {
    let lowered = message.to_lowercase();
    DOMAIN_TERMS.iter().any(|term| lowered.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beauty_questions_pass() {
        assert!(is_on_topic("What's a good SPF for my face?"));
        assert!(is_on_topic("How should I layer my serum and moisturizer?"));
        assert!(is_on_topic("recommend a shampoo for frizzy hair"));
        assert!(is_on_topic("Is the True Match foundation good for my routine?"));
    }

    #[test]
    fn off_domain_questions_fail() {
        assert!(!is_on_topic("What's the weather today?"));
        assert!(!is_on_topic("Who won the football match last night?"));
        assert!(!is_on_topic("Write me a poem about mountains"));
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        assert!(is_on_topic("BEST MOISTURIZERS?"));
        // Term inside a larger word still matches
        assert!(is_on_topic("dehydrated and flaky"));
    }

    #[test]
    fn arabic_vocabulary_is_recognized() {
        assert!(is_on_topic("ما هو أفضل روتين للبشرة الجافة؟"));
        assert!(!is_on_topic("كيف حالة الطقس اليوم؟"));
    }
}
