//! Console rendering adapter
//!
//! A thin display layer over the core stores: it parses line commands,
//! formats catalog/selection/transcript views, and prints the busy
//! indicator. No state lives here beyond what is needed to render.

#![warn(clippy::all)]

use lumiere_core::advisor::AdvisorEvents;
use lumiere_core::types::Product;
use lumiere_core::{message, Locale, MessageKey};

/// One line of user input, parsed
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Set the category filter (comma-joinable, empty clears it)
    Category(String),
    /// Set the search text (empty clears it)
    Search(String),
    /// Toggle a product in the selection
    Toggle(u32),
    /// Remove a product from the selection
    Remove(u32),
    /// Clear the selection
    Clear,
    /// Show a product's description
    Details(u32),
    /// Flip the display language
    Language,
    /// Generate a routine from the selection
    Routine,
    /// Show command help
    Help,
    /// Exit
    Quit,
    /// Anything else: a chat message for the assistant
    Chat(String),
}

impl Command {
    /// Parse a line of input. Slash commands drive the catalog and
    /// selection; plain text goes to the assistant.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };
        let cmd = match head {
            "/category" | "/cat" => Command::Category(rest.to_string()),
            "/search" => Command::Search(rest.to_string()),
            "/toggle" | "/add" => Command::Toggle(rest.parse().ok()?),
            "/remove" => Command::Remove(rest.parse().ok()?),
            "/clear" => Command::Clear,
            "/details" => Command::Details(rest.parse().ok()?),
            "/lang" | "/language" => Command::Language,
            "/routine" => Command::Routine,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Chat(line.to_string()),
        };
        Some(cmd)
    }
}

/// Right-to-left embedding mark prefixed to RTL output lines
fn direction_prefix(locale: Locale) -> &'static str {
    if locale.is_rtl() {
        "\u{202B}"
    } else {
        ""
    }
}

/// Format the filtered catalog view. `selected` drives the highlight
/// marker on each card.
pub fn render_products(
    products: &[&Product],
    selected: impl Fn(u32) -> bool,
    locale: Locale,
) -> String {
    if products.is_empty() {
        return format!(
            "{}{}",
            direction_prefix(locale),
            message(locale, MessageKey::NoProductsFound)
        );
    }
    products
        .iter()
        .map(|p| {
            format!(
                "{}[{}] {:>3}  {} | {} ({})",
                direction_prefix(locale),
                if selected(p.id) { "x" } else { " " },
                p.id,
                p.name,
                p.brand,
                p.category
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the selected-products panel
pub fn render_selection(selection: &[Product], locale: Locale) -> String {
    if selection.is_empty() {
        return format!(
            "{}{}",
            direction_prefix(locale),
            message(locale, MessageKey::EmptySelection)
        );
    }
    selection
        .iter()
        .map(|p| {
            format!(
                "{}{:>3}  {} ({})",
                direction_prefix(locale),
                p.id,
                p.name,
                p.brand
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one transcript line with the speaker's localized name
pub fn render_speech(speaker: MessageKey, text: &str, locale: Locale) -> String {
    format!(
        "{}{}: {}",
        direction_prefix(locale),
        message(locale, speaker),
        text
    )
}

/// Format a product's detail view
pub fn render_details(product: &Product, locale: Locale) -> String {
    format!(
        "{prefix}{name}\n{prefix}{brand}\n{prefix}{description}",
        prefix = direction_prefix(locale),
        name = product.name,
        brand = product.brand,
        description = product.description
    )
}

/// Command summary printed by `/help`
pub fn render_help() -> &'static str {
    "/category <names>   filter by category (comma-separated)\n\
     /search <text>      filter by name, brand, or description\n\
     /toggle <id>        add or remove a product from the selection\n\
     /remove <id>        remove a product from the selection\n\
     /clear              clear the selection\n\
     /details <id>       show a product's description\n\
     /routine            generate a routine from the selection\n\
     /lang               switch between English and Arabic\n\
     /quit               exit\n\
     anything else       ask the assistant"
}

/// Prints the busy indicator while a relay call is in flight
pub struct TerminalEvents;

impl AdvisorEvents for TerminalEvents {
    fn thinking_started(&self, label: &str) {
        println!("  {}", label);
    }

    fn thinking_finished(&self) {
        // The reply (or apology) line printed next supplants the label.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, name: &str) -> Product {
        Product {
            id,
            name: name.into(),
            brand: "L'Oréal Paris".into(),
            category: "skincare".into(),
            description: "A description.".into(),
            image: "img.jpg".into(),
        }
    }

    #[test]
    fn slash_commands_parse() {
        assert_eq!(
            Command::parse("/category makeup,skincare"),
            Some(Command::Category("makeup,skincare".into()))
        );
        assert_eq!(Command::parse("/toggle 3"), Some(Command::Toggle(3)));
        assert_eq!(Command::parse("/lang"), Some(Command::Language));
        assert_eq!(Command::parse("/routine"), Some(Command::Routine));
        assert_eq!(Command::parse("  /quit  "), Some(Command::Quit));
    }

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(
            Command::parse("what serum should I use?"),
            Some(Command::Chat("what serum should I use?".into()))
        );
    }

    #[test]
    fn blank_and_malformed_ids_are_ignored() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("/toggle abc"), None);
        assert_eq!(Command::parse("/toggle"), None);
    }

    #[test]
    fn selection_markers_track_membership() {
        let p1 = product(1, "Serum");
        let p2 = product(2, "Foundation");
        let view = render_products(&[&p1, &p2], |id| id == 2, Locale::En);
        let lines: Vec<&str> = view.lines().collect();
        assert!(lines[0].starts_with("[ ]"));
        assert!(lines[1].starts_with("[x]"));
    }

    #[test]
    fn empty_views_use_localized_placeholders() {
        assert_eq!(
            render_products(&[], |_| false, Locale::En),
            "No products found matching your criteria."
        );
        let empty_ar = render_selection(&[], Locale::Ar);
        assert!(empty_ar.starts_with('\u{202B}'));
    }

    #[test]
    fn rtl_lines_carry_direction_mark() {
        let p = product(1, "Serum");
        let view = render_products(&[&p], |_| false, Locale::Ar);
        assert!(view.starts_with('\u{202B}'));
        let ltr = render_products(&[&p], |_| false, Locale::En);
        assert!(!ltr.starts_with('\u{202B}'));
    }
}
