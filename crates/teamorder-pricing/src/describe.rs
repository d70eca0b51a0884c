use teamorder_core::LineItem;

/// Multi-line invoice description for one unit.
///
/// ```text
/// Jacket - Softshell M (Stonewash)
/// Logo: Left Chest
/// Embroidered Name: DANA (Gold thread)
/// ```
///
/// The embroidery line appears only when a name is present.
#[must_use]
pub fn format_item_description(item: &LineItem) -> String {
    let mut description = format!(
        "{} - {} {} ({})\nLogo: {}",
        item.product, item.style, item.size, item.color, item.logo
    );
    if let Some(name) = item.embroidery() {
        description.push_str("\nEmbroidered Name: ");
        description.push_str(name);
        if let Some(thread) = item.thread() {
            description.push_str(&format!(" ({thread} thread)"));
        }
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{embroidered, item};

    #[test]
    fn plain_item_has_two_lines() {
        let text = format_item_description(&item("Jacket", "Stonewash"));
        assert_eq!(text, "Jacket - Softshell M (Stonewash)\nLogo: Left Chest");
    }

    #[test]
    fn embroidered_item_names_thread() {
        let text = format_item_description(&embroidered("Jacket", "Black", "DANA", "Gold"));
        assert_eq!(
            text,
            "Jacket - Softshell M (Black)\nLogo: Left Chest\nEmbroidered Name: DANA (Gold thread)"
        );
    }

    #[test]
    fn embroidery_without_thread_omits_thread() {
        let text = format_item_description(&embroidered("Vest", "Navy", "LEE", " "));
        assert!(text.ends_with("\nEmbroidered Name: LEE"), "{text}");
    }

    #[test]
    fn raw_color_is_shown_not_group() {
        let text = format_item_description(&item("Jacket", "Birch White"));
        assert!(text.contains("(Birch White)"));
    }
}
