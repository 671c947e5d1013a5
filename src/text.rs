//! String transforms for display names and identifiers
//!
//! Both transforms are pure functions of their input, which keeps the
//! compiler's output reproducible run to run.

/// Derive a display name from a snake_case key.
///
/// Splits on underscores and whitespace and capitalizes the first letter
/// of each word: `"page_title"` becomes `"Page Title"`.
pub fn title_case(name: &str) -> String {
    name.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive an identifier from a display label.
///
/// Lowercases the label and collapses every run of non-alphanumeric
/// characters into a single underscore: `"Right align"` becomes
/// `"right_align"`.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_sep = false;

    for c in label.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_sep = true;
        }
    }

    slug
}

/// Capitalize the first character of a word, leaving the rest untouched.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_snake_case() {
        assert_eq!(title_case("page_title"), "Page Title");
        assert_eq!(title_case("hero"), "Hero");
        assert_eq!(title_case("call_to_action_url"), "Call To Action Url");
    }

    #[test]
    fn test_title_case_collapses_separators() {
        assert_eq!(title_case("double__underscore"), "Double Underscore");
        assert_eq!(title_case("  padded name "), "Padded Name");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Left"), "left");
        assert_eq!(slugify("Right align"), "right_align");
        assert_eq!(slugify("Full-width"), "full_width");
    }

    #[test]
    fn test_slugify_trims_and_collapses() {
        assert_eq!(slugify("  Two   words  "), "two_words");
        assert_eq!(slugify("Ends with!"), "ends_with");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_keeps_digits() {
        assert_eq!(slugify("Column 2"), "column_2");
    }

    #[test]
    fn test_transforms_are_stable() {
        // Reproducible output depends on these being pure
        for input in ["page_title", "Left", "Right align"] {
            assert_eq!(title_case(input), title_case(input));
            assert_eq!(slugify(input), slugify(input));
        }
    }
}
