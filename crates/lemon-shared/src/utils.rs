//! Utility functions

use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

pub fn is_valid_slug(s: &str) -> bool {
    SLUG_RE.is_match(s)
}

/// Lowercases, drops anything that is not alphanumeric, and joins words with hyphens.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_dash = false;
    for c in s.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }
    slug
}

/// Upper-cases the first character and lower-cases the rest ("delivery CREW" -> "Delivery crew").
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Main Courses"), "main-courses");
        assert_eq!(slugify("  Desserts & Drinks "), "desserts-drinks");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert!(is_valid_slug(&slugify("Soups 2024")));
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("main_courses-1"));
        assert!(!is_valid_slug("main courses"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("delivery crew"), "Delivery crew");
        assert_eq!(capitalize("Delivery Crew"), "Delivery crew");
        assert_eq!(capitalize("MANAGER"), "Manager");
        assert_eq!(capitalize(""), "");
    }
}
