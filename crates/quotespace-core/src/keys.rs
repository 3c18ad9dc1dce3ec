// Store key namespaces. Changing any of these orphans existing user data.

pub const DAILY_PREFIX: &str = "@quotespace/daily/";
pub const FAVORITES: &str = "@quotespace/favorites";
pub const SELECTED_CATEGORY: &str = "@quotespace/selectedCategory";

/// Key for a category's daily record, `"any"` when no category is given
pub fn daily_key(category: Option<&str>) -> String {
    let category = match category {
        Some(c) if !c.is_empty() => c.to_lowercase(),
        _ => "any".to_string(),
    };
    format!("{}{}", DAILY_PREFIX, category)
}
