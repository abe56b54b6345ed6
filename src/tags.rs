use std::collections::BTreeMap;

/// Key of a `key:value` tag; a tag without a colon is all key.
pub fn tag_key(tag: &str) -> &str {
    tag.split_once(':').map_or(tag, |(key, _)| key)
}

/// Render a provider-level default tag the way Datadog stores it.
pub fn render_tag(key: &str, value: &str) -> String {
    if value.is_empty() {
        key.to_string()
    } else {
        format!("{}:{}", key, value)
    }
}

/// Merge provider default tags into a resource's own tags.
///
/// Resource tags come first and are kept as-is, duplicates included. A default
/// is appended only when no resource tag already uses its key.
pub fn apply_default_tags(resource_tags: &[String], defaults: &BTreeMap<String, String>) -> Vec<String> {
    let mut merged = resource_tags.to_vec();

    for (key, value) in defaults {
        if !resource_tags.iter().any(|t| tag_key(t) == key) {
            merged.push(render_tag(key, value));
        }
    }

    merged
}
