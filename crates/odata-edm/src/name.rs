//! Qualified-name helpers.

/// Split `NS.Sub.Name` into `("NS.Sub", "Name")` on the last `.`.
///
/// A name without a separator has an empty namespace.
pub fn split_qualified_name(qualified: &str) -> (&str, &str) {
    match qualified.rfind('.') {
        Some(dot) => (&qualified[..dot], &qualified[dot + 1..]),
        None => ("", qualified),
    }
}

/// `Collection(NS.T)` → `Some("NS.T")`.
pub fn collection_element(type_name: &str) -> Option<&str> {
    type_name
        .trim()
        .strip_prefix("Collection(")
        .and_then(|rest| rest.strip_suffix(')'))
        .map(str::trim)
}

pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}
