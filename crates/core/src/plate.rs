/// Normalizes a plate for cross-dataset comparison: uppercase with all
/// whitespace removed, interior included. Returns `None` when nothing
/// usable remains.
pub fn normalize_plate(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
