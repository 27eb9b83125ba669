use serde::{Deserialize, Deserializer};

/// Normalizes user-entered text by stripping surrounding whitespace and
/// composing it into Unicode Normalization Form C.
///
/// ```
/// use shelter::normalization::normalize_text;
/// assert_eq!(normalize_text(" Zoe\u{301} "), "Zoé");
/// ```
pub fn normalize_text(text: impl AsRef<str>) -> String {
    use unicode_normalization::UnicodeNormalization;

    text.as_ref().trim().nfc().collect()
}

/// Deserializes a `String` after running it through `normalize_text`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(normalize_text(s))
}

/// Deserializes a list of `String`s, normalizing each and dropping the
/// ones left empty.
pub fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Vec<String> = Deserialize::deserialize(deserializer)?;
    Ok(v.into_iter()
        .map(normalize_text)
        .filter(|s| !s.is_empty())
        .collect())
}
