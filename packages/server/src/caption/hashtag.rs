/// Tags appended to every caption.
pub const FIXED_TAGS: [&str; 2] = ["#InstaAI", "#SocialMedia"];

/// Upper bound on tags taken from the description.
pub const MAX_DERIVED_TAGS: usize = 5;

/// Build the hashtag line for a raw model description.
///
/// Words longer than three characters become tags in source order, capped at
/// [`MAX_DERIVED_TAGS`], followed by [`FIXED_TAGS`].
pub fn hashtags(raw: &str) -> String {
    raw.split_whitespace()
        .filter(|word| word.chars().count() > 3)
        .take(MAX_DERIVED_TAGS)
        .map(|word| format!("#{word}"))
        .chain(FIXED_TAGS.iter().map(|tag| tag.to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}
