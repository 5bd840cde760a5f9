use serde::{Deserialize, Serialize};

/// The six caption renderings offered to users.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CaptionStyle {
    #[default]
    Smart,
    Funny,
    Inspirational,
    Minimalist,
    Professional,
    Dramatic,
}

impl CaptionStyle {
    pub const ALL: [CaptionStyle; 6] = [
        CaptionStyle::Smart,
        CaptionStyle::Funny,
        CaptionStyle::Inspirational,
        CaptionStyle::Minimalist,
        CaptionStyle::Professional,
        CaptionStyle::Dramatic,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CaptionStyle::Smart => "smart",
            CaptionStyle::Funny => "funny",
            CaptionStyle::Inspirational => "inspirational",
            CaptionStyle::Minimalist => "minimalist",
            CaptionStyle::Professional => "professional",
            CaptionStyle::Dramatic => "dramatic",
        }
    }

    /// Display label shown in style pickers.
    pub fn label(self) -> &'static str {
        match self {
            CaptionStyle::Smart => "🤩 Smart",
            CaptionStyle::Funny => "😂 Funny",
            CaptionStyle::Inspirational => "💬 Inspirational",
            CaptionStyle::Minimalist => "➖ Minimalist",
            CaptionStyle::Professional => "💼 Professional",
            CaptionStyle::Dramatic => "🎭 Dramatic",
        }
    }

    /// Accepts a key (any case) or a display label. Anything else is `Smart`.
    pub fn parse_or_default(input: &str) -> Self {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.key().eq_ignore_ascii_case(input) || s.label() == input)
            .unwrap_or_default()
    }

    /// Render the raw model description in this style.
    pub fn render(self, raw: &str) -> String {
        match self {
            CaptionStyle::Smart => capitalize(raw),
            CaptionStyle::Funny => {
                let rest = raw.split_once(' ').map_or(raw, |(_, rest)| rest);
                format!("LOL when I {rest} 😂")
            }
            CaptionStyle::Inspirational => {
                format!("In this moment: {raw}. Cherish the journey. ✨")
            }
            CaptionStyle::Minimalist => raw.split_once(',').map_or(raw, |(head, _)| head).into(),
            CaptionStyle::Professional => format!("High-quality image showing: {raw}"),
            CaptionStyle::Dramatic => {
                format!("OMG! You won't BELIEVE what happens when {raw}!!!")
            }
        }
    }
}

/// Uppercase the first character and lowercase the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
