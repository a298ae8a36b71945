//! Category (party) colour palettes.

/// Palette used for words when the category is unknown or absent.
pub const DEFAULT_COLORS: [&str; 15] = [
    "#ea384c", "#0EA5E9", "#F97316", "#8B5CF6", "#22c55e", "#D946EF", "#fb923c", "#1EAEDB",
    "#9b87f5", "#7E69AB", "#FEC6A1", "#E5DEFF", "#D3E4FD", "#FDE1D3", "#6E59A5",
];

/// Badge colour for categories without a known base colour.
pub const DEFAULT_BADGE: &str = "#1F1F1F";

/// Word palettes for the parties that have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartyPalette {
    Labour,
    Conservative,
    Reform,
    LiberalDemocrat,
    Green,
    Dup,
    #[default]
    Default,
}

impl PartyPalette {
    /// Case-insensitive lookup, including the alias spellings.
    pub fn from_category(category: &str) -> Self {
        match category.trim().to_lowercase().as_str() {
            "labour" | "labour (co-op)" | "independent" | "independents" => Self::Labour,
            "conservative" => Self::Conservative,
            "reform uk" | "reform" => Self::Reform,
            "liberal democrat" | "liberal democrats" => Self::LiberalDemocrat,
            "green" | "green party" => Self::Green,
            "democratic unionist party" | "dup" => Self::Dup,
            _ => Self::Default,
        }
    }

    pub fn colors(&self) -> &'static [&'static str] {
        match self {
            Self::Labour => &["#E4003B", "#FF6B6B", "#FF8585", "#FFA0A0", "#FFBABA"],
            Self::Conservative => &["#0087dc", "#4DA6FF", "#80BFFF", "#B3D9FF", "#CCE6FF"],
            Self::Reform => &["#00bed6", "#4DD9ED", "#80E5F3", "#B3F0F9", "#CCF6FB"],
            Self::LiberalDemocrat => &["#FAA61A", "#FFC04D", "#FFD280", "#FFE0B3", "#FFEACC"],
            Self::Green => &["#4BA562", "#7BC08C", "#A3D5B6", "#CBEADF", "#E2F4E9"],
            Self::Dup => &["#B84148", "#D17A80", "#E0A3A8", "#EFCCCF", "#F7E6E7"],
            Self::Default => &DEFAULT_COLORS,
        }
    }
}

/// Ordered word colours for a category; never empty.
pub fn palette_for(category: Option<&str>) -> &'static [&'static str] {
    category
        .map(PartyPalette::from_category)
        .unwrap_or_default()
        .colors()
}

/// Base colour used for the category badge in exported images.
pub fn badge_color(category: Option<&str>) -> &'static str {
    let Some(category) = category else {
        return DEFAULT_BADGE;
    };
    match category.trim().to_lowercase().as_str() {
        "labour" | "labour (co-op)" => "#E4003B",
        "conservative" => "#0087dc",
        "reform uk" | "reform" => "#00bed6",
        "liberal democrat" | "liberal democrats" => "#FAA61A",
        "green" | "green party" => "#4BA562",
        "democratic unionist party" | "dup" => "#B84148",
        "scottish national party" | "snp" => "#D7C919",
        "plaid cymru" => "#003831",
        "traditional unionist voice" | "tuv" => "#0C3A6A",
        "ulster unionist party" | "uup" => "#47A5EE",
        "alliance party" | "alliance" | "alliance party of northern ireland" => "#F6CB2E",
        "social democratic & labour party" | "sdlp" => "#29A82B",
        "independent" | "independents" => "#8E9196",
        "speaker" => "#1F1F1F",
        _ => DEFAULT_BADGE,
    }
}
