//! Ranking raw frequency tables into colour-tagged word items.

use crate::palette::palette_for;

/// A word and its frequency, optionally tagged with a display colour.
#[derive(Debug, Clone, PartialEq)]
pub struct WordItem {
    pub text: String,
    pub value: f32,
    pub color: Option<String>,
}

impl WordItem {
    /// Values below one are raised to one; frequencies start at a single use.
    pub fn new(text: impl Into<String>, value: f32) -> Self {
        Self {
            text: text.into(),
            value: if value.is_finite() { value.max(1.0) } else { 1.0 },
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Ranks a `word -> count` table into at most `max_items` items.
///
/// Entries with blank text or a zero count are skipped. Equal counts keep
/// their input order. Colours come from the category's palette by rank.
pub fn rank_frequencies<I, S>(table: I, max_items: usize, category: Option<&str>) -> Vec<WordItem>
where
    I: IntoIterator<Item = (S, u32)>,
    S: Into<String>,
{
    let items = table
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(word, count)| WordItem::new(word, count as f32))
        .collect();
    rank_with_palette(items, max_items, palette_for(category))
}

/// Ranks an already-built item list, overwriting any existing colours.
pub fn rank_items(items: Vec<WordItem>, max_items: usize, category: Option<&str>) -> Vec<WordItem> {
    rank_with_palette(items, max_items, palette_for(category))
}

pub fn rank_with_palette<S: AsRef<str>>(
    items: Vec<WordItem>,
    max_items: usize,
    palette: &[S],
) -> Vec<WordItem> {
    let mut ranked: Vec<WordItem> = items
        .into_iter()
        .filter(|item| !item.text.trim().is_empty())
        .collect();

    // stable: ties keep insertion order
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(max_items);

    if !palette.is_empty() {
        for (rank, item) in ranked.iter_mut().enumerate() {
            item.color = Some(palette[rank % palette.len()].as_ref().to_string());
        }
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::DEFAULT_COLORS;

    #[test]
    fn sorts_descending_and_truncates() {
        let table = vec![("tax", 30), ("economy", 50), ("nhs", 10), ("road", 1)];
        let ranked = rank_frequencies(table, 3, None);
        let words: Vec<_> = ranked.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(words, ["economy", "tax", "nhs"]);
        assert_eq!(ranked[0].value, 50.0);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let table = vec![("beta", 5), ("alpha", 5), ("gamma", 9), ("delta", 5)];
        let ranked = rank_frequencies(table, 10, None);
        let words: Vec<_> = ranked.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(words, ["gamma", "beta", "alpha", "delta"]);
    }

    #[test]
    fn colours_cycle_through_palette() {
        let table: Vec<(String, u32)> = (0..7).map(|i| (format!("w{i}"), 100 - i)).collect();
        let ranked = rank_frequencies(table, 10, Some("Labour"));
        let palette = palette_for(Some("labour"));
        assert_eq!(ranked[0].color.as_deref(), Some(palette[0]));
        assert_eq!(ranked[5].color.as_deref(), Some(palette[0]));
        assert_eq!(ranked[6].color.as_deref(), Some(palette[1]));
    }

    #[test]
    fn prebuilt_items_are_recoloured() {
        let items = vec![
            WordItem::new("housing", 4.0).with_color("#000"),
            WordItem::new("schools", 8.0),
        ];
        let ranked = rank_items(items, 100, Some("unknown party"));
        assert_eq!(ranked[0].text, "schools");
        assert_eq!(ranked[0].color.as_deref(), Some(DEFAULT_COLORS[0]));
        assert_eq!(ranked[1].color.as_deref(), Some(DEFAULT_COLORS[1]));
    }

    #[test]
    fn empty_and_blank_inputs_yield_nothing() {
        assert!(rank_frequencies(Vec::<(&str, u32)>::new(), 100, None).is_empty());
        let ranked = rank_frequencies(vec![("  ", 4), ("zero", 0)], 100, None);
        assert!(ranked.is_empty());
    }

    #[test]
    fn item_values_are_at_least_one() {
        assert_eq!(WordItem::new("x", 0.2).value, 1.0);
        assert_eq!(WordItem::new("x", f32::NAN).value, 1.0);
    }
}
