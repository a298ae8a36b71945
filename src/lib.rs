/*!
 * Hansard Cloud
 *
 * Word-cloud layout for parliamentary speech frequencies: ranking, font
 * scaling, spiral placement, interactive pan/zoom state and PNG export.
 */

pub mod directory;
pub mod export;
pub mod font_scale;
pub mod geometry;
pub mod palette;
pub mod placement;
pub mod profile;
pub mod ranker;
pub mod scheduler;
pub mod session;
pub mod viewport;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use export::{export_filename, Caption, ExportOptions, ExportRenderer, FontAsset};
pub use font_scale::{FontScale, ValueRange};
pub use geometry::{overlaps, Rect};
pub use placement::{layout, layout_measured, LayoutOutcome, PlacedWord, WordStyle};
pub use profile::{LayoutProfile, ShapeConstraint};
pub use ranker::{rank_frequencies, rank_items, WordItem};
pub use session::InteractiveCloud;
pub use viewport::{DeviceClass, GestureEvent, Orientation, ViewportController, ViewportTransform};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, Error)]
pub enum Error {
    #[error("Font error: {0}")]
    Font(String),
    #[error("SVG error: {0}")]
    Svg(String),
    #[error("Render error: {0}")]
    Render(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_os_rng(),
    }
}

// =============================================================================
// Builder
// =============================================================================

/// One-shot interactive layout from a raw frequency table.
pub struct WordCloudBuilder {
    width: f32,
    height: f32,
    padding: f32,
    max_items: usize,
    max_attempts: usize,
    category: Option<String>,
    font_scale: FontScale,
    seed: Option<u64>,
}

impl Default for WordCloudBuilder {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 800.0,
            padding: 32.0,
            max_items: 100,
            max_attempts: 2000,
            category: None,
            font_scale: FontScale::INTERACTIVE,
            seed: None,
        }
    }
}

impl WordCloudBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width.max(100.0);
        self.height = height.max(100.0);
        self
    }

    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn font_size_range(mut self, min: f32, max: f32) -> Self {
        let min = min.max(4.0);
        self.font_scale = FontScale::new(min, max.max(min), self.font_scale.exponent);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn profile(&self) -> LayoutProfile {
        LayoutProfile::interactive(self.width, self.height)
            .with_padding(self.padding)
            .with_max_attempts(self.max_attempts)
            .with_font_scale(self.font_scale)
    }

    pub fn build<I, S>(&self, table: I) -> Result<LayoutOutcome>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let items = rank_frequencies(table, self.max_items, self.category.as_deref());
        let mut rng = seeded_rng(self.seed);
        layout(&items, &self.profile(), &mut rng)
    }
}

/// Lays out `(word, count)` pairs with the default interactive settings.
pub fn generate(words: &[(&str, u32)]) -> Result<LayoutOutcome> {
    WordCloudBuilder::new().build(words.iter().copied())
}
