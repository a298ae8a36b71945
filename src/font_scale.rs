//! Frequency to font-size mapping.

use crate::ranker::WordItem;

/// Observed `[min, max]` value range of one item set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Range over `items`, or `None` when there are no items.
    pub fn of(items: &[WordItem]) -> Option<Self> {
        let first = items.first()?.value;
        Some(items.iter().skip(1).fold(Self::new(first, first), |r, item| {
            Self::new(r.min.min(item.value), r.max.max(item.value))
        }))
    }

    /// Linear position of `value` within the range, in `[0, 1]`.
    ///
    /// A degenerate range scores every value 0.
    pub fn significance(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Value above which an item is treated as high-significance.
    pub fn threshold(&self, ratio: f32) -> f32 {
        self.min + (self.max - self.min) * ratio
    }
}

/// Log-then-power font size curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontScale {
    pub min_size: f32,
    pub max_size: f32,
    pub exponent: f32,
}

impl FontScale {
    pub const INTERACTIVE: FontScale = FontScale {
        min_size: 12.0,
        max_size: 100.0,
        exponent: 3.0,
    };

    pub const EXPORT: FontScale = FontScale {
        min_size: 12.0,
        max_size: 100.0,
        exponent: 3.5,
    };

    pub fn new(min_size: f32, max_size: f32, exponent: f32) -> Self {
        Self {
            min_size,
            max_size,
            exponent,
        }
    }

    /// Same curve with both size bounds multiplied by `factor`.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            min_size: self.min_size * factor,
            max_size: self.max_size * factor,
            ..self
        }
    }

    pub fn size_for(&self, value: f32, range: ValueRange) -> f32 {
        self.font_size(value, range.min, range.max)
    }

    pub fn font_size(&self, value: f32, min_value: f32, max_value: f32) -> f32 {
        if min_value == max_value {
            return (self.min_size + self.max_size) / 2.0;
        }

        // ln(0) guard: anything below one counts as one
        let log_min = min_value.max(1.0).ln();
        let log_max = max_value.max(1.0).ln();
        let log_value = value.max(1.0).ln();

        if log_max <= log_min {
            return (self.min_size + self.max_size) / 2.0;
        }

        let normalized = ((log_value - log_min) / (log_max - log_min)).clamp(0.0, 1.0);
        let curved = normalized.powf(self.exponent);

        (self.min_size + curved * (self.max_size - self.min_size))
            .round()
            .clamp(self.min_size, self.max_size)
    }
}

impl Default for FontScale {
    fn default() -> Self {
        Self::INTERACTIVE
    }
}
