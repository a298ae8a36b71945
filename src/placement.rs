//! Spiral placement engine.
//!
//! Words are placed greedily in descending value order. Each word walks an
//! Archimedean spiral out from the profile centre until it finds a slot that
//! fits the profile's shape and clears every word placed before it. Words that
//! exhaust the attempt budget are dropped and counted.

use std::f32::consts::TAU;
use std::time::Duration;

use log::{debug, trace};
use rand::Rng;

use crate::font_scale::ValueRange;
use crate::geometry::{overlaps, Rect};
use crate::profile::LayoutProfile;
use crate::ranker::WordItem;
use crate::Result;

/// A word with a resolved position and font size.
///
/// `(x, y)` is the top-left corner of the bounding box in layout space.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub value: f32,
    pub color: Option<String>,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub width: f32,
    pub height: f32,
}

impl PlacedWord {
    fn new(item: &WordItem, bounds: Rect, font_size: f32) -> Self {
        Self {
            text: item.text.clone(),
            value: item.value,
            color: item.color.clone(),
            x: bounds.x,
            y: bounds.y,
            font_size,
            width: bounds.width,
            height: bounds.height,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        self.bounds().center()
    }

    /// Display hints for the live view; `index` is the word's render order.
    pub fn style(&self, range: ValueRange, index: usize) -> WordStyle {
        let significance = range.significance(self.value);
        WordStyle {
            opacity: 0.7 + significance * 0.3,
            bold: significance > 0.5,
            shadow: significance > 0.7,
            fade_in_delay: Duration::from_millis(index as u64 * 20),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordStyle {
    pub opacity: f32,
    pub bold: bool,
    pub shadow: bool,
    pub fade_in_delay: Duration,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    /// Placed words in rank order.
    pub placed: Vec<PlacedWord>,
    /// Words that found no slot within the attempt budget.
    pub dropped: usize,
    /// Value range the font sizes were derived from.
    pub range: Option<ValueRange>,
}

impl LayoutOutcome {
    pub fn empty() -> Self {
        Self {
            placed: Vec::new(),
            dropped: 0,
            range: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }
}

/// Lays out `items` under `profile`, sizing boxes with the profile's
/// per-character width estimate.
///
/// Only an invalid profile is an error. Empty input gives an empty outcome,
/// and words that cannot be placed are reported through
/// [`LayoutOutcome::dropped`].
pub fn layout<R: Rng + ?Sized>(
    items: &[WordItem],
    profile: &LayoutProfile,
    rng: &mut R,
) -> Result<LayoutOutcome> {
    layout_measured(items, profile, rng, |text, font_size, _| {
        profile.estimate_box(text, font_size).0
    })
}

/// Like [`layout`], with box widths from `measure(text, font_size, significance)`.
///
/// Box heights still come from the profile's line height.
pub fn layout_measured<R, M>(
    items: &[WordItem],
    profile: &LayoutProfile,
    rng: &mut R,
    measure: M,
) -> Result<LayoutOutcome>
where
    R: Rng + ?Sized,
    M: Fn(&str, f32, f32) -> f32,
{
    profile.validate()?;

    let Some(range) = ValueRange::of(items) else {
        return Ok(LayoutOutcome::empty());
    };

    if !profile.has_room() {
        debug!(
            "layout {}x{}: no room inside the margins, dropping {} words",
            profile.container_width,
            profile.container_height,
            items.len()
        );
        return Ok(LayoutOutcome {
            placed: Vec::new(),
            dropped: items.len(),
            range: Some(range),
        });
    }

    let mut order: Vec<&WordItem> = items.iter().collect();
    order.sort_by(|a, b| b.value.total_cmp(&a.value));

    let threshold = range.threshold(profile.significance_ratio);
    let mut placed: Vec<PlacedWord> = Vec::with_capacity(order.len());
    let mut dropped = 0;
    let mut attempts = 0;

    for item in order {
        let font_size = profile.font_scale.size_for(item.value, range);
        let width = measure(&item.text, font_size, range.significance(item.value)).max(0.0);
        let height = font_size * profile.line_height_factor;
        let significant = item.value > threshold;

        let (slot, tries) = find_slot(width, height, font_size, significant, &placed, profile, rng);
        attempts += tries;
        match slot {
            Some(bounds) => placed.push(PlacedWord::new(item, bounds, font_size)),
            None => {
                trace!("dropped {:?} ({}px)", item.text, font_size);
                dropped += 1;
            }
        }
    }

    debug!(
        "layout {}x{}: placed {} of {} words ({} dropped) in {} attempts",
        profile.container_width,
        profile.container_height,
        placed.len(),
        items.len(),
        dropped,
        attempts
    );

    Ok(LayoutOutcome {
        placed,
        dropped,
        range: Some(range),
    })
}

/// Walks the spiral for one box. Returns the slot, if any, and the number of
/// attempts spent.
fn find_slot<R: Rng + ?Sized>(
    width: f32,
    height: f32,
    font_size: f32,
    significant: bool,
    placed: &[PlacedWord],
    profile: &LayoutProfile,
    rng: &mut R,
) -> (Option<Rect>, usize) {
    let (start_radius, radial_step) = if significant {
        (0.0, profile.radial_step)
    } else {
        (
            profile
                .min_start_radius
                .max(font_size * profile.start_radius_factor),
            profile.coarse_radial_step,
        )
    };

    let spiral = SpiralPath::new(start_radius, radial_step, profile, rng);
    let mut tries = 0;

    for step in spiral {
        tries += 1;
        let (sin, cos) = step.angle.sin_cos();
        let corner = cos.abs().min(sin.abs());
        let radius = step.radius * (1.0 - corner * profile.oval_correction);

        let candidate = Rect::centered(
            profile.center_x + cos * radius * profile.horizontal_stretch,
            profile.center_y + sin * radius,
            width,
            height,
        );

        if !profile.contains(&candidate) {
            continue;
        }

        // tighter packing towards the diagonals
        let buffer = if significant {
            0.0
        } else {
            profile.buffer * (1.0 - corner * profile.corner_relief)
        };

        if placed
            .iter()
            .all(|other| !overlaps(&candidate, &other.bounds(), buffer))
        {
            return (Some(candidate), tries);
        }
    }

    (None, tries)
}

// =============================================================================
// Spiral Path
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct SpiralStep {
    angle: f32,
    radius: f32,
}

/// Archimedean spiral with a randomly re-seeded base angle.
struct SpiralPath<'a, R: ?Sized> {
    attempt: usize,
    budget: usize,
    base_angle: f32,
    start_radius: f32,
    radial_step: f32,
    angular_step: f32,
    reangle_interval: usize,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> SpiralPath<'a, R> {
    fn new(start_radius: f32, radial_step: f32, profile: &LayoutProfile, rng: &'a mut R) -> Self {
        let base_angle = rng.random::<f32>() * TAU;
        Self {
            attempt: 0,
            budget: profile.max_placement_attempts,
            base_angle,
            start_radius,
            radial_step,
            angular_step: profile.angular_step,
            reangle_interval: profile.reangle_interval,
            rng,
        }
    }
}

impl<R: Rng + ?Sized> Iterator for SpiralPath<'_, R> {
    type Item = SpiralStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.attempt >= self.budget {
            return None;
        }

        let i = self.attempt as f32;
        let step = SpiralStep {
            angle: self.base_angle + i * self.angular_step,
            radius: self.start_radius + i * self.radial_step,
        };

        // escape angular traps
        if self.attempt % self.reangle_interval == 0 {
            self.base_angle = self.rng.random::<f32>() * TAU;
            trace!(
                "spiral re-angled to {:.3} rad after attempt {}",
                self.base_angle,
                self.attempt
            );
        }
        self.attempt += 1;

        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn spiral_respects_budget_and_growth() {
        let profile = LayoutProfile::interactive(1000.0, 800.0).with_max_attempts(5);
        let mut rng = rng(1);
        let steps: Vec<_> = SpiralPath::new(10.0, 2.0, &profile, &mut rng).collect();
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0].radius, 10.0);
        assert_eq!(steps[4].radius, 18.0);
    }

    #[test]
    fn spiral_reseeds_base_angle() {
        let mut profile = LayoutProfile::interactive(1000.0, 800.0).with_max_attempts(4);
        profile.reangle_interval = 2;
        profile.angular_step = 0.0;
        let mut rng = rng(3);
        let angles: Vec<_> = SpiralPath::new(0.0, 1.0, &profile, &mut rng)
            .map(|s| s.angle)
            .collect();
        // re-seeded after attempts 0 and 2
        assert_ne!(angles[0], angles[1]);
        assert_eq!(angles[1], angles[2]);
        assert_ne!(angles[2], angles[3]);
    }

    #[test]
    fn most_significant_word_lands_on_centre() {
        let items = vec![WordItem::new("economy", 50.0), WordItem::new("nhs", 10.0)];
        let profile = LayoutProfile::interactive(1000.0, 800.0);
        let outcome = layout(&items, &profile, &mut rng(7)).unwrap();
        let (cx, cy) = outcome.placed[0].center();
        assert!((cx - 500.0).abs() < 1e-3);
        assert!((cy - 400.0).abs() < 1e-3);
    }

    #[test]
    fn unsorted_input_is_placed_in_value_order() {
        let items = vec![
            WordItem::new("road", 1.0),
            WordItem::new("economy", 50.0),
            WordItem::new("tax", 30.0),
        ];
        let profile = LayoutProfile::interactive(1000.0, 800.0);
        let outcome = layout(&items, &profile, &mut rng(11)).unwrap();
        let words: Vec<_> = outcome.placed.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(words, ["economy", "tax", "road"]);
    }

    #[test]
    fn oversized_word_is_dropped_not_an_error() {
        let items = vec![WordItem::new("antidisestablishmentarianism", 5.0)];
        let profile = LayoutProfile::interactive(300.0, 300.0);
        let outcome = layout(&items, &profile, &mut rng(5)).unwrap();
        assert!(outcome.placed.is_empty());
        assert_eq!(outcome.dropped, 1);
    }

    #[test]
    fn invalid_profile_fails_fast() {
        let items = vec![WordItem::new("tax", 5.0)];
        let profile = LayoutProfile::interactive(0.0, 0.0);
        assert!(layout(&items, &profile, &mut rng(5)).is_err());
    }

    #[test]
    fn no_room_drops_everything_without_error() {
        let items = vec![WordItem::new("economy", 50.0), WordItem::new("nhs", 10.0)];
        let profile = LayoutProfile::interactive(1000.0, 64.0);
        let outcome = layout(&items, &profile, &mut rng(4)).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.dropped, 2);
        assert_eq!(outcome.range, Some(ValueRange::new(10.0, 50.0)));
    }

    #[test]
    fn measured_widths_size_the_boxes() {
        let items = vec![WordItem::new("economy", 50.0), WordItem::new("nhs", 10.0)];
        let profile = LayoutProfile::interactive(1000.0, 800.0);
        let outcome = layout_measured(&items, &profile, &mut rng(6), |text, size, significance| {
            let per_char = if significance > 0.5 { 0.8 } else { 0.4 };
            text.chars().count() as f32 * size * per_char
        })
        .unwrap();

        let economy = &outcome.placed[0];
        assert!((economy.width - 7.0 * economy.font_size * 0.8).abs() < 1e-3);
        assert!((economy.height - economy.font_size * 1.2).abs() < 1e-3);
        let nhs = &outcome.placed[1];
        assert!((nhs.width - 3.0 * nhs.font_size * 0.4).abs() < 1e-3);
    }

    #[test]
    fn equal_values_get_plain_style() {
        let items = vec![WordItem::new("tax", 7.0), WordItem::new("rail", 7.0)];
        let profile = LayoutProfile::interactive(1000.0, 800.0);
        let outcome = layout(&items, &profile, &mut rng(2)).unwrap();
        let range = outcome.range.unwrap();
        for (i, word) in outcome.placed.iter().enumerate() {
            let style = word.style(range, i);
            assert!(!style.bold && !style.shadow);
            assert!((style.opacity - 0.7).abs() < 1e-6);
        }
    }

    #[test]
    fn style_follows_significance() {
        let items = vec![WordItem::new("economy", 50.0), WordItem::new("nhs", 10.0)];
        let profile = LayoutProfile::interactive(1000.0, 800.0);
        let outcome = layout(&items, &profile, &mut rng(9)).unwrap();
        let range = outcome.range.unwrap();

        let top = outcome.placed[0].style(range, 0);
        assert!(top.bold && top.shadow);
        assert!((top.opacity - 1.0).abs() < 1e-6);

        let low = outcome.placed[1].style(range, 1);
        assert!(!low.bold && !low.shadow);
        assert!((low.opacity - 0.7).abs() < 1e-6);
        assert_eq!(low.fade_in_delay, Duration::from_millis(20));
    }
}
