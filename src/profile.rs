//! Geometry profiles for one placement run.

use crate::font_scale::FontScale;
use crate::geometry::Rect;
use crate::{Error, Result};

/// Where a placed bounding box is allowed to sit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeConstraint {
    /// Inside the container minus `padding` on every side.
    RectangularWithPadding,
    /// All four corners inside a centred ellipse (scaled by `safety`), and a
    /// fixed `edge_margin` away from the container edges.
    Elliptical {
        radius_x: f32,
        radius_y: f32,
        safety: f32,
        edge_margin: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutProfile {
    pub container_width: f32,
    pub container_height: f32,
    pub padding: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub shape: ShapeConstraint,
    pub max_placement_attempts: usize,
    pub angular_step: f32,
    /// Radial growth per attempt for high-significance words.
    pub radial_step: f32,
    /// Radial growth per attempt for every other word.
    pub coarse_radial_step: f32,
    pub min_start_radius: f32,
    /// Start radius of ordinary words, as a fraction of their font size.
    pub start_radius_factor: f32,
    pub reangle_interval: usize,
    /// Radius foreshortening near the diagonals; 0 keeps the spiral circular.
    pub oval_correction: f32,
    /// Horizontal stretch of the spiral, for wide silhouettes.
    pub horizontal_stretch: f32,
    pub buffer: f32,
    /// Fraction of `buffer` given up near the diagonals.
    pub corner_relief: f32,
    pub significance_ratio: f32,
    pub char_width_factor: f32,
    pub line_height_factor: f32,
    pub font_scale: FontScale,
}

impl LayoutProfile {
    /// Live display profile: rectangular box, generous attempt budget.
    pub fn interactive(width: f32, height: f32) -> Self {
        Self {
            container_width: width,
            container_height: height,
            padding: 32.0,
            center_x: width / 2.0,
            center_y: height / 2.0,
            shape: ShapeConstraint::RectangularWithPadding,
            max_placement_attempts: 2000,
            angular_step: 0.05,
            radial_step: 0.5,
            coarse_radial_step: 1.2,
            min_start_radius: 10.0,
            start_radius_factor: 0.3,
            reangle_interval: 300,
            oval_correction: 0.3,
            horizontal_stretch: 1.0,
            buffer: 1.0,
            corner_relief: 0.5,
            significance_ratio: 0.3,
            char_width_factor: 0.6,
            line_height_factor: 1.2,
            font_scale: FontScale::INTERACTIVE,
        }
    }

    /// Fixed-canvas export profile: strict ellipse with an edge margin.
    ///
    /// `scale` is the export-to-reference width ratio; font sizes, steps and
    /// buffers grow with it so the export keeps the live packing density.
    pub fn export(width: f32, height: f32, edge_margin: f32, scale: f32) -> Self {
        let radius_x = (width / 2.0 - edge_margin).max(0.0);
        let radius_y = (height / 2.0 - edge_margin).max(0.0);
        Self {
            container_width: width,
            container_height: height,
            padding: edge_margin,
            center_x: width / 2.0,
            center_y: height / 2.0,
            shape: ShapeConstraint::Elliptical {
                radius_x,
                radius_y,
                safety: 0.98,
                edge_margin,
            },
            max_placement_attempts: 1500,
            angular_step: 0.05,
            radial_step: 0.5 * scale,
            coarse_radial_step: 1.2 * scale,
            min_start_radius: 10.0 * scale,
            start_radius_factor: 0.3,
            reangle_interval: 300,
            oval_correction: 0.0,
            horizontal_stretch: if radius_y > 0.0 { radius_x / radius_y } else { 1.0 },
            buffer: 2.0 * scale,
            corner_relief: 0.5,
            significance_ratio: 0.3,
            char_width_factor: 0.6,
            line_height_factor: 1.2,
            font_scale: FontScale::EXPORT.scaled(scale),
        }
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_placement_attempts = attempts;
        self
    }

    pub fn with_font_scale(mut self, font_scale: FontScale) -> Self {
        self.font_scale = font_scale;
        self
    }

    pub fn with_center(mut self, x: f32, y: f32) -> Self {
        self.center_x = x;
        self.center_y = y;
        self
    }

    /// Rejects configurations no caller should build: non-positive or
    /// non-finite sizes, a zero attempt budget or an inverted font range.
    ///
    /// A valid profile may still have no room for words; see [`Self::has_room`].
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.container_width) || !positive(self.container_height) {
            return Err(Error::Config(format!(
                "container must have positive size, got {}x{}",
                self.container_width, self.container_height
            )));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(Error::Config(format!("invalid padding {}", self.padding)));
        }
        if self.max_placement_attempts == 0 || self.reangle_interval == 0 {
            return Err(Error::Config("attempt budget and re-angle interval must be non-zero".into()));
        }
        if !positive(self.radial_step) || !positive(self.coarse_radial_step) {
            return Err(Error::Config("radial steps must be positive".into()));
        }
        if !positive(self.font_scale.min_size) || self.font_scale.max_size < self.font_scale.min_size {
            return Err(Error::Config(format!(
                "invalid font range {}..{}",
                self.font_scale.min_size, self.font_scale.max_size
            )));
        }
        if let ShapeConstraint::Elliptical {
            radius_x,
            radius_y,
            safety,
            edge_margin,
        } = self.shape
        {
            if !radius_x.is_finite()
                || !radius_y.is_finite()
                || radius_x < 0.0
                || radius_y < 0.0
                || !positive(safety)
                || !edge_margin.is_finite()
                || edge_margin < 0.0
            {
                return Err(Error::Config("invalid ellipse constraint".into()));
            }
        }
        Ok(())
    }

    /// Whether the shape leaves any area at all once margins are taken off.
    pub fn has_room(&self) -> bool {
        let inside = |margin: f32| {
            margin * 2.0 < self.container_width && margin * 2.0 < self.container_height
        };
        match self.shape {
            ShapeConstraint::RectangularWithPadding => inside(self.padding),
            ShapeConstraint::Elliptical {
                radius_x,
                radius_y,
                edge_margin,
                ..
            } => radius_x > 0.0 && radius_y > 0.0 && inside(edge_margin),
        }
    }

    /// Estimated bounding box size of `text` at `font_size`.
    pub fn estimate_box(&self, text: &str, font_size: f32) -> (f32, f32) {
        let chars = text.chars().count() as f32;
        (
            chars * font_size * self.char_width_factor,
            font_size * self.line_height_factor,
        )
    }

    /// Whether `rect` lies fully inside this profile's shape.
    pub fn contains(&self, rect: &Rect) -> bool {
        match self.shape {
            ShapeConstraint::RectangularWithPadding => self.within_margin(rect, self.padding),
            ShapeConstraint::Elliptical {
                radius_x,
                radius_y,
                safety,
                edge_margin,
            } => {
                self.within_margin(rect, edge_margin)
                    && rect.corners().iter().all(|&(x, y)| {
                        let dx = (x - self.center_x) / radius_x;
                        let dy = (y - self.center_y) / radius_y;
                        dx * dx + dy * dy <= safety
                    })
            }
        }
    }

    fn within_margin(&self, rect: &Rect, margin: f32) -> bool {
        rect.x >= margin
            && rect.y >= margin
            && rect.right() <= self.container_width - margin
            && rect.bottom() <= self.container_height - margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_defaults_validate() {
        let profile = LayoutProfile::interactive(1000.0, 800.0);
        assert!(profile.validate().is_ok());
        assert_eq!(profile.center_x, 500.0);
        assert_eq!(profile.max_placement_attempts, 2000);
    }

    #[test]
    fn rejects_programmer_errors() {
        assert!(LayoutProfile::interactive(0.0, 800.0).validate().is_err());
        assert!(LayoutProfile::interactive(-5.0, 800.0).validate().is_err());
        assert!(LayoutProfile::interactive(f32::NAN, 800.0).validate().is_err());
        assert!(LayoutProfile::interactive(1000.0, 800.0)
            .with_max_attempts(0)
            .validate()
            .is_err());
        assert!(LayoutProfile::interactive(1000.0, 800.0)
            .with_font_scale(FontScale::new(20.0, 10.0, 3.0))
            .validate()
            .is_err());
    }

    #[test]
    fn cramped_containers_are_valid_but_roomless() {
        for profile in [
            LayoutProfile::interactive(60.0, 800.0),
            LayoutProfile::interactive(1000.0, 64.0),
            LayoutProfile::export(200.0, 200.0, 100.0, 1.0),
        ] {
            assert!(profile.validate().is_ok());
            assert!(!profile.has_room());
        }
        assert!(LayoutProfile::interactive(1000.0, 65.0).has_room());
        assert!(LayoutProfile::export(1000.0, 600.0, 50.0, 1.0).has_room());
    }

    #[test]
    fn rectangular_containment_respects_padding() {
        let profile = LayoutProfile::interactive(1000.0, 800.0);
        assert!(profile.contains(&Rect::new(32.0, 32.0, 936.0, 736.0)));
        assert!(!profile.contains(&Rect::new(31.0, 32.0, 10.0, 10.0)));
        assert!(!profile.contains(&Rect::new(900.0, 100.0, 69.0, 10.0)));
    }

    #[test]
    fn elliptical_containment_checks_corners() {
        let profile = LayoutProfile::export(1000.0, 600.0, 50.0, 1.0);
        // centre is always inside
        assert!(profile.contains(&Rect::centered(500.0, 300.0, 100.0, 40.0)));
        // fits the margin box, but the corner pokes out of the ellipse
        assert!(!profile.contains(&Rect::new(60.0, 60.0, 40.0, 20.0)));
        // along the major axis, near the tip
        assert!(profile.contains(&Rect::centered(880.0, 300.0, 20.0, 10.0)));
        assert!(!profile.contains(&Rect::centered(955.0, 300.0, 20.0, 10.0)));
    }

    #[test]
    fn box_estimate_counts_chars_not_bytes() {
        let profile = LayoutProfile::interactive(1000.0, 800.0);
        let (w, h) = profile.estimate_box("café", 10.0);
        assert!((w - 24.0).abs() < 1e-4);
        assert!((h - 12.0).abs() < 1e-4);
    }
}
