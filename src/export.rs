//! Fixed-resolution PNG export.
//!
//! The export re-runs placement on its own canvas with the elliptical profile,
//! draws each word centred on its box, adds a caption band and a watermark,
//! and rasterises the document with resvg.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use log::{debug, info, warn};
use rand::Rng;
use tiny_skia::{Pixmap, Transform};
use usvg::fontdb;

use crate::geometry::Rect;
use crate::palette;
use crate::placement::{layout, layout_measured, LayoutOutcome};
use crate::profile::LayoutProfile;
use crate::ranker::WordItem;
use crate::{seeded_rng, Error, Result};

/// Width the interactive font sizes are designed for.
pub const REFERENCE_WIDTH: f32 = 1000.0;
const BASE_WIDTH: f32 = 2560.0;
const BOLD_SIGNIFICANCE: f32 = 0.5;

// =============================================================================
// Caption
// =============================================================================

/// Text shown in the band under the cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub name: String,
    pub category_label: String,
    pub sub_label: String,
    pub badge_color: Option<String>,
}

impl Caption {
    pub fn new(
        name: impl Into<String>,
        category_label: impl Into<String>,
        sub_label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category_label: category_label.into(),
            sub_label: sub_label.into(),
            badge_color: None,
        }
    }

    pub fn badge_color(mut self, color: impl Into<String>) -> Self {
        self.badge_color = Some(color.into());
        self
    }

    fn resolved_badge_color(&self) -> String {
        self.badge_color
            .clone()
            .unwrap_or_else(|| palette::badge_color(Some(&self.category_label)).to_string())
    }
}

/// Positions of the caption elements, in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLayout {
    pub separator_y: f32,
    /// Vertical centre line shared by all caption text.
    pub center_y: f32,
    pub name_x: f32,
    pub name_size: f32,
    /// `None` when the category label is empty.
    pub badge: Option<Rect>,
    pub badge_text_size: f32,
    pub sub_label_x: f32,
    pub sub_label_size: f32,
}

// =============================================================================
// Fonts
// =============================================================================

/// Sans-serif families tried on the host, most preferred first.
const SANS_FAMILIES: [&str; 6] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Helvetica",
    "Arial",
    "FreeSans",
];

/// One font family for the export, with every weight that was found.
///
/// Words past the bold threshold, the caption name and the watermark are set
/// in the family's bold cut, so a family loaded with only a regular face
/// renders those at regular weight.
#[derive(Clone)]
pub struct FontAsset {
    family: String,
    sources: Vec<fontdb::Source>,
}

impl std::fmt::Debug for FontAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontAsset")
            .field("family", &self.family)
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl FontAsset {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_sources([data])
    }

    /// Several font files of one family, e.g. its regular and bold cuts.
    /// The family name is taken from the first file.
    pub fn from_sources<I>(files: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut db = fontdb::Database::new();
        let mut sources = Vec::new();
        let mut family = None;

        for data in files {
            let source = fontdb::Source::Binary(Arc::new(data));
            let before = db.len();
            db.load_font_source(source.clone());
            if db.len() == before {
                return Err(Error::Font(format!(
                    "unrecognised font data in file {}",
                    sources.len() + 1
                )));
            }
            if family.is_none() {
                family = first_family(&db);
            }
            sources.push(source);
        }

        let family = family.ok_or_else(|| Error::Font("no font data given".into()))?;
        let asset = Self { family, sources };
        asset.measure()?;
        Ok(asset)
    }

    /// Every face of the first installed sans-serif family from a fixed
    /// candidate list, falling back to fontdb's generic sans-serif and then
    /// to any family at all.
    pub fn system() -> Result<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let family =
            sans_family(&db).ok_or_else(|| Error::Font("no system fonts available".into()))?;
        let sources = family_sources(&db, &family);
        debug!("using system font family {family:?} ({} files)", sources.len());

        let asset = Self { family, sources };
        asset.measure()?;
        Ok(asset)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Whether the family has a face of bold weight or heavier.
    pub fn has_bold(&self) -> bool {
        let db = self.database();
        let found = db.faces().any(|face| {
            has_family(face, &self.family) && face.weight.0 >= fontdb::Weight::BOLD.0
        });
        found
    }

    fn measure(&self) -> Result<TextMeasure> {
        let db = self.database();
        Ok(TextMeasure::Glyphs {
            regular: self.face_metrics(&db, fontdb::Weight::NORMAL)?,
            bold: self.face_metrics(&db, fontdb::Weight::BOLD)?,
        })
    }

    /// Glyph metrics of the face usvg would pick for `weight`.
    fn face_metrics(&self, db: &fontdb::Database, weight: fontdb::Weight) -> Result<Font> {
        let families = [fontdb::Family::Name(&self.family)];
        let query = fontdb::Query {
            families: &families,
            weight,
            ..fontdb::Query::default()
        };
        let id = db
            .query(&query)
            .ok_or_else(|| Error::Font(format!("no face of {:?} loaded", self.family)))?;

        let parsed = db.with_face_data(id, |data, index| {
            let settings = FontSettings {
                collection_index: index,
                ..FontSettings::default()
            };
            Font::from_bytes(data, settings)
        });
        match parsed {
            Some(Ok(font)) => Ok(font),
            Some(Err(e)) => Err(Error::Font(e.to_string())),
            None => Err(Error::Font(format!("could not read {:?}", self.family))),
        }
    }

    fn database(&self) -> fontdb::Database {
        let mut db = fontdb::Database::new();
        for source in &self.sources {
            db.load_font_source(source.clone());
        }
        db.set_sans_serif_family(self.family.clone());
        db
    }
}

fn has_family(face: &fontdb::FaceInfo, family: &str) -> bool {
    face.families
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case(family))
}

fn first_family(db: &fontdb::Database) -> Option<String> {
    for face in db.faces() {
        if let Some((name, _)) = face.families.first() {
            return Some(name.clone());
        }
    }
    None
}

fn sans_family(db: &fontdb::Database) -> Option<String> {
    for candidate in SANS_FAMILIES {
        for face in db.faces() {
            let hit = face
                .families
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(candidate));
            if let Some((name, _)) = hit {
                return Some(name.clone());
            }
        }
    }

    let generic = [fontdb::Family::SansSerif];
    let query = fontdb::Query {
        families: &generic,
        ..fontdb::Query::default()
    };
    if let Some((name, _)) = db
        .query(&query)
        .and_then(|id| db.face(id))
        .and_then(|face| face.families.first())
    {
        return Some(name.clone());
    }
    first_family(db)
}

/// Font sources holding any face of `family`, each file once.
fn family_sources(db: &fontdb::Database, family: &str) -> Vec<fontdb::Source> {
    let mut sources = Vec::new();
    let mut seen: Vec<PathBuf> = Vec::new();

    for face in db.faces().filter(|face| has_family(face, family)) {
        #[allow(unreachable_patterns)]
        let path = match &face.source {
            fontdb::Source::File(path) => Some(path.clone()),
            fontdb::Source::SharedFile(path, _) => Some(path.clone()),
            _ => None,
        };
        if let Some(path) = path {
            if seen.contains(&path) {
                continue;
            }
            seen.push(path);
        }
        sources.push(face.source.clone());
    }
    sources
}

/// Text width either from real glyph advances or the layout estimate.
enum TextMeasure {
    Glyphs { regular: Font, bold: Font },
    Estimate,
}

impl TextMeasure {
    fn width(&self, text: &str, px: f32, bold: bool) -> f32 {
        match self {
            Self::Glyphs { regular, bold: heavy } => {
                let font = if bold { heavy } else { regular };
                text.chars().map(|c| font.metrics(c, px).advance_width).sum()
            }
            Self::Estimate => text.chars().count() as f32 * px * 0.6,
        }
    }
}

// =============================================================================
// Options
// =============================================================================

#[derive(Debug, Clone)]
pub struct ExportOptions {
    width: u32,
    height: u32,
    pixel_ratio: f32,
    caption_height: Option<f32>,
    edge_margin: Option<f32>,
    background: String,
    watermark: [String; 2],
    font_files: Vec<Vec<u8>>,
    seed: Option<u64>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: 2560,
            height: 1600,
            pixel_ratio: 2.0,
            caption_height: None,
            edge_margin: None,
            background: "#FFFFFF".into(),
            watermark: [
                "Westminster Word Cloud".into(),
                "Words from the Commons".into(),
            ],
            font_files: Vec::new(),
            seed: None,
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(320);
        self.height = height.max(240);
        self
    }

    pub fn pixel_ratio(mut self, ratio: f32) -> Self {
        self.pixel_ratio = if ratio.is_finite() {
            ratio.clamp(0.25, 4.0)
        } else {
            2.0
        };
        self
    }

    pub fn caption_height(mut self, height: f32) -> Self {
        self.caption_height = Some(height.max(0.0));
        self
    }

    pub fn edge_margin(mut self, margin: f32) -> Self {
        self.edge_margin = Some(margin.max(0.0));
        self
    }

    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background = color.into();
        self
    }

    pub fn watermark(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.watermark = [first.into(), second.into()];
        self
    }

    /// Adds a font file. Files given here replace the system font; pass a
    /// family's regular and bold cuts to get bold words.
    pub fn font(mut self, font_data: Vec<u8>) -> Self {
        self.font_files.push(font_data);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Canvas-to-base ratio used for caption and watermark sizing.
    fn unit(&self) -> f32 {
        self.width as f32 / BASE_WIDTH
    }

    pub fn caption_band(&self) -> f32 {
        self.caption_height
            .unwrap_or(self.height as f32 * 11.0 / 80.0)
            .min(self.height as f32 / 2.0)
    }

    pub fn margin(&self) -> f32 {
        self.edge_margin.unwrap_or(self.width as f32 / 32.0)
    }

    pub fn cloud_height(&self) -> f32 {
        self.height as f32 - self.caption_band()
    }

    /// Export font sizes relative to the interactive reference width.
    pub fn font_scale_factor(&self) -> f32 {
        self.width as f32 / REFERENCE_WIDTH
    }
}

// =============================================================================
// Renderer
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ExportRenderer {
    options: ExportOptions,
}

impl ExportRenderer {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Placement profile for the cloud area above the caption band.
    pub fn profile(&self) -> LayoutProfile {
        LayoutProfile::export(
            self.options.width as f32,
            self.options.cloud_height(),
            self.options.margin(),
            self.options.font_scale_factor(),
        )
    }

    /// Export placement with the per-character width estimate.
    pub fn layout<R: Rng + ?Sized>(&self, items: &[WordItem], rng: &mut R) -> Result<LayoutOutcome> {
        layout(items, &self.profile(), rng)
    }

    /// Export placement with box widths from `font`'s glyph advances, in the
    /// weight each word will be drawn with.
    pub fn layout_with_font<R: Rng + ?Sized>(
        &self,
        items: &[WordItem],
        font: &FontAsset,
        rng: &mut R,
    ) -> Result<LayoutOutcome> {
        let measure = font.measure()?;
        self.measured_layout(items, &measure, rng)
    }

    /// Renders with the configured font, or a system font when none is set.
    /// Failures are logged and give `None`.
    pub fn render(&self, items: &[WordItem], caption: &Caption) -> Option<Vec<u8>> {
        match self.resolve_font() {
            Ok(font) => self.render_with_font(&font, items, caption),
            Err(e) => {
                warn!("export skipped, font unavailable: {}", e);
                None
            }
        }
    }

    /// Waits for `fonts_ready` once, then renders. No retry on failure.
    pub async fn render_when_ready<F>(
        &self,
        fonts_ready: F,
        items: &[WordItem],
        caption: &Caption,
    ) -> Option<Vec<u8>>
    where
        F: Future<Output = Result<FontAsset>>,
    {
        match fonts_ready.await {
            Ok(font) => self.render_with_font(&font, items, caption),
            Err(e) => {
                warn!("export skipped, fonts never became ready: {}", e);
                None
            }
        }
    }

    pub fn render_with_font(
        &self,
        font: &FontAsset,
        items: &[WordItem],
        caption: &Caption,
    ) -> Option<Vec<u8>> {
        match self.try_render(font, items, caption) {
            Ok(png) => {
                info!(
                    "exported {}x{} cloud for {:?} ({} bytes)",
                    self.options.width,
                    self.options.height,
                    caption.name,
                    png.len()
                );
                Some(png)
            }
            Err(e) => {
                warn!("export failed: {}", e);
                None
            }
        }
    }

    /// Renders and writes `Cloud-<Name>.png` into `dir`.
    pub fn save_png(&self, dir: &Path, items: &[WordItem], caption: &Caption) -> Option<PathBuf> {
        let png = self.render(items, caption)?;
        let path = dir.join(export_filename(&caption.name));
        match std::fs::write(&path, png) {
            Ok(()) => Some(path),
            Err(e) => {
                warn!("could not write {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Complete export document as SVG. Without a font, caption spacing
    /// uses the layout's width estimate.
    pub fn to_svg(&self, outcome: &LayoutOutcome, caption: &Caption, font: Option<&FontAsset>) -> String {
        let measure = font
            .and_then(|f| f.measure().ok())
            .unwrap_or(TextMeasure::Estimate);
        let family = font.map(|f| f.family.as_str()).unwrap_or("sans-serif");
        self.compose_svg(outcome, caption, family, &measure)
    }

    pub fn caption_layout(&self, caption: &Caption, font: Option<&FontAsset>) -> CaptionLayout {
        let measure = font
            .and_then(|f| f.measure().ok())
            .unwrap_or(TextMeasure::Estimate);
        self.layout_caption(caption, &measure)
    }

    fn resolve_font(&self) -> Result<FontAsset> {
        if self.options.font_files.is_empty() {
            FontAsset::system()
        } else {
            FontAsset::from_sources(self.options.font_files.iter().cloned())
        }
    }

    fn measured_layout<R: Rng + ?Sized>(
        &self,
        items: &[WordItem],
        measure: &TextMeasure,
        rng: &mut R,
    ) -> Result<LayoutOutcome> {
        layout_measured(items, &self.profile(), rng, |text, font_size, significance| {
            measure.width(text, font_size, significance > BOLD_SIGNIFICANCE)
        })
    }

    fn try_render(&self, font: &FontAsset, items: &[WordItem], caption: &Caption) -> Result<Vec<u8>> {
        if !font.has_bold() {
            debug!("{:?} has no bold face, bold text renders at regular weight", font.family);
        }
        let measure = font.measure()?;
        let mut rng = seeded_rng(self.options.seed);
        let outcome = self.measured_layout(items, &measure, &mut rng)?;
        debug!(
            "export layout placed {} words, dropped {}",
            outcome.placed.len(),
            outcome.dropped
        );

        let svg = self.compose_svg(&outcome, caption, &font.family, &measure);
        self.rasterize(&svg, font)
    }

    fn layout_caption(&self, caption: &Caption, measure: &TextMeasure) -> CaptionLayout {
        let unit = self.options.unit();
        let separator_y = self.options.cloud_height() + 8.0 * unit;
        let center_y = separator_y + (self.options.height as f32 - separator_y) / 2.0;

        let name_x = self.options.margin();
        let name_size = 64.0 * unit;
        let badge_text_size = 32.0 * unit;
        let sub_label_size = 36.0 * unit;
        let name_end = name_x + measure.width(&caption.name, name_size, true);

        let badge = (!caption.category_label.trim().is_empty()).then(|| {
            let width = measure.width(&caption.category_label, badge_text_size, true) + 56.0 * unit;
            let height = 64.0 * unit;
            Rect::new(name_end + 32.0 * unit, center_y - height / 2.0, width, height)
        });

        let sub_label_x = match badge {
            Some(rect) => rect.right() + 24.0 * unit,
            None => name_end + 32.0 * unit,
        };

        CaptionLayout {
            separator_y,
            center_y,
            name_x,
            name_size,
            badge,
            badge_text_size,
            sub_label_x,
            sub_label_size,
        }
    }

    fn compose_svg(
        &self,
        outcome: &LayoutOutcome,
        caption: &Caption,
        family: &str,
        measure: &TextMeasure,
    ) -> String {
        let width = self.options.width;
        let height = self.options.height;
        let unit = self.options.unit();
        let mut svg = String::with_capacity(8192);

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            width, height, width, height
        ));
        svg.push_str(&format!(
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            escape_xml(&self.options.background)
        ));
        svg.push_str(&format!(
            r#"<style>text{{font-family:'{}',sans-serif}}</style>"#,
            escape_xml(family)
        ));

        // words, centre-anchored
        svg.push_str(r#"<g id="cloud">"#);
        if let Some(range) = outcome.range {
            for word in &outcome.placed {
                let (cx, cy) = word.center();
                let weight = if range.significance(word.value) > BOLD_SIGNIFICANCE {
                    r#" font-weight="bold""#
                } else {
                    ""
                };
                svg.push_str(&format!(
                    r#"<text x="{:.1}" y="{:.1}" fill="{}" font-size="{:.1}" text-anchor="middle" dominant-baseline="central"{}>{}</text>"#,
                    cx,
                    cy,
                    escape_xml(word.color.as_deref().unwrap_or("#000000")),
                    word.font_size,
                    weight,
                    escape_xml(&word.text)
                ));
            }
        }
        svg.push_str("</g>");

        // caption band
        let cap = self.layout_caption(caption, measure);
        svg.push_str(&format!(
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#E5E7EB" stroke-width="{:.1}"/>"##,
            self.options.margin(),
            cap.separator_y,
            width as f32 - self.options.margin(),
            cap.separator_y,
            2.0 * unit
        ));
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" fill="#111827" font-size="{:.1}" font-weight="bold" dominant-baseline="central">{}</text>"##,
            cap.name_x,
            cap.center_y,
            cap.name_size,
            escape_xml(&caption.name)
        ));
        if let Some(badge) = cap.badge {
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="{:.1}" fill="{}"/>"#,
                badge.x,
                badge.y,
                badge.width,
                badge.height,
                badge.height / 2.0,
                escape_xml(&caption.resolved_badge_color())
            ));
            let (bx, by) = badge.center();
            svg.push_str(&format!(
                r##"<text x="{:.1}" y="{:.1}" fill="#FFFFFF" font-size="{:.1}" font-weight="bold" text-anchor="middle" dominant-baseline="central">{}</text>"##,
                bx,
                by,
                cap.badge_text_size,
                escape_xml(&caption.category_label)
            ));
        }
        if !caption.sub_label.is_empty() {
            svg.push_str(&format!(
                r##"<text x="{:.1}" y="{:.1}" fill="#6B7280" font-size="{:.1}" dominant-baseline="central">{}</text>"##,
                cap.sub_label_x,
                cap.center_y,
                cap.sub_label_size,
                escape_xml(&caption.sub_label)
            ));
        }

        // watermark, pinned top-right
        let right = width as f32 - 48.0 * unit;
        svg.push_str(r##"<g id="watermark" fill="#000000" fill-opacity="0.25" font-weight="bold" text-anchor="end">"##);
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.1}">{}</text>"#,
            right,
            72.0 * unit,
            44.0 * unit,
            escape_xml(&self.options.watermark[0])
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.1}">{}</text>"#,
            right,
            120.0 * unit,
            30.0 * unit,
            escape_xml(&self.options.watermark[1])
        ));
        svg.push_str("</g>");

        svg.push_str("</svg>");
        svg
    }

    fn rasterize(&self, svg: &str, font: &FontAsset) -> Result<Vec<u8>> {
        let options = usvg::Options {
            font_family: font.family.clone(),
            fontdb: Arc::new(font.database()),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &options).map_err(|e| Error::Svg(e.to_string()))?;

        let ratio = self.options.pixel_ratio;
        let out_width = (self.options.width as f32 * ratio).round().max(1.0) as u32;
        let out_height = (self.options.height as f32 * ratio).round().max(1.0) as u32;

        let mut pixmap = Pixmap::new(out_width, out_height)
            .ok_or_else(|| Error::Render(format!("could not allocate {out_width}x{out_height} canvas")))?;
        pixmap.fill(parse_hex_color(&self.options.background).unwrap_or(tiny_skia::Color::WHITE));

        resvg::render(&tree, Transform::from_scale(ratio, ratio), &mut pixmap.as_mut());
        pixmap.encode_png().map_err(|e| Error::Render(e.to_string()))
    }
}

/// `Cloud-<Title-Cased-Name>.png`, keeping only letters and digits.
pub fn export_filename(name: &str) -> String {
    let words: Vec<String> = name
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        "Cloud-Untitled.png".to_string()
    } else {
        format!("Cloud-{}.png", words.join("-"))
    }
}

fn parse_hex_color(hex: &str) -> Option<tiny_skia::Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(tiny_skia::Color::from_rgba8(r, g, b, 255))
    } else {
        None
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
