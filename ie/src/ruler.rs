//! Ruler overlay for printed ship cards.
//!
//! Tick geometry comes from physical millimetres at the print DPI and is laid
//! out against the screenshot as captured. Only afterwards is the card
//! resampled to the exact print size (see [`Ruler::finish_card`]); resizing
//! first would change the apparent tick density.

use std::path::Path;

use anyhow::{Context, Result};
use imageproc::rect::Rect;

use crate::util::{mm_to_px, PRINT_DPI};
use crate::{Color, LabelFont, OwnedImage, Theme};

/// Finished card size at 300 DPI (14 cm x 10.9 cm).
pub const TARGET_WIDTH: u32 = 1654;
pub const TARGET_HEIGHT: u32 = 1289;

pub const BOTTOM_LINE_COUNT: u32 = 10;

const TOP_STROKE: u32 = 3;
const BOTTOM_STROKE: u32 = 2;

const LEFT_MARGIN_MM: f64 = 5.0;
const TICK_HEIGHT_MM: f64 = 3.0;
const TICK_SPACING_MM: f64 = 10.0;
const LABEL_GAP_MM: f64 = 2.0;
const LABEL_SIZE_MM: f64 = 2.25;

/// Ruler measurements in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerGeometry {
    pub left_margin: f64,
    pub tick_height: f64,
    pub tick_spacing: f64,
    pub label_gap: f64,
    /// Label height in whole pixels. Truncated, not rounded: 2.25 mm at
    /// 300 DPI is 26.57 px and cards have always been printed with 26.
    pub label_px: f32,
}

impl RulerGeometry {
    pub fn at_dpi(dpi: u32) -> Self {
        Self {
            left_margin: mm_to_px(LEFT_MARGIN_MM, dpi),
            tick_height: mm_to_px(TICK_HEIGHT_MM, dpi),
            tick_spacing: mm_to_px(TICK_SPACING_MM, dpi),
            label_gap: mm_to_px(LABEL_GAP_MM, dpi),
            label_px: mm_to_px(LABEL_SIZE_MM, dpi).trunc() as f32,
        }
    }

    #[inline]
    pub fn tick_x(&self, index: u32) -> f64 {
        self.left_margin + index as f64 * self.tick_spacing
    }
}

impl Default for RulerGeometry {
    fn default() -> Self {
        Self::at_dpi(PRINT_DPI)
    }
}

/// What to draw for one ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulerSpec {
    pub top_line_count: u32,
}

impl RulerSpec {
    pub fn new(top_line_count: u32) -> Self {
        Self { top_line_count }
    }

    /// 10, 20, ... one per top tick.
    pub fn top_labels(&self) -> Vec<u32> {
        (1..=self.top_line_count).map(|i| i * 10).collect()
    }

    pub fn bottom_labels(&self) -> Vec<u32> {
        (0..BOTTOM_LINE_COUNT).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// One tick mark and its number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub edge: Edge,
    pub x: f64,
    pub y_start: f64,
    pub y_end: f64,
    pub stroke: u32,
    pub label: u32,
}

/// All ticks for `spec` on an image `image_height` pixels tall: the top ruler
/// left to right, then the bottom ruler left to right.
pub fn layout(spec: &RulerSpec, geometry: &RulerGeometry, image_height: u32) -> Vec<Tick> {
    let top = spec.top_labels().into_iter().enumerate().map(|(i, label)| Tick {
        edge: Edge::Top,
        x: geometry.tick_x(i as u32),
        y_start: 0.0,
        y_end: geometry.tick_height,
        stroke: TOP_STROKE,
        label,
    });

    let bottom_start = image_height as f64 - geometry.tick_height;
    let bottom = spec.bottom_labels().into_iter().enumerate().map(|(i, label)| Tick {
        edge: Edge::Bottom,
        x: geometry.tick_x(i as u32),
        y_start: bottom_start,
        y_end: image_height as f64,
        stroke: BOTTOM_STROKE,
        label,
    });

    top.chain(bottom).collect()
}

/// Vertical bar `stroke` pixels wide centered on the tick, both ends included.
fn draw_tick(image: &mut OwnedImage, tick: &Tick, color: Color) {
    let left = (tick.x - tick.stroke as f64 / 2.0).round() as i32;
    let top = tick.y_start.round() as i32;
    let bottom = tick.y_end.round() as i32;
    let height = (bottom - top + 1).max(1) as u32;
    imageproc::drawing::draw_filled_rect_mut(
        image.canvas_mut(),
        Rect::at(left, top).of_size(tick.stroke, height),
        color.into(),
    );
}

/// Print format for finished cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintFormat {
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
}

impl Default for PrintFormat {
    fn default() -> Self {
        Self {
            width: TARGET_WIDTH,
            height: TARGET_HEIGHT,
            dpi: PRINT_DPI,
        }
    }
}

pub struct Ruler<'a> {
    font: &'a LabelFont,
    geometry: RulerGeometry,
    theme: Theme,
}

impl<'a> Ruler<'a> {
    pub fn new(font: &'a LabelFont, dpi: u32, theme: Theme) -> Self {
        Self {
            font,
            geometry: RulerGeometry::at_dpi(dpi),
            theme,
        }
    }

    pub fn geometry(&self) -> &RulerGeometry {
        &self.geometry
    }

    /// Draw both rulers onto `image` at its current size and return the ticks drawn.
    pub fn apply(&self, image: &mut OwnedImage, spec: &RulerSpec) -> Vec<Tick> {
        let ticks = layout(spec, &self.geometry, image.height());
        for tick in &ticks {
            draw_tick(image, tick, self.theme.tick);
            self.draw_label(image, tick);
        }
        ticks
    }

    /// Number centered on the tick: below it on the top ruler, above it on the bottom one.
    fn draw_label(&self, image: &mut OwnedImage, tick: &Tick) {
        let px = self.geometry.label_px;
        let text = tick.label.to_string();
        let (w, h) = self.font.text_size(px, &text);
        let x = tick.x - w as f64 / 2.0;
        let y = match tick.edge {
            Edge::Top => tick.y_end + self.geometry.label_gap,
            Edge::Bottom => tick.y_start - h as f64 - self.geometry.label_gap,
        };
        self.font
            .draw(image, self.theme.label, x.round() as i32, y.round() as i32, px, &text);
    }

    /// Draw the rulers, resample to the print size and save with DPI metadata.
    pub fn finish_card(
        &self,
        mut image: OwnedImage,
        spec: &RulerSpec,
        format: &PrintFormat,
        path: impl AsRef<Path>,
    ) -> Result<OwnedImage> {
        let path = path.as_ref();
        self.apply(&mut image, spec);
        image
            .resize_exact(format.width, format.height)
            .with_context(|| format!("resample card to {}x{}", format.width, format.height))?;
        image.save_png(path, Some(format.dpi))?;
        log::debug!(
            "saved {} ({} top ticks, {}x{} @ {} dpi)",
            path.display(),
            spec.top_line_count,
            format.width,
            format.height,
            format.dpi
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(ticks: &[Tick], edge: Edge) -> Vec<u32> {
        ticks.iter().filter(|t| t.edge == edge).map(|t| t.label).collect()
    }

    #[test]
    fn geometry_at_print_dpi() {
        let g = RulerGeometry::default();
        assert!((g.left_margin - 59.055).abs() < 1e-2);
        assert!((g.tick_height - 35.433).abs() < 1e-2);
        assert!((g.tick_spacing - 118.11).abs() < 1e-2);
        assert!((g.label_gap - 23.622).abs() < 1e-2);
        assert_eq!(g.label_px, 26.0);
    }

    #[test]
    fn seven_top_ticks_for_hull_seven() {
        let spec = RulerSpec::new(7);
        assert_eq!(spec.top_labels(), vec![10, 20, 30, 40, 50, 60, 70]);

        let ticks = layout(&spec, &RulerGeometry::default(), 1288);
        assert_eq!(labels(&ticks, Edge::Top), spec.top_labels());
        assert_eq!(labels(&ticks, Edge::Bottom), (0..10).collect::<Vec<_>>());

        let top = ticks.iter().filter(|t| t.edge == Edge::Top).collect::<Vec<_>>();
        assert!(top.windows(2).all(|w| w[0].x < w[1].x));
        assert!(top.iter().all(|t| t.y_start == 0.0 && t.stroke == 3));
    }

    #[test]
    fn zero_top_ticks_keeps_bottom_ruler() {
        let ticks = layout(&RulerSpec::new(0), &RulerGeometry::default(), 1288);
        assert!(labels(&ticks, Edge::Top).is_empty());
        assert_eq!(ticks.len(), BOTTOM_LINE_COUNT as usize);
        let g = RulerGeometry::default();
        for tick in &ticks {
            assert_eq!(tick.y_end, 1288.0);
            assert!((tick.y_start - (1288.0 - g.tick_height)).abs() < 1e-9);
            assert_eq!(tick.stroke, 2);
        }
    }

    #[test]
    fn top_and_bottom_share_x_positions() {
        let ticks = layout(&RulerSpec::new(10), &RulerGeometry::default(), 500);
        let (top, bottom): (Vec<&Tick>, Vec<&Tick>) = ticks.iter().partition(|t| t.edge == Edge::Top);
        for (t, b) in top.iter().zip(&bottom) {
            assert_eq!(t.x, b.x);
        }
    }

    #[test]
    fn ticks_are_burned_at_their_positions() {
        let mut img = OwnedImage::new(800, 600, Color::WHITE);
        let ticks = layout(&RulerSpec::new(2), &RulerGeometry::default(), img.height());
        for tick in &ticks {
            draw_tick(&mut img, tick, Theme::PRINT.tick);
        }

        // First top tick: x ~ 59, rows 0..=35.
        assert_eq!(img.pixel(59, 0), Theme::PRINT.tick);
        assert_eq!(img.pixel(59, 35), Theme::PRINT.tick);
        assert_eq!(img.pixel(59, 40), Color::WHITE);
        // Second top tick at ~177, no third one at ~295.
        assert_eq!(img.pixel(177, 10), Theme::PRINT.tick);
        assert_eq!(img.pixel(295, 10), Color::WHITE);
        // Bottom ruler reaches the last row, ten ticks wide.
        assert_eq!(img.pixel(59, 599), Theme::PRINT.tick);
        assert_eq!(img.pixel(295, 599), Theme::PRINT.tick);
        assert_eq!(img.pixel(59, 550), Color::WHITE);
    }

    #[test]
    fn finished_card_has_print_size_and_dpi() {
        let font = crate::font::bundled_font();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.png");

        let ruler = Ruler::new(&font, PRINT_DPI, Theme::PRINT);
        let shot = OwnedImage::new(1653, 1288, Color::WHITE);
        let card = ruler
            .finish_card(shot, &RulerSpec::new(7), &PrintFormat::default(), &path)
            .unwrap();
        assert_eq!((card.width(), card.height()), (TARGET_WIDTH, TARGET_HEIGHT));

        let saved = OwnedImage::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (TARGET_WIDTH, TARGET_HEIGHT));
        let file = std::io::BufReader::new(std::fs::File::open(&path).unwrap());
        let reader = png::Decoder::new(file).read_info().unwrap();
        assert_eq!(reader.info().pixel_dims.map(|d| d.xppu), Some(11811));
    }

    #[test]
    fn labels_land_next_to_their_ticks() {
        let font = crate::font::bundled_font();
        let ruler = Ruler::new(&font, PRINT_DPI, Theme::PRINT);
        let mut img = OwnedImage::new(600, 400, Color::WHITE);
        let ticks = ruler.apply(&mut img, &RulerSpec::new(1));
        assert_eq!(ticks.len(), 11);

        let g = ruler.geometry();
        let ink = |x0: u32, x1: u32, y0: u32, y1: u32| {
            (y0..y1).any(|y| (x0..x1).any(|x| img.pixel(x, y) != Color::WHITE && img.pixel(x, y) != Theme::PRINT.tick))
        };
        // "10" below the first top tick.
        let label_top = (g.tick_height + g.label_gap) as u32;
        assert!(ink(40, 80, label_top, label_top + 30));
        // "0" above the first bottom tick.
        let bottom_start = (400.0 - g.tick_height) as u32;
        assert!(ink(45, 75, bottom_start - 60, bottom_start));
        // Nothing between the two rulers in the middle of the card.
        assert!(!ink(0, 600, 150, 250));
    }

    #[test]
    fn resize_happens_after_drawing() {
        // A 2x wide screenshot: ticks are laid out at screenshot scale, so the
        // first top tick lands at half its screenshot x after the resample.
        let mut img = OwnedImage::new(TARGET_WIDTH * 2, TARGET_HEIGHT, Color::WHITE);
        for tick in layout(&RulerSpec::new(1), &RulerGeometry::default(), img.height()) {
            draw_tick(&mut img, &tick, Color::BLACK);
        }
        img.resize_exact(TARGET_WIDTH, TARGET_HEIGHT).unwrap();
        let dark = |x: u32| img.pixel(x, 10).r < 128;
        assert!(dark(29) || dark(30));
        assert!(!dark(59) && !dark(60));
    }
}
