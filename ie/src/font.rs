//! Label font.
//!
//! Ruler numbers are drawn with a single TrueType/OpenType face loaded from
//! disk. There is no fallback face: a missing or unreadable file is an error.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};

use crate::{Color, OwnedImage};

/// Where the label font ships, relative to an assets root (the workspace
/// checkout or the folder next to the executable).
pub const BUNDLED_FONT: &str = "fonts/dejavu/DejaVuSans.ttf";

pub struct LabelFont {
    font: FontVec,
}

impl LabelFont {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("read font {}", path.display()))?;
        let font = FontVec::try_from_vec(bytes).with_context(|| format!("parse font {}", path.display()))?;
        Ok(Self { font })
    }

    /// Rendered `(width, height)` of `text` at `px` pixels.
    pub fn text_size(&self, px: f32, text: &str) -> (u32, u32) {
        imageproc::drawing::text_size(PxScale::from(px), &self.font, text)
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw(&self, image: &mut OwnedImage, color: Color, x: i32, y: i32, px: f32, text: &str) {
        imageproc::drawing::draw_text_mut(
            image.canvas_mut(),
            color.into(),
            x,
            y,
            PxScale::from(px),
            &self.font,
            text,
        );
    }
}

/// The font bundled with the workspace, for tests that draw labels.
#[cfg(test)]
pub(crate) fn bundled_font() -> LabelFont {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(BUNDLED_FONT);
    LabelFont::load(&path).expect("bundled label font")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_is_an_error() {
        let err = LabelFont::load("/nonexistent/DejaVuSans.ttf").err().expect("load must fail");
        assert!(format!("{err:#}").contains("read font"));
    }

    #[test]
    fn garbage_font_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(LabelFont::load(&path).is_err());
    }

    #[test]
    fn wider_text_measures_wider() {
        let font = bundled_font();
        let (w1, h1) = font.text_size(26.0, "1");
        let (w2, _) = font.text_size(26.0, "10");
        assert!(w1 > 0 && h1 > 0);
        assert!(w2 > w1);
    }
}
