//! Image primitives and utilities.
//!
//! Cards and icons are drawn on an owned RGBA image (`OwnedImage`). Drawing goes
//! through `imageproc` on the inner `RgbaImage`, the print-size resample uses
//! `fast_image_resize`, and PNG output can carry a physical DPI.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

/// Owned RGBA image.
#[derive(Clone, Debug)]
pub struct OwnedImage {
    buf: image::RgbaImage,
}

impl OwnedImage {
    /// Create a `width` x `height` image filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        Self {
            buf: image::RgbaImage::from_pixel(width, height, fill.into()),
        }
    }

    /// Decode an image file (any format `image` understands) into RGBA.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let buf = image::open(path)
            .with_context(|| format!("decode image {}", path.display()))?
            .to_rgba8();
        Ok(Self { buf })
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        (*self.buf.get_pixel(x, y)).into()
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.buf.pixels().map(|p| (*p).into())
    }

    /// Pixels with their coordinates, row-major.
    pub fn enumerate_pixels(&self) -> impl Iterator<Item = (u32, u32, Color)> + '_ {
        self.buf.enumerate_pixels().map(|(x, y, p)| (x, y, (*p).into()))
    }

    /// Drawing target for `imageproc`.
    pub(crate) fn canvas_mut(&mut self) -> &mut image::RgbaImage {
        &mut self.buf
    }

    /// Resample this image to exactly `width` x `height` (aspect ratio is not kept).
    ///
    /// Uses `fast_image_resize` with a Lanczos3 convolution.
    pub fn resize_exact(&mut self, width: u32, height: u32) -> Result<()> {
        if self.width() == width && self.height() == height {
            return Ok(());
        }

        let src = fast_image_resize::images::ImageRef::new(
            self.width(),
            self.height(),
            self.buf.as_raw(),
            fast_image_resize::PixelType::U8x4,
        )
        .context("fast_image_resize: ImageRef::new failed")?;

        let mut dst = fast_image_resize::images::Image::new(width, height, fast_image_resize::PixelType::U8x4);

        let mut resizer = fast_image_resize::Resizer::new();
        let options = fast_image_resize::ResizeOptions::new().resize_alg(
            fast_image_resize::ResizeAlg::Convolution(fast_image_resize::FilterType::Lanczos3),
        );

        resizer
            .resize(&src, &mut dst, &Some(options))
            .context("fast_image_resize: resize failed")?;

        self.buf = image::RgbaImage::from_raw(width, height, dst.into_vec())
            .context("RgbaImage::from_raw failed after resize")?;
        Ok(())
    }

    /// Save as an RGBA PNG. With `dpi` set, the physical pixel density is
    /// written to the pHYs chunk so print tools size the image correctly.
    pub fn save_png(&self, path: impl AsRef<Path>, dpi: Option<u32>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;

        let mut enc = png::Encoder::new(BufWriter::new(file), self.width(), self.height());
        enc.set_color(png::ColorType::Rgba);
        enc.set_depth(png::BitDepth::Eight);
        if let Some(dpi) = dpi {
            let ppm = crate::util::dots_per_meter(dpi);
            enc.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));
        }

        let mut writer = enc
            .write_header()
            .with_context(|| format!("write png header {}", path.display()))?;
        writer
            .write_image_data(self.buf.as_raw())
            .with_context(|| format!("write png data {}", path.display()))?;
        writer
            .finish()
            .with_context(|| format!("finish png {}", path.display()))?;
        Ok(())
    }
}

// ----------

/// RGBA color. Serialized as `#rrggbb`, or `#rrggbbaa` when not opaque.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(s.get(i..i + 2)?, 16).ok();
        match s.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl serde::Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).ok_or_else(|| serde::de::Error::custom(format!("invalid color {hex:?}, expected #rrggbb or #rrggbbaa")))
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(c: Color) -> Self {
        image::Rgba([c.r, c.g, c.b, c.a])
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(p: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = p.0;
        Self { r, g, b, a }
    }
}
