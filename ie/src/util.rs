//! Physical unit conversion for print output.

/// Print density of finished cards.
pub const PRINT_DPI: u32 = 300;

pub const MM_PER_INCH: f64 = 25.4;

const METERS_PER_INCH: f64 = 0.0254;

#[inline]
pub fn px_per_mm(dpi: u32) -> f64 {
	dpi as f64 / MM_PER_INCH
}

/// Length in millimetres to (fractional) pixels at `dpi`.
#[inline]
pub fn mm_to_px(mm: f64, dpi: u32) -> f64 {
	mm * px_per_mm(dpi)
}

/// PNG pHYs value for `dpi` (pixels per meter, rounded).
#[inline]
pub fn dots_per_meter(dpi: u32) -> u32 {
	(dpi as f64 / METERS_PER_INCH).round() as u32
}
