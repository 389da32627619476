//! Fire-arc icons.
//!
//! A weapon's firing sectors are typed by hand ("Fore, Port"). The text is
//! normalized into a [`NormalizedKey`] that names the icon file, and the same
//! function is used when the icons are generated and when cards look them up,
//! so both sides agree on file names however the sectors were written.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use imageproc::point::Point;

use crate::{Color, OwnedImage, Theme};

/// Width of the compass part of an icon.
pub const ICON_BASE_WIDTH: u32 = 100;
/// Extra space at the left for the heading arrow.
pub const ICON_ARROW_WIDTH: u32 = 50;
pub const ICON_WIDTH: u32 = ICON_BASE_WIDTH + ICON_ARROW_WIDTH;
pub const ICON_HEIGHT: u32 = 85;

pub const ICON_CENTER: (i32, i32) = ((ICON_BASE_WIDTH / 2 + ICON_ARROW_WIDTH) as i32, (ICON_HEIGHT / 2) as i32);
pub const ICON_RADIUS: i32 = 40;

/// Heading arrow: tip, upper base, lower base.
const ARROW: [(i32, i32); 3] = [(10, 50), (40, 40), (40, 60)];

/// Sector combinations used by the card templates.
pub const ICON_COMBINATIONS: [&str; 11] = [
    "Fore",
    "Fore, Port",
    "Fore, Port, Starboard",
    "Fore, Starboard",
    "Port",
    "Fore, Aft, Port, Starboard",
    "Aft",
    "Aft, Port",
    "Aft, Port, Starboard",
    "Aft, Starboard",
    "Starboard",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FireSector {
    Fore,
    Port,
    Aft,
    Starboard,
}

impl FireSector {
    pub const ALL: [Self; 4] = [Self::Fore, Self::Port, Self::Aft, Self::Starboard];

    /// Case- and whitespace-insensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|s| s.name().eq_ignore_ascii_case(name))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fore => "Fore",
            Self::Port => "Port",
            Self::Aft => "Aft",
            Self::Starboard => "Starboard",
        }
    }

    /// Angular range in degrees, clockwise from +x in image space (y down).
    ///
    /// Starboard wraps through 0.
    pub fn angles(&self) -> (f64, f64) {
        match self {
            Self::Fore => (45.0, 135.0),
            Self::Port => (135.0, 225.0),
            Self::Aft => (225.0, 315.0),
            Self::Starboard => (315.0, 45.0),
        }
    }

    /// [`Self::angles`] with the end unwrapped so that `start < end`.
    pub fn sweep(&self) -> (f64, f64) {
        let (start, end) = self.angles();
        if end <= start { (start, end + 360.0) } else { (start, end) }
    }
}

impl fmt::Display for FireSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of active sectors for one weapon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FireSectorSet(BTreeSet<FireSector>);

impl FireSectorSet {
    /// Parse a comma separated list. Unknown names are skipped.
    pub fn parse(raw: &str) -> Self {
        let mut set = Self::default();
        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match FireSector::from_name(token) {
                Some(sector) => {
                    set.0.insert(sector);
                }
                None => log::debug!("skipping unknown fire sector {token:?}"),
            }
        }
        set
    }

    pub fn contains(&self, sector: FireSector) -> bool {
        self.0.contains(&sector)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FireSector> + '_ {
        self.0.iter().copied()
    }
}

/// Canonical, order- and case-independent name of a sector combination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Icon file name for this key.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.0)
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split on commas, trim, lowercase, sort, de-duplicate and join with `_`.
///
/// Returns `None` when nothing but whitespace and commas is given.
pub fn normalize(raw: &str) -> Option<NormalizedKey> {
    let parts = raw
        .split(',')
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect::<BTreeSet<_>>();
    if parts.is_empty() {
        return None;
    }
    Some(NormalizedKey(parts.into_iter().collect::<Vec<_>>().join("_")))
}

/// Rasterize the icon for `sectors`: one pie slice per sector over a compass
/// circle, plus the heading arrow. The background is transparent.
pub fn render_icon(sectors: &FireSectorSet, theme: &Theme) -> OwnedImage {
    let mut img = OwnedImage::new(ICON_WIDTH, ICON_HEIGHT, Color::TRANSPARENT);

    for sector in sectors.iter() {
        let (start, end) = sector.sweep();
        let slice = pie_slice(ICON_CENTER, ICON_RADIUS, start, end);
        imageproc::drawing::draw_polygon_mut(img.canvas_mut(), &slice, theme.arc_fill.into());
    }

    // Border goes on top of the fills.
    imageproc::drawing::draw_hollow_circle_mut(img.canvas_mut(), ICON_CENTER, ICON_RADIUS, theme.outline.into());

    let arrow = ARROW.map(|(x, y)| Point::new(x, y));
    imageproc::drawing::draw_polygon_mut(img.canvas_mut(), &arrow, theme.outline.into());

    img
}

/// Polygon for a filled pie slice, arc sampled once per degree.
fn pie_slice(center: (i32, i32), radius: i32, start: f64, end: f64) -> Vec<Point<i32>> {
    let (cx, cy) = (center.0 as f64, center.1 as f64);
    let r = radius as f64;
    let steps = ((end - start).ceil() as usize).max(1);

    let mut points = Vec::with_capacity(steps + 2);
    points.push(Point::new(center.0, center.1));
    for i in 0..=steps {
        let a = (start + (end - start) * i as f64 / steps as f64).to_radians();
        points.push(Point::new(
            (cx + r * a.cos()).round() as i32,
            (cy + r * a.sin()).round() as i32,
        ));
    }
    points.dedup();
    points
}

/// Directory of pre-rendered icons, one `{key}.png` per [`NormalizedKey`].
#[derive(Debug, Clone)]
pub struct IconLibrary {
    dir: PathBuf,
}

impl IconLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &NormalizedKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Find the icon for a raw fire-arc string.
    ///
    /// Empty input has no icon. A missing file is logged and treated the same
    /// way so a card still renders without it.
    pub fn lookup(&self, raw: &str) -> Option<PathBuf> {
        let key = normalize(raw)?;
        let path = self.path_for(&key);
        if path.is_file() {
            Some(path)
        } else {
            log::warn!("fire arc image {} not found for {raw:?}", path.display());
            None
        }
    }

    /// Render and save an icon for every combination, creating the directory
    /// if needed. Returns the written paths.
    pub fn generate(&self, combinations: &[&str], theme: &Theme) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.dir).with_context(|| format!("create icon dir {}", self.dir.display()))?;

        let mut written = Vec::with_capacity(combinations.len());
        for raw in combinations {
            let Some(key) = normalize(raw) else {
                log::debug!("skipping empty fire arc combination");
                continue;
            };
            let path = self.path_for(&key);
            render_icon(&FireSectorSet::parse(raw), theme)
                .save_png(&path, None)
                .with_context(|| format!("save fire arc icon for {raw:?}"))?;
            log::info!("created {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}
