use crate::Color;

/// Colors used for everything burned into cards and icons.
///
/// Stored in the app config so a print shop can retune the ruler ink without
/// a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Theme {
    /// Ruler tick marks.
    pub tick: Color,
    /// Ruler numbers.
    pub label: Color,
    /// Fire-arc pie slices.
    pub arc_fill: Color,
    /// Fire-arc circle border and heading arrow.
    pub outline: Color,
}

impl Theme {
    pub const PRINT: Self = Self {
        tick: Color::rgb(0x57, 0x13, 0x14),
        label: Color::BLACK,
        arc_fill: Color::new(139, 0, 0, 200),
        outline: Color::BLACK,
    };
}

impl Default for Theme {
    fn default() -> Self {
        Self::PRINT
    }
}
