//! Image engine for printable ship cards: the fire-arc icon rasterizer and the
//! ruler overlay burned into finished card screenshots.

mod image;
pub use self::image::*;
mod theme;
pub use theme::*;
mod font;
pub use font::{LabelFont, BUNDLED_FONT};

pub mod arc;
pub mod ruler;
pub mod util;
