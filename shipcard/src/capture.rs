//! Card rendering collaborators.
//!
//! Laying a card out and screenshotting it happens outside this tool (a
//! browser driven by the card template). [`CardRenderer`] is the seam: it is
//! handed a typed [`Card`] and returns the raw screenshot. A
//! [`RenderSession`] owns the renderer for a whole run and closes it exactly
//! once, also when the run stops early on an error.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::sheet::CardSheet;

/// Where the pictures a card links to live.
#[derive(Debug, Clone)]
pub struct CardAssets {
	pub icons: ie::arc::IconLibrary,
	pub ship_images: PathBuf,
	pub flags: PathBuf,
}

impl CardAssets {
	pub fn new(icon_dir: impl Into<PathBuf>, ship_images: impl Into<PathBuf>, flags: impl Into<PathBuf>) -> Self {
		Self {
			icons: ie::arc::IconLibrary::new(icon_dir),
			ship_images: ship_images.into(),
			flags: flags.into(),
		}
	}

	/// `dir/name` if the cell is filled in and the file exists. A card is
	/// still laid out without the picture.
	fn picture(dir: &Path, name: Option<&str>) -> Option<PathBuf> {
		let name = name.map(str::trim).filter(|n| !n.is_empty())?;
		let path = dir.join(name);
		if path.is_file() {
			Some(path)
		} else {
			tracing::debug!(path = %path.display(), "picture not found; leaving it off the card");
			None
		}
	}
}

/// One weapon line of a card.
#[derive(Debug, Clone)]
pub struct WeaponRow<'a> {
	pub weapon: &'a data::Weapon,
	/// Pre-rendered fire-arc icon, if the weapon has arcs and the icon exists.
	pub fire_arc_icon: Option<PathBuf>,
}

/// Everything a renderer needs to lay out one ship card.
#[derive(Debug, Clone)]
pub struct Card<'a> {
	pub ship: &'a data::Ship,
	pub ship_image: Option<PathBuf>,
	pub flag: Option<PathBuf>,
	pub weapons: Vec<WeaponRow<'a>>,
}

impl<'a> Card<'a> {
	pub fn build(deck: &'a data::Deck, ship: &'a data::Ship, assets: &CardAssets) -> Self {
		let weapons = deck
			.weapons_for(&ship.ship_id)
			.map(|weapon| WeaponRow {
				weapon,
				fire_arc_icon: weapon.fire_arc.as_deref().and_then(|raw| assets.icons.lookup(raw)),
			})
			.collect();
		Self {
			ship,
			ship_image: CardAssets::picture(&assets.ship_images, ship.ship_image.as_deref()),
			flag: CardAssets::picture(&assets.flags, ship.nation.as_deref()),
			weapons,
		}
	}
}

pub trait CardRenderer {
	/// Render `card` and return the screenshot.
	fn render(&mut self, card: &Card<'_>) -> Result<ie::OwnedImage>;

	/// Release the underlying resource (browser, connection, ...).
	fn close(&mut self) -> Result<()> {
		Ok(())
	}
}

/// A renderer held for the duration of one run.
pub struct RenderSession<R: CardRenderer> {
	renderer: R,
	closed: bool,
}

impl<R: CardRenderer> RenderSession<R> {
	pub fn open(renderer: R) -> Self {
		Self { renderer, closed: false }
	}

	pub fn render(&mut self, card: &Card<'_>) -> Result<ie::OwnedImage> {
		self.renderer.render(card)
	}

	/// Close the renderer and report a failure to do so.
	pub fn close(mut self) -> Result<()> {
		self.closed = true;
		self.renderer.close()
	}
}

impl<R: CardRenderer> Drop for RenderSession<R> {
	fn drop(&mut self) {
		if self.closed {
			return;
		}
		self.closed = true;
		if let Err(err) = self.renderer.close() {
			tracing::warn!(error = %err, "failed to close renderer");
		}
	}
}

/// Reads screenshots an external browser run already captured.
///
/// Per ship the directory holds `{stem}.png`, the screenshot, and usually
/// `{stem}.json`, the [`CardSheet`] it was laid out from (see
/// `shipcard sheets`). When the sheet no longer matches the deck the
/// screenshot is still used, with a warning.
#[derive(Debug, Clone)]
pub struct CaptureDirRenderer {
	dir: PathBuf,
}

impl CaptureDirRenderer {
	pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
		let dir = dir.into();
		if !dir.is_dir() {
			bail!("capture directory {} does not exist", dir.display());
		}
		Ok(Self { dir })
	}

	pub fn screenshot_path(&self, ship: &data::Ship) -> PathBuf {
		self.dir.join(format!("{}.png", ship.file_stem()))
	}

	pub fn sheet_path(&self, ship: &data::Ship) -> PathBuf {
		self.dir.join(format!("{}.json", ship.file_stem()))
	}

	/// Whether the screenshot was laid out from the card as it is now.
	/// `None` when no sheet was kept.
	pub fn is_current(&self, card: &Card<'_>) -> Result<Option<bool>> {
		let path = self.sheet_path(card.ship);
		if !path.is_file() {
			return Ok(None);
		}
		Ok(Some(CardSheet::load(&path)? == CardSheet::from(card)))
	}
}

impl CardRenderer for CaptureDirRenderer {
	fn render(&mut self, card: &Card<'_>) -> Result<ie::OwnedImage> {
		let path = self.screenshot_path(card.ship);
		if !path.is_file() {
			bail!("no screenshot for {:?} at {}", card.ship.ship_name, path.display());
		}
		match self.is_current(card)? {
			Some(true) => {}
			Some(false) => tracing::warn!(ship = %card.ship.ship_name, "card data changed since the screenshot was taken; recapture it"),
			None => tracing::debug!(ship = %card.ship.ship_name, "no card sheet kept with the screenshot"),
		}
		tracing::debug!(ship = %card.ship.ship_name, path = %path.display(), "loading screenshot");
		ie::OwnedImage::open(&path)
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use super::*;

	struct CountingRenderer {
		closes: Rc<Cell<u32>>,
	}

	impl CardRenderer for CountingRenderer {
		fn render(&mut self, _card: &Card<'_>) -> Result<ie::OwnedImage> {
			bail!("no browser in tests")
		}

		fn close(&mut self) -> Result<()> {
			self.closes.set(self.closes.get() + 1);
			Ok(())
		}
	}

	fn deck() -> data::Deck {
		serde_json::from_str(
			r#"{
				"ships": [{"ship_id": "1", "ship_name": "HMS Ajax", "hull": "7", "ship_image": "ajax.png", "nation": ""}],
				"weapons": [
					{"ship_id": "1", "weapon_system": "A", "fire_arc": "Port, fore"},
					{"ship_id": "1", "weapon_system": "B", "fire_arc": "Aft"},
					{"ship_id": "1", "weapon_system": "C"}
				]
			}"#,
		)
		.unwrap()
	}

	#[test]
	fn session_closes_once_when_closed_explicitly() {
		let closes = Rc::new(Cell::new(0));
		let session = RenderSession::open(CountingRenderer { closes: closes.clone() });
		session.close().unwrap();
		assert_eq!(closes.get(), 1);
	}

	#[test]
	fn session_closes_on_drop_after_error() {
		let closes = Rc::new(Cell::new(0));
		let deck = deck();
		let assets = CardAssets::new("/nonexistent", "/nonexistent", "/nonexistent");
		{
			let mut session = RenderSession::open(CountingRenderer { closes: closes.clone() });
			let card = Card::build(&deck, &deck.ships[0], &assets);
			assert!(session.render(&card).is_err());
		}
		assert_eq!(closes.get(), 1);
	}

	#[test]
	fn card_resolves_existing_pictures_only() {
		let dir = tempfile::tempdir().unwrap();
		let assets = CardAssets::new(dir.path(), dir.path(), dir.path());
		assets.icons.generate(&["Fore, Port"], &ie::Theme::PRINT).unwrap();
		std::fs::write(dir.path().join("ajax.png"), b"png").unwrap();

		let deck = deck();
		let card = Card::build(&deck, &deck.ships[0], &assets);
		assert_eq!(card.ship_image, Some(dir.path().join("ajax.png")));
		// Empty nation cell.
		assert_eq!(card.flag, None);
		assert_eq!(card.weapons.len(), 3);
		assert_eq!(card.weapons[0].fire_arc_icon, Some(dir.path().join("fore_port.png")));
		// Icon for "Aft" was never generated; no arc at all for "C".
		assert_eq!(card.weapons[1].fire_arc_icon, None);
		assert_eq!(card.weapons[2].fire_arc_icon, None);
	}

	#[test]
	fn capture_dir_loads_by_ship_name() {
		let dir = tempfile::tempdir().unwrap();
		let deck = deck();
		let assets = CardAssets::new(dir.path(), dir.path(), dir.path());
		let mut renderer = CaptureDirRenderer::new(dir.path()).unwrap();
		let card = Card::build(&deck, &deck.ships[0], &assets);

		assert!(renderer.render(&card).is_err());

		ie::OwnedImage::new(20, 10, ie::Color::WHITE)
			.save_png(dir.path().join("HMS_Ajax.png"), None)
			.unwrap();
		let shot = renderer.render(&card).unwrap();
		assert_eq!((shot.width(), shot.height()), (20, 10));
	}

	#[test]
	fn kept_sheet_tells_stale_screenshots() {
		let dir = tempfile::tempdir().unwrap();
		let mut deck = deck();
		let assets = CardAssets::new(dir.path(), dir.path(), dir.path());
		let renderer = CaptureDirRenderer::new(dir.path()).unwrap();

		{
			let card = Card::build(&deck, &deck.ships[0], &assets);
			assert_eq!(renderer.is_current(&card).unwrap(), None);

			CardSheet::from(&card).save(&renderer.sheet_path(card.ship)).unwrap();
			assert_eq!(renderer.is_current(&card).unwrap(), Some(true));
		}

		deck.ships[0].hull = "6".into();
		let card = Card::build(&deck, &deck.ships[0], &assets);
		assert_eq!(renderer.is_current(&card).unwrap(), Some(false));

		std::fs::write(renderer.sheet_path(card.ship), b"{").unwrap();
		assert!(renderer.is_current(&card).is_err());
	}

	#[test]
	fn capture_dir_must_exist() {
		assert!(CaptureDirRenderer::new("/nonexistent/captures").is_err());
	}
}
