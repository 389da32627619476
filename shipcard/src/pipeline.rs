//! Per-ship card loop.
//!
//! Ships are processed one at a time, start to finish. The first error stops
//! the run; cards already written stay on disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ie::ruler::{PrintFormat, Ruler, RulerSpec};

use crate::capture::{Card, CardAssets, CardRenderer, RenderSession};
use crate::sheet::CardSheet;

/// Write one `{stem}.json` card sheet per ship into `dir` for the browser
/// step to lay out. Returns the written paths.
pub fn write_sheets(deck: &data::Deck, assets: &CardAssets, dir: &Path) -> Result<Vec<PathBuf>> {
	std::fs::create_dir_all(dir).with_context(|| format!("create sheet dir {}", dir.display()))?;

	let mut written = Vec::with_capacity(deck.ships.len());
	for ship in &deck.ships {
		let card = Card::build(deck, ship, assets);
		let path = dir.join(format!("{}.json", ship.file_stem()));
		CardSheet::from(&card).save(&path)?;
		tracing::debug!(ship = %ship.ship_name, weapons = card.weapons.len(), path = %path.display(), "card sheet written");
		written.push(path);
	}
	Ok(written)
}

pub struct Pipeline<'a> {
	pub deck: &'a data::Deck,
	pub assets: &'a CardAssets,
	pub ruler: Ruler<'a>,
	pub format: PrintFormat,
	pub output_dir: PathBuf,
}

impl Pipeline<'_> {
	/// Render, rule and save a card for every ship. Returns the written paths.
	pub fn run<R: CardRenderer>(&self, session: &mut RenderSession<R>) -> Result<Vec<PathBuf>> {
		std::fs::create_dir_all(&self.output_dir)
			.with_context(|| format!("create output dir {}", self.output_dir.display()))?;

		let mut written = Vec::with_capacity(self.deck.ships.len());
		for ship in &self.deck.ships {
			let card = Card::build(self.deck, ship, self.assets);
			let screenshot = session
				.render(&card)
				.with_context(|| format!("render card for {:?}", ship.ship_name))?;

			let spec = RulerSpec::new(ship.top_line_count()?);
			let path = self.output_dir.join(format!("{}.png", ship.file_stem()));
			tracing::info!(ship = %ship.ship_name, top_ticks = spec.top_line_count, path = %path.display(), "saving card");

			self.ruler
				.finish_card(screenshot, &spec, &self.format, &path)
				.with_context(|| format!("finish card for {:?}", ship.ship_name))?;
			written.push(path);
		}
		Ok(written)
	}
}
