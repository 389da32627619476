//! Card sheets: the filled-in template slots of one ship card.
//!
//! A sheet is what the browser step lays out, and it is kept next to the
//! screenshot taken from it. Comparing the stored sheet with one built from
//! the current deck tells whether a screenshot is stale.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::capture::{Card, WeaponRow};

/// One weapon line, every cell already formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSlot {
	pub weapon_system: String,
	/// Raw arc text, used as the icon's alt text.
	pub fire_arc: Option<String>,
	pub fire_arc_icon: Option<PathBuf>,
	pub point_blank: String,
	pub short: String,
	pub long: String,
	pub extreme: String,
	pub ad: String,
	pub ap: String,
	pub dd: String,
	pub traits: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSheet {
	pub ship_name: String,
	pub ship_type: String,
	pub points: String,
	pub flank_speed: String,
	pub armour: String,
	pub hull: String,
	pub traits: String,
	pub ship_image: Option<PathBuf>,
	pub flag: Option<PathBuf>,
	pub weapons: Vec<WeaponSlot>,
}

impl From<&WeaponRow<'_>> for WeaponSlot {
	fn from(row: &WeaponRow<'_>) -> Self {
		let w = row.weapon;
		Self {
			weapon_system: w.weapon_system.clone(),
			fire_arc: w.fire_arc.clone(),
			fire_arc_icon: row.fire_arc_icon.clone(),
			point_blank: w.point_blank.clone(),
			short: w.short.clone(),
			long: w.long.clone(),
			extreme: w.extreme.clone(),
			ad: w.ad_or_dash().to_owned(),
			ap: w.ap_or_dash().to_owned(),
			dd: w.dd_or_dash().to_owned(),
			traits: w.traits_or_dash().to_owned(),
		}
	}
}

impl From<&Card<'_>> for CardSheet {
	fn from(card: &Card<'_>) -> Self {
		let ship = card.ship;
		Self {
			ship_name: ship.ship_name.to_uppercase(),
			ship_type: ship.ship_type.to_uppercase(),
			points: ship.points.clone(),
			flank_speed: ship.flank_speed.clone(),
			armour: ship.armour.clone(),
			hull: ship.hull.clone(),
			traits: ship.traits.clone(),
			ship_image: card.ship_image.clone(),
			flag: card.flag.clone(),
			weapons: card.weapons.iter().map(WeaponSlot::from).collect(),
		}
	}
}

impl CardSheet {
	pub fn load(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("open card sheet {}", path.display()))?;
		serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parse card sheet {}", path.display()))
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		let file = File::create(path).with_context(|| format!("create card sheet {}", path.display()))?;
		let mut writer = BufWriter::new(file);
		serde_json::to_writer_pretty(&mut writer, self).with_context(|| format!("write card sheet {}", path.display()))?;
		writer.flush().with_context(|| format!("write card sheet {}", path.display()))
	}
}
