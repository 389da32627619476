//! Ship and weapon tables for card generation.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};

mod structs;
pub use structs::*;

/// Every ship and weapon row of one print run.
///
/// On disk this is a JSON document `{"ships": [...], "weapons": [...]}` exported
/// from the ship spreadsheet. Weapons reference their ship by `ship_id`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Deck {
	pub ships: Vec<Ship>,
	pub weapons: Vec<Weapon>,
}

impl Deck {
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let file = File::open(path).with_context(|| format!("Open deck {}", path.display()))?;
		let deck: Self = serde_json::from_reader(BufReader::new(file)).with_context(|| format!("Parse deck {}", path.display()))?;

		for weapon in &deck.weapons {
			if !deck.ships.iter().any(|s| s.ship_id == weapon.ship_id) {
				log::warn!("weapon {:?} references unknown ship_id {:?}", weapon.weapon_system, weapon.ship_id);
			}
		}
		log::debug!("loaded {} ships and {} weapons from {}", deck.ships.len(), deck.weapons.len(), path.display());
		Ok(deck)
	}

	/// Weapons mounted on `ship_id`, in table order.
	pub fn weapons_for<'a>(&'a self, ship_id: &'a str) -> impl Iterator<Item = &'a Weapon> + 'a {
		self.weapons.iter().filter(move |w| w.ship_id == ship_id)
	}
}
