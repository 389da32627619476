use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer};

/// One row of the ship table.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Ship {
	#[serde(deserialize_with = "cell")]
	pub ship_id: String,
	#[serde(deserialize_with = "cell")]
	pub ship_name: String,
	#[serde(deserialize_with = "cell")]
	pub ship_type: String,
	#[serde(deserialize_with = "cell")]
	pub points: String,
	#[serde(deserialize_with = "cell")]
	pub flank_speed: String,
	#[serde(deserialize_with = "cell")]
	pub armour: String,
	/// "current/max" or a bare number.
	#[serde(deserialize_with = "cell")]
	pub hull: String,
	#[serde(deserialize_with = "cell")]
	pub traits: String,
	/// Flag image file name.
	#[serde(deserialize_with = "optional_cell")]
	pub nation: Option<String>,
	/// Ship silhouette file name.
	#[serde(deserialize_with = "optional_cell")]
	pub ship_image: Option<String>,
}

impl Ship {
	/// Number of top ruler ticks for this ship.
	///
	/// Only the first character of the part before the first "/" is read, so
	/// "124/40" gives 1, not 124.
	pub fn top_line_count(&self) -> Result<u32> {
		hull_top_line_count(&self.hull).with_context(|| format!("ship {:?} ({})", self.ship_name, self.ship_id))
	}

	/// File stem used for the card screenshot and the finished card.
	pub fn file_stem(&self) -> String {
		self.ship_name.replace(' ', "_")
	}
}

pub fn hull_top_line_count(hull: &str) -> Result<u32> {
	let current = hull.split('/').next().unwrap_or_default();
	let Some(first) = current.chars().next() else {
		bail!("hull rating {hull:?} is empty");
	};
	match first.to_digit(10) {
		Some(digit) => Ok(digit),
		None => bail!("hull rating {hull:?} does not start with a digit"),
	}
}

/// One row of the weapon table.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Weapon {
	#[serde(deserialize_with = "cell")]
	pub ship_id: String,
	#[serde(deserialize_with = "cell")]
	pub weapon_system: String,
	/// Comma separated sectors, e.g. "Fore, Port".
	#[serde(deserialize_with = "optional_cell")]
	pub fire_arc: Option<String>,
	#[serde(deserialize_with = "cell")]
	pub point_blank: String,
	#[serde(deserialize_with = "cell")]
	pub short: String,
	#[serde(deserialize_with = "cell")]
	pub long: String,
	#[serde(deserialize_with = "cell")]
	pub extreme: String,
	#[serde(deserialize_with = "optional_cell")]
	pub ad: Option<String>,
	#[serde(deserialize_with = "optional_cell")]
	pub ap: Option<String>,
	#[serde(deserialize_with = "optional_cell")]
	pub dd: Option<String>,
	#[serde(deserialize_with = "optional_cell")]
	pub traits: Option<String>,
}

impl Weapon {
	pub fn ad_or_dash(&self) -> &str {
		or_dash(&self.ad)
	}

	pub fn ap_or_dash(&self) -> &str {
		or_dash(&self.ap)
	}

	pub fn dd_or_dash(&self) -> &str {
		or_dash(&self.dd)
	}

	pub fn traits_or_dash(&self) -> &str {
		or_dash(&self.traits)
	}
}

// Table cells may be exported as numbers ("hull": 6) or as text.
fn cell<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
	Ok(optional_cell(d)?.unwrap_or_default())
}

fn optional_cell<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
	Ok(match serde_json::Value::deserialize(d)? {
		serde_json::Value::Null => None,
		serde_json::Value::String(s) => Some(s),
		other => Some(other.to_string()),
	})
}

fn or_dash(v: &Option<String>) -> &str {
	match v.as_deref().map(str::trim) {
		Some(s) if !s.is_empty() => s,
		_ => "-",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hull_uses_leading_digit_of_current_value() {
		assert_eq!(hull_top_line_count("72/24").unwrap(), 7);
		assert_eq!(hull_top_line_count("6").unwrap(), 6);
		assert_eq!(hull_top_line_count("124/40").unwrap(), 1);
		assert_eq!(hull_top_line_count("0/5").unwrap(), 0);
	}

	#[test]
	fn hull_without_leading_digit_is_an_error() {
		assert!(hull_top_line_count("").is_err());
		assert!(hull_top_line_count("/12").is_err());
		assert!(hull_top_line_count("x7").is_err());
		assert!(hull_top_line_count(" 7").is_err());
	}

	#[test]
	fn ship_error_names_the_ship() {
		let ship = Ship {
			ship_id: "bb1".into(),
			ship_name: "HMS Example".into(),
			hull: "n/a".into(),
			..Default::default()
		};
		let err = format!("{:#}", ship.top_line_count().unwrap_err());
		assert!(err.contains("HMS Example"));
		assert!(err.contains("n/a"));
		assert_eq!(ship.file_stem(), "HMS_Example");
	}

	#[test]
	fn numeric_cells_read_as_text() {
		let ship: Ship = serde_json::from_str(r#"{"ship_id": 3, "ship_name": "Ajax", "hull": 6, "nation": null}"#).unwrap();
		assert_eq!(ship.ship_id, "3");
		assert_eq!(ship.hull, "6");
		assert_eq!(ship.nation, None);
		assert_eq!(ship.top_line_count().unwrap(), 6);
		assert_eq!(ship.ship_type, "");
	}

	#[test]
	fn missing_weapon_values_show_a_dash() {
		let weapon = Weapon {
			ad: Some("3".into()),
			ap: Some("  ".into()),
			..Default::default()
		};
		assert_eq!(weapon.ad_or_dash(), "3");
		assert_eq!(weapon.ap_or_dash(), "-");
		assert_eq!(weapon.dd_or_dash(), "-");
		assert_eq!(weapon.traits_or_dash(), "-");
	}
}
