use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use ie::BUNDLED_FONT;

/// Resolve the label font in a way that works both:
/// - when running from the repo (`cargo run`), and
/// - when running a packaged binary (assets next to the executable).
///
/// A configured path wins and must exist. Otherwise discovery can be pointed
/// at a folder with `SHIPCARD_ASSETS_DIR`.
pub fn resolve_font(configured: Option<&Path>) -> Result<PathBuf> {
	if let Some(path) = configured {
		if path.is_file() {
			return Ok(path.to_path_buf());
		}
		bail!("configured font {} not found", path.display());
	}

	let mut candidates: Vec<PathBuf> = Vec::new();
	if let Some(dir) = std::env::var_os("SHIPCARD_ASSETS_DIR") {
		candidates.push(PathBuf::from(dir));
	}
	if let Ok(exe) = std::env::current_exe()
		&& let Some(dir) = exe.parent()
	{
		candidates.push(dir.to_path_buf());
	}
	if let Ok(cwd) = std::env::current_dir() {
		candidates.push(cwd);
	}
	// Compile-time path to the workspace. Useful during local dev if the tool is launched with a different CWD.
	#[cfg(debug_assertions)]
	candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".."));

	find_font(candidates)
}

fn find_font(candidates: Vec<PathBuf>) -> Result<PathBuf> {
	let mut tried = Vec::new();
	for base in candidates {
		let font = base.join(BUNDLED_FONT);
		if font.is_file() {
			return Ok(font);
		}
		tried.push(font);
	}

	bail!(
		"Label font not found. Searched:\n{}\n\nFix: put DejaVuSans.ttf at {BUNDLED_FONT} next to the executable, set SHIPCARD_ASSETS_DIR to the folder that contains 'fonts/', or set font_path in the config.",
		tried
			.into_iter()
			.map(|p| format!("  - {}", p.display()))
			.collect::<Vec<_>>()
			.join("\n")
	)
}

/// The font checked into the workspace, for tests that finish real cards.
#[cfg(test)]
pub(crate) fn workspace_font() -> ie::LabelFont {
	let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..");
	let path = find_font(vec![root]).expect("bundled label font");
	ie::LabelFont::load(path).expect("parse bundled label font")
}
