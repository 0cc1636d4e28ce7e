/// preset lists across a whole folder of sound banks, and the MIDI bank select
/// a sampler needs to load one of them.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::SoundFont;
use crate::config::Settings;
use crate::error::Result;

/// bank select message pair for a soundfont bank.
/// banks below 128 are melodic (MSB 0x79), the rest percussion (MSB 0x78).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BankSelect {
	pub msb: u8,
	pub lsb: u8,
}

impl BankSelect {
	pub const MELODIC_MSB: u8 = 0x79;
	pub const PERCUSSION_MSB: u8 = 0x78;

	pub fn from_bank(bank: u16) -> Self {
		Self {
			msb: if bank < 128 {
				Self::MELODIC_MSB
			} else {
				Self::PERCUSSION_MSB
			},
			lsb: (bank % 128) as u8,
		}
	}
}

/// a preset, plus which sound bank file it came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BankPreset {
	pub program: u16,
	pub bank: u16,
	pub name: String,
	/// file stem of the sound bank
	pub sound_bank: String,
}

impl BankPreset {
	pub fn bank_select(&self) -> BankSelect {
		BankSelect::from_bank(self.bank)
	}
}

/// `*` matches any run of characters, everything else matches itself.
pub fn matches_pattern(pattern: &str, name: &str) -> bool {
	let parts: Vec<&str> = pattern.split('*').collect();
	if parts.len() == 1 {
		return pattern == name;
	}
	let first = parts[0];
	let last = parts[parts.len() - 1];
	let mut rest = match name.strip_prefix(first) {
		Some(rest) => rest,
		None => return false,
	};
	for part in &parts[1..parts.len() - 1] {
		match rest.find(part) {
			Some(i) => rest = &rest[i + part.len()..],
			None => return false,
		}
	}
	rest.ends_with(last)
}

fn is_sf2(path: &Path) -> bool {
	path.extension()
		.and_then(|e| e.to_str())
		.map_or(false, |e| e.eq_ignore_ascii_case("sf2"))
}

fn stem(path: &Path) -> String {
	path.file_stem()
		.map(|s| s.to_string_lossy().into_owned())
		.unwrap_or_default()
}

/// `.sf2` files in `dir` whose stem matches one of `patterns`.
/// pattern order first, then sorted by file name. a file is only listed once.
/// a folder that doesn't exist holds no sound banks.
pub fn find_sound_banks(dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
	if !dir.is_dir() {
		debug!(dir = %dir.display(), "no sound bank folder");
		return Ok(vec![]);
	}
	let mut files = vec![];
	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && is_sf2(&path) {
			files.push(path);
		}
	}
	files.sort();

	let mut found: Vec<PathBuf> = vec![];
	for pattern in patterns {
		for file in files.iter() {
			if matches_pattern(pattern, &stem(file)) && !found.contains(file) {
				found.push(file.clone());
			}
		}
	}
	debug!(dir = %dir.display(), count = found.len(), "sound banks found");
	Ok(found)
}

/// every preset of every sound bank the settings select.
pub fn list_bank_presets(settings: &Settings) -> Result<Vec<BankPreset>> {
	let mut out = vec![];
	for path in find_sound_banks(&settings.soundbank_dir, &settings.soundbanks)? {
		let sound_bank = stem(&path);
		let sf = SoundFont::open(&path)?;
		for preset in sf.presets()? {
			out.push(BankPreset {
				program: preset.program,
				bank: preset.bank,
				name: preset.name,
				sound_bank: sound_bank.clone(),
			});
		}
	}
	Ok(out)
}
