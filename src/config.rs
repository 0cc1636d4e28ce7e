/// settings, kept as pretty-printed JSON.
/// a missing file just means defaults, and so does a missing field.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// folder the sound banks live in
	pub soundbank_dir: PathBuf,
	/// file stems to use, `*` is a wildcard
	#[serde(alias = "soundbank")]
	pub soundbanks: Vec<String>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			soundbank_dir: PathBuf::from("SoundBanks"),
			soundbanks: vec!["*".to_string()],
		}
	}
}

impl Settings {
	pub const FILE_NAME: &'static str = "settings.json";

	pub fn load(path: &Path) -> Result<Self> {
		if !path.exists() {
			debug!(path = %path.display(), "no settings file, using defaults");
			return Ok(Self::default());
		}
		let text = fs::read_to_string(path)?;
		Ok(serde_json::from_str(&text)?)
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		let json = serde_json::to_string_pretty(self)?;
		fs::write(path, format!("{json}\n"))?;
		Ok(())
	}
}
