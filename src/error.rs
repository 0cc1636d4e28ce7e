use std::ops::Range;

use thiserror::Error;

use crate::riff::FourCC;

#[derive(Error, Debug)]
pub enum Error {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("truncated chunk header at offset {offset}")]
	TruncatedHeader { offset: u64 },

	#[error("malformed '{id}' chunk at offset {offset}: {reason}")]
	MalformedChunk {
		id: FourCC,
		offset: u64,
		reason: String,
	},

	#[error("record needs {needed} bytes, but only {available} are available")]
	RecordDecode { needed: usize, available: usize },

	#[error("missing '{0}' chunk")]
	MissingChunk(FourCC),

	#[error("index {range:?} out of range ({count} records)")]
	IndexOutOfRange { range: Range<usize>, count: usize },

	#[error("no preset with program {program} in bank {bank}")]
	PresetNotFound { program: u16, bank: u16 },

	#[error("bad settings file: {0}")]
	Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
