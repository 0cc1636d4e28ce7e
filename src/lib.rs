//! Read-only access to SoundFont 2 (.sf2) files: the RIFF chunk tree, the preset,
//! instrument and sample records, and the zones that tie them together.
//! Records are read lazily, straight from the file, so opening a large bank is cheap.

pub mod bank;
pub mod catalog;
pub mod config;
pub mod error;
pub mod records;
pub mod riff;
pub mod view;

pub use bank::{BankPreset, BankSelect};
pub use catalog::{PresetEntry, SoundFont, Zone};
pub use config::Settings;
pub use error::{Error, Result};
pub use records::{
	Bag, GenAmount, Generator, InstrumentHeader, Modulator, PresetHeader, SampleHeader, SampleType,
};
pub use riff::{ChunkNode, FourCC, Span};
pub use view::ChunkView;
