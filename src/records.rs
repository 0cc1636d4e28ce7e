/// FIXED-SIZE RECORDS OF THE pdta CHUNKS.
/// each record type lists its fields once, in file order; the record size is the sum of
/// their widths. all numbers are little-endian.
/// any bit pattern decodes to *some* record. the only failure is running out of bytes.
use std::fmt;

use crate::error::{Error, Result};

/// names are always 20 bytes, NUL-padded (or not terminated at all if they use every byte)
pub const NAME_LEN: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
	Name,
	U8,
	I8,
	U16,
	I16,
	U32,
}

impl Field {
	pub const fn width(self) -> usize {
		match self {
			Field::Name => NAME_LEN,
			Field::U8 | Field::I8 => 1,
			Field::U16 | Field::I16 => 2,
			Field::U32 => 4,
		}
	}
}

pub const fn record_size(fields: &[Field]) -> usize {
	let mut size = 0;
	let mut i = 0;
	while i < fields.len() {
		size += fields[i].width();
		i += 1;
	}
	size
}

/// trims at the first NUL. anything that isn't ASCII becomes U+FFFD.
pub fn decode_name(bytes: &[u8]) -> String {
	let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
	bytes[..end]
		.iter()
		.map(|&b| {
			if b.is_ascii() {
				b as char
			} else {
				char::REPLACEMENT_CHARACTER
			}
		})
		.collect()
}

/// sequential reader over exactly one record's bytes.
pub struct FieldReader<'a> {
	buf: &'a [u8],
	pos: usize,
}

impl<'a> FieldReader<'a> {
	fn new(buf: &'a [u8]) -> Self {
		Self { buf, pos: 0 }
	}

	fn take<const N: usize>(&mut self) -> [u8; N] {
		let mut out = [0; N];
		out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
		self.pos += N;
		out
	}

	pub fn name(&mut self) -> String {
		decode_name(&self.take::<NAME_LEN>())
	}

	pub fn u8(&mut self) -> u8 {
		self.take::<1>()[0]
	}

	pub fn i8(&mut self) -> i8 {
		self.u8() as i8
	}

	pub fn u16(&mut self) -> u16 {
		u16::from_le_bytes(self.take())
	}

	pub fn i16(&mut self) -> i16 {
		i16::from_le_bytes(self.take())
	}

	pub fn u32(&mut self) -> u32 {
		u32::from_le_bytes(self.take())
	}

	/// the raw 2 bytes of a generator amount
	pub fn amount(&mut self) -> [u8; 2] {
		self.take()
	}
}

pub trait Record: Sized {
	/// field layout, in file order. `read` must consume exactly these.
	const FIELDS: &'static [Field];
	const SIZE: usize = record_size(Self::FIELDS);

	fn read(fields: &mut FieldReader<'_>) -> Self;

	/// decode the record starting at `offset` in `buf`.
	fn decode(buf: &[u8], offset: usize) -> Result<Self> {
		let available = buf.len().saturating_sub(offset);
		if available < Self::SIZE {
			return Err(Error::RecordDecode {
				needed: Self::SIZE,
				available,
			});
		}
		let mut fields = FieldReader::new(&buf[offset..offset + Self::SIZE]);
		let record = Self::read(&mut fields);
		debug_assert_eq!(fields.pos, Self::SIZE);
		Ok(record)
	}
}

/// `phdr` record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresetHeader {
	pub name: String,
	pub preset: u16,
	pub bank: u16,
	/// first pbag index of this preset's zones
	pub bag_index: u16,
	pub library: u32,
	pub genre: u32,
	pub morphology: u32,
}

impl Record for PresetHeader {
	const FIELDS: &'static [Field] = &[
		Field::Name,
		Field::U16,
		Field::U16,
		Field::U16,
		Field::U32,
		Field::U32,
		Field::U32,
	];

	fn read(f: &mut FieldReader<'_>) -> Self {
		Self {
			name: f.name(),
			preset: f.u16(),
			bank: f.u16(),
			bag_index: f.u16(),
			library: f.u32(),
			genre: f.u32(),
			morphology: f.u32(),
		}
	}
}

/// `inst` record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstrumentHeader {
	pub name: String,
	/// first ibag index of this instrument's zones
	pub bag_index: u16,
}

impl Record for InstrumentHeader {
	const FIELDS: &'static [Field] = &[Field::Name, Field::U16];

	fn read(f: &mut FieldReader<'_>) -> Self {
		Self {
			name: f.name(),
			bag_index: f.u16(),
		}
	}
}

/// presets and instruments both point at the first bag of their zones
pub trait ZoneOwner: Record {
	fn bag_index(&self) -> u16;
}

impl ZoneOwner for PresetHeader {
	fn bag_index(&self) -> u16 {
		self.bag_index
	}
}

impl ZoneOwner for InstrumentHeader {
	fn bag_index(&self) -> u16 {
		self.bag_index
	}
}

/// `pbag` / `ibag` record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bag {
	pub gen_index: u16,
	pub mod_index: u16,
}

impl Record for Bag {
	const FIELDS: &'static [Field] = &[Field::U16, Field::U16];

	fn read(f: &mut FieldReader<'_>) -> Self {
		Self {
			gen_index: f.u16(),
			mod_index: f.u16(),
		}
	}
}

/// generator operators.
/// the full list is in `GENERATOR_NAMES`, these are the ones code needs to refer to.
pub mod gen {
	pub const INSTRUMENT: u16 = 41;
	pub const KEY_RANGE: u16 = 43;
	pub const VEL_RANGE: u16 = 44;
	pub const INITIAL_ATTENUATION: u16 = 48;
	pub const COARSE_TUNE: u16 = 51;
	pub const SAMPLE_ID: u16 = 53;
	pub const SAMPLE_MODES: u16 = 54;
	pub const END_OPER: u16 = 60;
}

// indexed by operator. empty = unused/reserved.
static GENERATOR_NAMES: [&str; 61] = [
	"startAddrsOffset",
	"endAddrsOffset",
	"startloopAddrsOffset",
	"endloopAddrsOffset",
	"startAddrsCoarseOffset",
	"modLfoToPitch",
	"vibLfoToPitch",
	"modEnvToPitch",
	"initialFilterFc",
	"initialFilterQ",
	"modLfoToFilterFc",
	"modEnvToFilterFc",
	"endAddrsCoarseOffset",
	"modLfoToVolume",
	"",
	"chorusEffectsSend",
	"reverbEffectsSend",
	"pan",
	"",
	"",
	"",
	"delayModLFO",
	"freqModLFO",
	"delayVibLFO",
	"freqVibLFO",
	"delayModEnv",
	"attackModEnv",
	"holdModEnv",
	"decayModEnv",
	"sustainModEnv",
	"releaseModEnv",
	"keynumToModEnvHold",
	"keynumToModEnvDecay",
	"delayVolEnv",
	"attackVolEnv",
	"holdVolEnv",
	"decayVolEnv",
	"sustainVolEnv",
	"releaseVolEnv",
	"keynumToVolEnvHold",
	"keynumToVolEnvDecay",
	"instrument",
	"",
	"keyRange",
	"velRange",
	"startloopAddrsCoarseOffset",
	"keynum",
	"velocity",
	"initialAttenuation",
	"",
	"endloopAddrsCoarseOffset",
	"coarseTune",
	"fineTune",
	"sampleID",
	"sampleModes",
	"",
	"scaleTuning",
	"exclusiveClass",
	"overridingRootKey",
	"",
	"endOper",
];

pub fn generator_name(op: u16) -> Option<&'static str> {
	GENERATOR_NAMES
		.get(op as usize)
		.copied()
		.filter(|name| !name.is_empty())
}

/// a generator's 2-byte amount.
/// for key range and velocity range the two bytes are (low, high); everything else is one number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenAmount {
	Value(u16),
	Range { low: u8, high: u8 },
}

impl GenAmount {
	pub fn decode(op: u16, bytes: [u8; 2]) -> Self {
		match op {
			gen::KEY_RANGE | gen::VEL_RANGE => GenAmount::Range {
				low: bytes[0],
				high: bytes[1],
			},
			_ => GenAmount::Value(u16::from_le_bytes(bytes)),
		}
	}

	pub fn as_u16(&self) -> u16 {
		match *self {
			GenAmount::Value(v) => v,
			GenAmount::Range { low, high } => u16::from_le_bytes([low, high]),
		}
	}

	pub fn as_i16(&self) -> i16 {
		self.as_u16() as i16
	}

	pub fn as_range(&self) -> Option<(u8, u8)> {
		match *self {
			GenAmount::Range { low, high } => Some((low, high)),
			GenAmount::Value(_) => None,
		}
	}
}

/// `pgen` / `igen` record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Generator {
	pub op: u16,
	pub amount: GenAmount,
}

impl Record for Generator {
	const FIELDS: &'static [Field] = &[Field::U16, Field::U16];

	fn read(f: &mut FieldReader<'_>) -> Self {
		let op = f.u16();
		let amount = GenAmount::decode(op, f.amount());
		Self { op, amount }
	}
}

impl fmt::Display for Generator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match generator_name(self.op) {
			Some(name) => write!(f, "{}", name)?,
			None => write!(f, "unknown({})", self.op)?,
		}
		match self.amount {
			GenAmount::Range { low, high } => write!(f, " = {}-{}", low, high),
			// indices and flags
			GenAmount::Value(v)
				if matches!(self.op, gen::INSTRUMENT | gen::SAMPLE_ID | gen::SAMPLE_MODES) =>
			{
				write!(f, " = {}", v)
			}
			amount => write!(f, " = {}", amount.as_i16()),
		}
	}
}

/// `pmod` / `imod` record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Modulator {
	pub src_oper: u16,
	/// a generator operator, or a link to another modulator if the top bit is set
	pub dest_oper: u16,
	pub amount: i16,
	pub amount_src_oper: u16,
	pub trans_oper: u16,
}

impl Record for Modulator {
	const FIELDS: &'static [Field] = &[Field::U16, Field::U16, Field::I16, Field::U16, Field::U16];

	fn read(f: &mut FieldReader<'_>) -> Self {
		Self {
			src_oper: f.u16(),
			dest_oper: f.u16(),
			amount: f.i16(),
			amount_src_oper: f.u16(),
			trans_oper: f.u16(),
		}
	}
}

impl fmt::Display for Modulator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "src 0x{:04x} -> ", self.src_oper)?;
		if self.dest_oper & 0x8000 != 0 {
			write!(f, "link {}", self.dest_oper & 0x7fff)?;
		} else {
			match generator_name(self.dest_oper) {
				Some(name) => write!(f, "{}", name)?,
				None => write!(f, "unknown({})", self.dest_oper)?,
			}
		}
		write!(
			f,
			", amount {} (amount src 0x{:04x}, transform {})",
			self.amount, self.amount_src_oper, self.trans_oper
		)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleType {
	Mono,
	Right,
	Left,
	Linked,
	RomMono,
	RomRight,
	RomLeft,
	RomLinked,
	Other(u16),
}

impl From<u16> for SampleType {
	fn from(v: u16) -> Self {
		use SampleType::*;
		match v {
			0x0001 => Mono,
			0x0002 => Right,
			0x0004 => Left,
			0x0008 => Linked,
			0x8001 => RomMono,
			0x8002 => RomRight,
			0x8004 => RomLeft,
			0x8008 => RomLinked,
			other => Other(other),
		}
	}
}

impl SampleType {
	pub fn is_rom(&self) -> bool {
		matches!(
			self,
			SampleType::RomMono | SampleType::RomRight | SampleType::RomLeft | SampleType::RomLinked
		)
	}
}

/// `shdr` record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleHeader {
	pub name: String,
	/// these four are in sample points from the start of `smpl`
	pub start: u32,
	pub end: u32,
	pub loop_start: u32,
	pub loop_end: u32,
	pub sample_rate: u32,
	/// MIDI key, 255 for unpitched
	pub original_pitch: u8,
	/// in cents
	pub pitch_correction: i8,
	pub sample_link: u16,
	pub sample_type: SampleType,
}

impl Record for SampleHeader {
	const FIELDS: &'static [Field] = &[
		Field::Name,
		Field::U32,
		Field::U32,
		Field::U32,
		Field::U32,
		Field::U32,
		Field::U8,
		Field::I8,
		Field::U16,
		Field::U16,
	];

	fn read(f: &mut FieldReader<'_>) -> Self {
		Self {
			name: f.name(),
			start: f.u32(),
			end: f.u32(),
			loop_start: f.u32(),
			loop_end: f.u32(),
			sample_rate: f.u32(),
			original_pitch: f.u8(),
			pitch_correction: f.i8(),
			sample_link: f.u16(),
			sample_type: SampleType::from(f.u16()),
		}
	}
}
