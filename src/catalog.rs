/// SOUNDFONT CATALOG.
/*
IMPORTANT SOUNDFONT TERMINOLOGY:
 a PRESET is a source you can play from, e.g. "Piano", "Harpsichord", "Choir"
 an INSTRUMENT is an internal group of samples which presets refer to
 a ZONE is a group of generators and modulators (key range, pan, tuning...)
	 a preset zone usually refers to an instrument
	 an instrument zone usually refers to a sample
 a SAMPLE is a block of audio data with some properties of how it should be played

 zones aren't stored anywhere: preset i owns bags phdr[i].bag .. phdr[i+1].bag,
 and bag z owns generators bag[z].gen .. bag[z+1].gen (same for modulators).
 that's why phdr, inst, pbag, ibag and shdr all end in a terminal record.
 instruments work exactly the same way with inst/ibag/igen/imod.
*/
use std::cell::RefCell;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::records::{
	decode_name, Bag, GenAmount, Generator, InstrumentHeader, Modulator, PresetHeader, Record,
	SampleHeader, ZoneOwner,
};
use crate::riff::{
	walk, ChunkNode, FourCC, Span, IBAG, IGEN, IMOD, INAM, INFO, INST, PBAG, PDTA, PGEN, PHDR, PMOD,
	RIFF, SDTA, SFBK, SHDR, SMPL,
};
use crate::view::ChunkView;

// INAM is at most 256 bytes including the terminator
const MAX_NAME_LEN: u32 = 256;

/// the four pdta chunks one kind of zone owner needs
struct Family {
	header: FourCC,
	bag: FourCC,
	gen: FourCC,
	modulator: FourCC,
}

const PRESETS: Family = Family {
	header: PHDR,
	bag: PBAG,
	gen: PGEN,
	modulator: PMOD,
};

const INSTRUMENTS: Family = Family {
	header: INST,
	bag: IBAG,
	gen: IGEN,
	modulator: IMOD,
};

/// what a preset list shows: (name, program, bank)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresetEntry {
	pub name: String,
	pub program: u16,
	pub bank: u16,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Zone {
	pub generators: Vec<Generator>,
	pub modulators: Vec<Modulator>,
}

impl Zone {
	/// amount of the last generator with operator `op` in this zone
	pub fn generator(&self, op: u16) -> Option<GenAmount> {
		self.generators
			.iter()
			.rev()
			.find(|g| g.op == op)
			.map(|g| g.amount)
	}
}

/// basic usage:
/// ```no_run
/// let sf = sfcat::SoundFont::open("soundfont.sf2")?;
/// for (i, preset) in sf.presets()?.iter().enumerate() {
///     println!("{}: {} ({}:{})", i, preset.name, preset.bank, preset.program);
/// }
/// let piano = sf.find_preset_index(0, 0)?;
/// for zone in sf.preset_zones(piano)? {
///     println!("{} generators", zone.generators.len());
/// }
/// # Ok::<(), sfcat::Error>(())
/// ```
/// Opening only walks the chunk tree. Records are read from the file when they're asked for,
/// so a missing chunk only turns into an error once something needs it.
/// The file is closed when the `SoundFont` is dropped.
pub struct SoundFont<R> {
	source: RefCell<R>,
	tree: ChunkNode,
}

impl SoundFont<File> {
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		debug!(path = %path.display(), "opening soundfont");
		Self::from_reader(File::open(path)?)
	}
}

impl<R: Read + Seek> SoundFont<R> {
	/// Like `open()` but takes anything seekable.
	pub fn from_reader(mut source: R) -> Result<Self> {
		let (tree, consumed) = walk(&mut source, 0)?;
		debug!(root = %tree.key(), consumed, "chunk tree built");
		Ok(SoundFont {
			source: RefCell::new(source),
			tree,
		})
	}

	pub fn tree(&self) -> &ChunkNode {
		&self.tree
	}

	fn leaf(&self, path: &[FourCC]) -> Result<Span> {
		if self.tree.id() != RIFF || self.tree.key() != SFBK {
			return Err(Error::MissingChunk(SFBK));
		}
		self.tree.find_leaf(path)
	}

	fn view<T: Record>(&self, id: FourCC) -> Result<ChunkView<'_, R, T>> {
		Ok(ChunkView::new(&self.source, self.leaf(&[PDTA, id])?))
	}

	/// the bank's name from INFO/INAM, if it has one.
	pub fn name(&self) -> Result<Option<String>> {
		let span = match self.leaf(&[INFO, INAM]) {
			Ok(span) => span,
			Err(Error::MissingChunk(_)) => return Ok(None),
			Err(e) => return Err(e),
		};
		let mut data = vec![0; span.length.min(MAX_NAME_LEN) as usize];
		let mut source = self.source.borrow_mut();
		source.seek(SeekFrom::Start(span.offset))?;
		source.read_exact(&mut data)?;
		Ok(Some(decode_name(&data)))
	}

	/// where the raw sample data (sdta/smpl) is. nothing is read.
	pub fn sample_data(&self) -> Result<Span> {
		self.leaf(&[SDTA, SMPL])
	}

	// number of real records in a chunk that ends in a terminal record
	fn real_count<T: Record>(view: &ChunkView<'_, R, T>) -> usize {
		view.len().saturating_sub(1)
	}

	fn bounded<T: Record>(view: &ChunkView<'_, R, T>, index: usize) -> Result<T> {
		let count = Self::real_count(view);
		if index >= count {
			return Err(Error::IndexOutOfRange {
				range: index..index.saturating_add(1),
				count,
			});
		}
		view.get(index)
	}

	fn all<T: Record>(&self, id: FourCC) -> Result<Vec<T>> {
		let view = self.view::<T>(id)?;
		view.slice(0, Self::real_count(&view))
	}

	/// get the number of presets in this soundfont (not counting the terminal one).
	pub fn preset_count(&self) -> Result<usize> {
		Ok(Self::real_count(&self.view::<PresetHeader>(PHDR)?))
	}

	/// every preset, in file order.
	pub fn presets(&self) -> Result<Vec<PresetEntry>> {
		Ok(self
			.all::<PresetHeader>(PHDR)?
			.into_iter()
			.map(|p| PresetEntry {
				name: p.name,
				program: p.preset,
				bank: p.bank,
			})
			.collect())
	}

	pub fn preset(&self, index: usize) -> Result<PresetHeader> {
		Self::bounded(&self.view::<PresetHeader>(PHDR)?, index)
	}

	/// index of the first preset with this program and bank.
	pub fn find_preset_index(&self, program: u16, bank: u16) -> Result<usize> {
		self.preset_by_program(program, bank).map(|(index, _)| index)
	}

	pub fn preset_by_program(&self, program: u16, bank: u16) -> Result<(usize, PresetHeader)> {
		self.all::<PresetHeader>(PHDR)?
			.into_iter()
			.enumerate()
			.find(|(_, p)| p.preset == program && p.bank == bank)
			.ok_or(Error::PresetNotFound { program, bank })
	}

	pub fn preset_zones(&self, index: usize) -> Result<Vec<Zone>> {
		self.zones::<PresetHeader>(&PRESETS, index)
	}

	pub fn instrument_count(&self) -> Result<usize> {
		Ok(Self::real_count(&self.view::<InstrumentHeader>(INST)?))
	}

	pub fn instruments(&self) -> Result<Vec<InstrumentHeader>> {
		self.all(INST)
	}

	pub fn instrument(&self, index: usize) -> Result<InstrumentHeader> {
		Self::bounded(&self.view::<InstrumentHeader>(INST)?, index)
	}

	pub fn instrument_zones(&self, index: usize) -> Result<Vec<Zone>> {
		self.zones::<InstrumentHeader>(&INSTRUMENTS, index)
	}

	pub fn sample_count(&self) -> Result<usize> {
		Ok(Self::real_count(&self.view::<SampleHeader>(SHDR)?))
	}

	pub fn samples(&self) -> Result<Vec<SampleHeader>> {
		self.all(SHDR)
	}

	pub fn sample(&self, index: usize) -> Result<SampleHeader> {
		Self::bounded(&self.view::<SampleHeader>(SHDR)?, index)
	}

	fn zones<H: ZoneOwner>(&self, family: &Family, index: usize) -> Result<Vec<Zone>> {
		let headers = self.view::<H>(family.header)?;
		let count = Self::real_count(&headers);
		if index >= count {
			return Err(Error::IndexOutOfRange {
				range: index..index.saturating_add(1),
				count,
			});
		}
		let bags = self.view::<Bag>(family.bag)?;
		let gens = self.view::<Generator>(family.gen)?;
		let mods = self.view::<Modulator>(family.modulator)?;

		// this header and the next one bound our bags
		let pair = headers.slice(index, index + 2)?;
		let first = pair[0].bag_index() as usize;
		let last = pair[1].bag_index() as usize;
		if last < first {
			return Err(Error::IndexOutOfRange {
				range: first..last,
				count: bags.len(),
			});
		}
		// n zones need n + 1 bags
		let bounds = bags.slice(first, last + 1)?;
		bounds
			.windows(2)
			.map(|w| -> Result<Zone> {
				Ok(Zone {
					generators: gens.slice(w[0].gen_index as usize, w[1].gen_index as usize)?,
					modulators: mods.slice(w[0].mod_index as usize, w[1].mod_index as usize)?,
				})
			})
			.collect()
	}
}
