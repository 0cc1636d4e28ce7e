use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sfcat::riff::HEADER_SIZE;
use sfcat::{bank, ChunkNode, Settings, SoundFont, Zone};

type SoundFontFile = SoundFont<std::fs::File>;

#[derive(Parser)]
#[command(name = "sfcat", about = "Inspect presets, instruments and samples in SoundFont 2 files")]
struct Cli {
	/// Log parsing details (RUST_LOG takes precedence)
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Show presets (all of them in full, by default)
	Preset {
		file: PathBuf,

		/// Program number of the preset to show
		#[arg(long, conflicts_with = "list")]
		number: Option<u16>,

		/// Bank of the preset to show (default 0)
		#[arg(long, requires = "number")]
		bank: Option<u16>,

		/// One line per preset
		#[arg(long)]
		list: bool,
	},
	/// Show instruments (all of them in full, by default)
	Instrument {
		file: PathBuf,

		/// Index of the instrument to show
		#[arg(long, conflicts_with = "list")]
		number: Option<usize>,

		/// One line per instrument
		#[arg(long)]
		list: bool,
	},
	/// Show sample headers
	Sample {
		file: PathBuf,

		/// Index of the sample to show
		#[arg(long, conflicts_with = "list")]
		number: Option<usize>,

		/// One line per sample
		#[arg(long)]
		list: bool,
	},
	/// Print the RIFF chunk structure
	Tree { file: PathBuf },
	/// List presets of every sound bank selected by the settings file
	Banks {
		/// Settings file (defaults are used if it doesn't exist)
		#[arg(long, default_value = Settings::FILE_NAME)]
		settings: PathBuf,

		/// Sound bank folder (overrides the settings file)
		#[arg(long)]
		dir: Option<PathBuf>,
	},
}

fn init_logging(verbose: bool) {
	let default = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn print_zone(z: usize, zone: &Zone, indent: &str) {
	println!("{}zone {}:", indent, z);
	for gen in zone.generators.iter() {
		println!("{}  {}", indent, gen);
	}
	for m in zone.modulators.iter() {
		println!("{}  mod {}", indent, m);
	}
}

fn print_presets(sf: &SoundFontFile) -> sfcat::Result<()> {
	let presets = sf.presets()?;
	for (i, p) in presets.iter().enumerate() {
		println!("{}. {} (bank {}, program {})", i, p.name, p.bank, p.program);
	}
	println!("{} presets", presets.len());
	Ok(())
}

fn print_preset(sf: &SoundFontFile, index: usize) -> sfcat::Result<()> {
	let p = sf.preset(index)?;
	println!("preset {}: {} (bank {}, program {})", index, p.name, p.bank, p.preset);
	for (z, zone) in sf.preset_zones(index)?.iter().enumerate() {
		print_zone(z, zone, "  ");
	}
	Ok(())
}

fn print_instruments(sf: &SoundFontFile) -> sfcat::Result<()> {
	let instruments = sf.instruments()?;
	for (i, inst) in instruments.iter().enumerate() {
		println!("{}. {}", i, inst.name);
	}
	println!("{} instruments", instruments.len());
	Ok(())
}

fn print_instrument(sf: &SoundFontFile, index: usize) -> sfcat::Result<()> {
	let inst = sf.instrument(index)?;
	println!("instrument {}: {}", index, inst.name);
	for (z, zone) in sf.instrument_zones(index)?.iter().enumerate() {
		print_zone(z, zone, "  ");
	}
	Ok(())
}

fn print_sample(index: usize, s: &sfcat::SampleHeader) {
	println!(
		"{}. {}: {} Hz, key {} {:+} cents, {:?}, data {}..{}, loop {}..{}, link {}",
		index,
		s.name,
		s.sample_rate,
		s.original_pitch,
		s.pitch_correction,
		s.sample_type,
		s.start,
		s.end,
		s.loop_start,
		s.loop_end,
		s.sample_link
	);
}

fn print_tree(sf: &SoundFontFile) {
	sf.tree().visit(&mut |depth: usize, node: &ChunkNode| {
		let indent = "  ".repeat(depth);
		match node {
			ChunkNode::Container {
				id,
				sub_id,
				offset,
				length,
				..
			} => println!("{}{}-{} {} {}", indent, id, sub_id, offset, length),
			ChunkNode::Leaf { id, span } => {
				println!("{}{} {} {}", indent, id, span.offset - HEADER_SIZE, span.length)
			}
		}
	});
}

fn open(file: &Path) -> sfcat::Result<SoundFontFile> {
	let sf = SoundFont::open(file)?;
	if let Some(name) = sf.name()? {
		debug!(name = %name, "sound bank name");
	}
	Ok(sf)
}

fn run(command: Commands) -> sfcat::Result<()> {
	match command {
		Commands::Preset {
			file,
			number,
			bank,
			list,
		} => {
			let sf = open(&file)?;
			if list {
				print_presets(&sf)?;
			} else if let Some(program) = number {
				let index = sf.find_preset_index(program, bank.unwrap_or(0))?;
				print_preset(&sf, index)?;
			} else {
				for i in 0..sf.preset_count()? {
					print_preset(&sf, i)?;
				}
			}
		}
		Commands::Instrument { file, number, list } => {
			let sf = open(&file)?;
			if list {
				print_instruments(&sf)?;
			} else if let Some(index) = number {
				print_instrument(&sf, index)?;
			} else {
				for i in 0..sf.instrument_count()? {
					print_instrument(&sf, i)?;
				}
			}
		}
		Commands::Sample { file, number, list } => {
			let sf = open(&file)?;
			if let Some(index) = number {
				print_sample(index, &sf.sample(index)?);
			} else {
				let samples = sf.samples()?;
				for (i, s) in samples.iter().enumerate() {
					if list {
						println!("{}. {}", i, s.name);
					} else {
						print_sample(i, s);
					}
				}
				if list {
					println!("{} samples", samples.len());
				}
			}
		}
		Commands::Tree { file } => {
			let sf = open(&file)?;
			print_tree(&sf);
		}
		Commands::Banks { settings, dir } => {
			let mut settings = Settings::load(&settings)?;
			if let Some(dir) = dir {
				settings.soundbank_dir = dir;
			}
			let presets = bank::list_bank_presets(&settings)?;
			for p in presets.iter() {
				let select = p.bank_select();
				println!(
					"{:>3} {:>5} 0x{:02x} {:>3} {} [{}]",
					p.program, p.bank, select.msb, select.lsb, p.name, p.sound_bank
				);
			}
			println!("{} presets", presets.len());
		}
	}
	Ok(())
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);
	match run(cli.command) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("Error: {}", e);
			ExitCode::FAILURE
		}
	}
}
