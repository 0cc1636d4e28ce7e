//! Builds small SoundFont files in memory.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub fn chunk(id: &str, payload: &[u8]) -> Vec<u8> {
	let mut out = id.as_bytes().to_vec();
	out.extend((payload.len() as u32).to_le_bytes());
	out.extend_from_slice(payload);
	out
}

pub fn list(id: &str, sub_id: &str, children: &[Vec<u8>]) -> Vec<u8> {
	let mut payload = sub_id.as_bytes().to_vec();
	for child in children {
		payload.extend_from_slice(child);
	}
	chunk(id, &payload)
}

fn name(s: &str) -> Vec<u8> {
	let mut out = s.as_bytes().to_vec();
	out.resize(20, 0);
	out
}

pub fn phdr(n: &str, preset: u16, bank: u16, bag: u16) -> Vec<u8> {
	let mut out = name(n);
	for v in [preset, bank, bag] {
		out.extend(v.to_le_bytes());
	}
	out.extend([0u8; 12]);
	out
}

pub fn inst(n: &str, bag: u16) -> Vec<u8> {
	let mut out = name(n);
	out.extend(bag.to_le_bytes());
	out
}

pub fn bag(gen: u16, modulator: u16) -> Vec<u8> {
	let mut out = gen.to_le_bytes().to_vec();
	out.extend(modulator.to_le_bytes());
	out
}

pub fn gen(op: u16, amount: u16) -> Vec<u8> {
	let mut out = op.to_le_bytes().to_vec();
	out.extend(amount.to_le_bytes());
	out
}

pub fn range(op: u16, low: u8, high: u8) -> Vec<u8> {
	let mut out = op.to_le_bytes().to_vec();
	out.extend([low, high]);
	out
}

pub fn modulator(src: u16, dest: u16, amount: i16) -> Vec<u8> {
	let mut out = vec![];
	for v in [src, dest, amount as u16, 0, 0] {
		out.extend(v.to_le_bytes());
	}
	out
}

pub fn shdr(n: &str, start: u32, end: u32, rate: u32, pitch: u8, sample_type: u16) -> Vec<u8> {
	let mut out = name(n);
	for v in [start, end, start + 2, end - 2, rate] {
		out.extend(v.to_le_bytes());
	}
	out.push(pitch);
	out.push(0);
	out.extend(0u16.to_le_bytes());
	out.extend(sample_type.to_le_bytes());
	out
}

pub fn records(parts: &[Vec<u8>]) -> Vec<u8> {
	parts.concat()
}

/// 2 presets (+ EOP), 3 preset zones (+ terminal bag), 4 preset generators,
/// 2 instruments (+ EOI), 2 samples (+ EOS).
///
/// preset 0 "Piano"   (bank 0, program 0):  bag 0 -> gens 0..2
/// preset 1 "Strings" (bank 0, program 48): bag 1 -> gens 2..3, bag 2 -> gens 3..4 + 1 modulator
pub fn minimal_sf2(bank_name: &str) -> Vec<u8> {
	let info = list(
		"LIST",
		"INFO",
		&[
			chunk("ifil", &[2, 0, 1, 0]),
			chunk("INAM", format!("{}\0", bank_name).as_bytes()),
		],
	);
	let sdta = list("LIST", "sdta", &[chunk("smpl", &[0; 64])]);

	let pdta = list(
		"LIST",
		"pdta",
		&[
			chunk(
				"phdr",
				&records(&[
					phdr("Piano", 0, 0, 0),
					phdr("Strings", 48, 0, 1),
					phdr("EOP", 0, 0, 3),
				]),
			),
			chunk(
				"pbag",
				&records(&[bag(0, 0), bag(2, 0), bag(3, 0), bag(4, 1)]),
			),
			chunk(
				"pmod",
				&records(&[modulator(0x0502, 48, 960), modulator(0, 0, 0)]),
			),
			chunk(
				"pgen",
				&records(&[range(43, 0, 127), gen(41, 0), gen(41, 1), gen(41, 1)]),
			),
			chunk(
				"inst",
				&records(&[inst("Piano Inst", 0), inst("String Inst", 2), inst("EOI", 3)]),
			),
			chunk(
				"ibag",
				&records(&[bag(0, 0), bag(2, 0), bag(4, 0), bag(5, 0)]),
			),
			chunk("imod", &modulator(0, 0, 0)),
			chunk(
				"igen",
				&records(&[
					range(43, 0, 59),
					gen(53, 0),
					range(43, 60, 127),
					gen(53, 1),
					gen(53, 1),
					gen(0, 0),
				]),
			),
			chunk(
				"shdr",
				&records(&[
					shdr("Piano C3", 0, 16, 44100, 48, 1),
					shdr("Piano C5", 16, 32, 22050, 72, 1),
					shdr("EOS", 0, 2, 0, 0, 0),
				]),
			),
		],
	);

	list("RIFF", "sfbk", &[info, sdta, pdta])
}

/// a bank with one percussion preset and nothing but a phdr chunk.
pub fn drum_kit() -> Vec<u8> {
	let pdta = list(
		"LIST",
		"pdta",
		&[chunk(
			"phdr",
			&records(&[phdr("Standard Kit", 0, 128, 0), phdr("EOP", 0, 0, 0)]),
		)],
	);
	list("RIFF", "sfbk", &[pdta])
}

pub fn write_file(dir: &Path, file_name: &str, bytes: &[u8]) -> PathBuf {
	let path = dir.join(file_name);
	std::fs::write(&path, bytes).expect("Failed to write test file");
	path
}

pub fn temp_sf2(bytes: &[u8]) -> (TempDir, PathBuf) {
	let dir = TempDir::new().expect("Failed to create temp dir");
	let path = write_file(dir.path(), "test.sf2", bytes);
	(dir, path)
}

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
