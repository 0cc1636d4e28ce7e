mod support;

use sfcat::records::gen;
use sfcat::riff::{PDTA, SDTA, SFBK};
use sfcat::{Error, GenAmount, PresetEntry, SampleType, SoundFont};
use support::{minimal_sf2, temp_sf2, tracing_init};

#[test]
fn lists_presets_in_file_order() {
	tracing_init();
	let (_dir, path) = temp_sf2(&minimal_sf2("Test Bank"));
	let sf = SoundFont::open(&path).unwrap();

	assert_eq!(sf.name().unwrap().as_deref(), Some("Test Bank"));
	assert_eq!(
		sf.presets().unwrap(),
		vec![
			PresetEntry {
				name: "Piano".to_string(),
				program: 0,
				bank: 0,
			},
			PresetEntry {
				name: "Strings".to_string(),
				program: 48,
				bank: 0,
			},
		]
	);
	assert_eq!(sf.preset_count().unwrap(), 2);
}

#[test]
fn preset_zones_follow_bag_boundaries() {
	let (_dir, path) = temp_sf2(&minimal_sf2("Test Bank"));
	let sf = SoundFont::open(&path).unwrap();

	let first = sf.preset(0).unwrap();
	let second = sf.preset(1).unwrap();
	let piano = sf.preset_zones(0).unwrap();
	assert_eq!(piano.len(), (second.bag_index - first.bag_index) as usize);
	assert_eq!(piano[0].generators.len(), 2);
	assert_eq!(
		piano[0].generator(gen::KEY_RANGE),
		Some(GenAmount::Range { low: 0, high: 127 })
	);
	assert_eq!(piano[0].generator(gen::INSTRUMENT), Some(GenAmount::Value(0)));
	assert!(piano[0].modulators.is_empty());

	// the last real preset is bounded by the terminal preset and the terminal bag
	let strings = sf.preset_zones(1).unwrap();
	assert_eq!(strings.len(), 2);
	assert_eq!(strings[0].generators.len(), 1);
	assert_eq!(strings[1].generators.len(), 1);
	assert_eq!(strings[1].modulators.len(), 1);
	let m = strings[1].modulators[0];
	assert_eq!((m.src_oper, m.dest_oper, m.amount), (0x0502, 48, 960));

	assert!(matches!(
		sf.preset_zones(2),
		Err(Error::IndexOutOfRange { count: 2, .. })
	));
}

#[test]
fn finds_presets_by_program_and_bank() {
	let (_dir, path) = temp_sf2(&minimal_sf2("Test Bank"));
	let sf = SoundFont::open(&path).unwrap();

	assert_eq!(sf.find_preset_index(0, 0).unwrap(), 0);
	assert_eq!(sf.find_preset_index(48, 0).unwrap(), 1);
	let err = sf.find_preset_index(48, 128).unwrap_err();
	assert!(matches!(err, Error::PresetNotFound { program: 48, bank: 128 }));
	assert_eq!(err.to_string(), "no preset with program 48 in bank 128");
}

#[test]
fn instrument_zones_and_samples() {
	let (_dir, path) = temp_sf2(&minimal_sf2("Test Bank"));
	let sf = SoundFont::open(&path).unwrap();

	let names: Vec<String> = sf.instruments().unwrap().into_iter().map(|i| i.name).collect();
	assert_eq!(names, vec!["Piano Inst", "String Inst"]);

	let piano = sf.instrument_zones(0).unwrap();
	assert_eq!(piano.len(), 2);
	assert_eq!(
		piano[0].generator(gen::KEY_RANGE).and_then(|a| a.as_range()),
		Some((0, 59))
	);
	assert_eq!(
		piano[1].generator(gen::KEY_RANGE).and_then(|a| a.as_range()),
		Some((60, 127))
	);
	assert_eq!(piano[1].generator(gen::SAMPLE_ID), Some(GenAmount::Value(1)));
	assert_eq!(sf.instrument_zones(1).unwrap().len(), 1);
	assert!(sf.instrument_zones(2).is_err());

	let samples = sf.samples().unwrap();
	assert_eq!(samples.len(), 2);
	assert_eq!(sf.sample_count().unwrap(), 2);
	let c5 = sf.sample(1).unwrap();
	assert_eq!(c5.name, "Piano C5");
	assert_eq!((c5.start, c5.end, c5.loop_start, c5.loop_end), (16, 32, 18, 30));
	assert_eq!(c5.sample_rate, 22050);
	assert_eq!(c5.original_pitch, 72);
	assert_eq!(c5.sample_type, SampleType::Mono);
	assert!(matches!(sf.sample(2), Err(Error::IndexOutOfRange { .. })));

	assert_eq!(sf.sample_data().unwrap().length, 64);
}

#[test]
fn tree_has_the_three_lists() {
	let (_dir, path) = temp_sf2(&minimal_sf2("Test Bank"));
	let sf = SoundFont::open(&path).unwrap();

	let tree = sf.tree();
	assert_eq!(tree.key(), SFBK);
	let keys: Vec<String> = tree.children().iter().map(|c| c.key().to_string()).collect();
	assert_eq!(keys, vec!["INFO", "sdta", "pdta"]);
	assert_eq!(tree.child(PDTA).unwrap().children().len(), 9);
	assert_eq!(tree.child(SDTA).unwrap().children().len(), 1);

	let file_len = std::fs::metadata(&path).unwrap().len();
	assert_eq!(tree.consumed(), file_len);
	let children: u64 = tree.children().iter().map(|c| c.consumed()).sum();
	assert_eq!(children + 12, tree.consumed());
}

#[test]
fn truncated_file_fails_at_open() {
	let mut bytes = minimal_sf2("Test Bank");
	bytes.truncate(bytes.len() - 4);
	let (_dir, path) = temp_sf2(&bytes);
	assert!(matches!(
		SoundFont::open(&path),
		Err(Error::MalformedChunk { offset: 0, .. })
	));

	let (_dir, path) = temp_sf2(b"RIFF");
	assert!(matches!(
		SoundFont::open(&path),
		Err(Error::TruncatedHeader { offset: 0 })
	));
}

#[test]
fn missing_file_is_io_error() {
	let dir = tempfile::TempDir::new().unwrap();
	assert!(matches!(
		SoundFont::open(dir.path().join("nope.sf2")),
		Err(Error::Io(_))
	));
}
