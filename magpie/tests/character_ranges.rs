//! Character range tables: parsed fine, validated as a two-space forest, and
//! never accepted by a builder.

use java_string::JavaString;
use pretty_assertions::assert_eq;
use magpie::attr::character_range::CharacterRangeFlags;
use magpie::pool::{PoolEntry, TablePool};
use magpie::set::{AttributeSet, ElementKind};
use magpie::{read_attribute_list, Attribute, Error, ReadContext};
use raw_attributes::payload::{self, CharacterRangeEntry};
use raw_attributes::{attribute_table, AttributeInfo};

fn source_position(line: u32, column: u32) -> u32 {
	(line << 10) + column
}

fn parse_table(entries: &[CharacterRangeEntry]) -> Vec<u8> {
	attribute_table(&[AttributeInfo { name_index: 1, info: payload::character_range_table(entries) }])
}

fn crt_pool() -> TablePool {
	TablePool::new(vec![PoolEntry::Utf8(JavaString::from("CharacterRangeTable"))])
}

#[test]
fn entries_decode_with_their_flags() {
	let pool = crt_pool();
	let table = parse_table(&[CharacterRangeEntry {
		start_pc: 0,
		end_pc: 7,
		character_range_start: source_position(12, 4),
		character_range_end: source_position(12, 30),
		flags: 0x0001 | 0x0020,
	}]);

	let attributes = read_attribute_list(&table, ReadContext::new(&pool)).expect("reads");
	let [Attribute::CharacterRangeTable(attr)] = &attributes[..] else {
		panic!("expected a CharacterRangeTable, got {attributes:?}");
	};

	let ranges = attr.ranges().expect("decodes");
	assert_eq!(ranges.len(), 1);
	assert_eq!(ranges[0].start_pc, 0);
	assert_eq!(ranges[0].character_range_end, source_position(12, 30));
	assert_eq!(ranges[0].flags, CharacterRangeFlags {
		is_statement: true,
		is_invoke: true,
		..Default::default()
	});
}

#[test]
fn a_proper_forest_validates() {
	let pool = crt_pool();
	// A statement enclosing an invoke, followed by a disjoint statement; the
	// same nesting holds in source space.
	let table = parse_table(&[
		CharacterRangeEntry {
			start_pc: 0, end_pc: 10,
			character_range_start: source_position(3, 0), character_range_end: source_position(5, 9),
			flags: 0x0001,
		},
		CharacterRangeEntry {
			start_pc: 2, end_pc: 6,
			character_range_start: source_position(4, 0), character_range_end: source_position(4, 18),
			flags: 0x0020,
		},
		CharacterRangeEntry {
			start_pc: 12, end_pc: 20,
			character_range_start: source_position(7, 0), character_range_end: source_position(8, 2),
			flags: 0x0001,
		},
	]);

	let attributes = read_attribute_list(&table, ReadContext::new(&pool)).expect("reads");
	let [Attribute::CharacterRangeTable(attr)] = &attributes[..] else {
		panic!("expected a CharacterRangeTable, got {attributes:?}");
	};
	attr.validate_forest().expect("forest holds in both spaces");
}

#[test]
fn cross_space_disagreement_is_rejected() {
	let pool = crt_pool();
	// Nested in code space, but disjoint in source space.
	let table = parse_table(&[
		CharacterRangeEntry {
			start_pc: 0, end_pc: 10,
			character_range_start: source_position(3, 0), character_range_end: source_position(3, 9),
			flags: 0x0001,
		},
		CharacterRangeEntry {
			start_pc: 2, end_pc: 6,
			character_range_start: source_position(9, 0), character_range_end: source_position(9, 5),
			flags: 0x0001,
		},
	]);

	let attributes = read_attribute_list(&table, ReadContext::new(&pool)).expect("reads");
	let [Attribute::CharacterRangeTable(attr)] = &attributes[..] else {
		panic!("expected a CharacterRangeTable, got {attributes:?}");
	};
	assert!(matches!(attr.validate_forest(), Err(Error::MalformedAttribute { .. })));
}

#[test]
fn builders_refuse_hand_made_tables() {
	let pool = crt_pool();
	let table = parse_table(&[CharacterRangeEntry {
		start_pc: 0, end_pc: 4,
		character_range_start: source_position(1, 0), character_range_end: source_position(1, 8),
		flags: 0x0002,
	}]);

	let mut attributes = read_attribute_list(&table, ReadContext::new(&pool)).expect("reads");
	let attribute = attributes.remove(0);

	// Parsing hands them out; a code builder will not take one back.
	let mut set = AttributeSet::new(ElementKind::Code);
	let error = set.attach(attribute).expect_err("not attachable");
	assert!(matches!(error, Error::UnsupportedBuilderOperation(_)));
	assert!(set.is_empty());
}
