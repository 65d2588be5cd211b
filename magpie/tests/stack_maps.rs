//! Stack map decoding against hand-written frame bytes: every compact form
//! must expand to the same shape a hand-built full frame has.

use pretty_assertions::assert_eq;
use magpie::attr::stack_map::{StackMapFrameInfo, StackMapTableAttribute, VerificationType};
use magpie::labels::{CodeLabels, LabelResolver};
use magpie::names::ClassName;
use magpie::pool::{PoolEntry, TablePool};
use magpie::{read_attribute_list, Attribute, ReadContext};
use raw_attributes::payload::{self, StackMapFrame};
use raw_attributes::{attribute_table, AttributeInfo};

fn class_name(name: &str) -> ClassName {
	ClassName::try_from(name).expect("valid class name")
}

/// A pool with `StackMapTable` at index 1 and a class for `Object(…)` frames
/// at index 3.
fn stack_map_pool() -> TablePool {
	TablePool::new(vec![
		PoolEntry::Utf8(java_string::JavaString::from("StackMapTable")),
		PoolEntry::Utf8(java_string::JavaString::from("org/example/Thing")),
		PoolEntry::Class { name_index: 2 },
	])
}

fn read_frames(bytes: Vec<u8>, labels: &CodeLabels, initial: &[VerificationType]) -> Vec<StackMapFrameInfo> {
	let pool = stack_map_pool();
	let table = attribute_table(&[AttributeInfo { name_index: 1, info: bytes }]);
	let ctx = ReadContext::new(&pool)
		.with_labels(labels)
		.with_frame_locals(initial);
	let attributes = read_attribute_list(&table, ctx).expect("table reads");
	let [Attribute::StackMapTable(attr)] = &attributes[..] else {
		panic!("expected a single StackMapTable, got {attributes:?}");
	};
	attr.frames().expect("frames decode").to_vec()
}

#[test]
fn compact_forms_expand_to_full_state() {
	let labels = CodeLabels::new(200);
	let at = |offset: u16| labels.label_at(offset).expect("in bounds");
	let initial = [VerificationType::Object(class_name("org/example/Thing")), VerificationType::Integer];

	let bytes = payload::stack_map_table(&[
		// offset 5: untouched locals, empty stack
		StackMapFrame::Same { delta: 5 },
		// offset 16: one long pushed
		StackMapFrame::SameLocals1StackItem { delta: 10, stack: payload::VerificationType::Long },
		// offset 30: one local chopped
		StackMapFrame::Chop { k: 1, delta: 13 },
		// offset 50: two locals appended
		StackMapFrame::Append {
			delta: 19,
			locals: vec![payload::VerificationType::Integer, payload::VerificationType::Uninitialized(48)],
		},
		// offset 80: explicit full frame
		StackMapFrame::Full {
			delta: 29,
			locals: vec![payload::VerificationType::Null],
			stack: vec![payload::VerificationType::Object(3), payload::VerificationType::Top],
		},
	]);

	let decoded = read_frames(bytes, &labels, &initial);

	let expected = vec![
		StackMapFrameInfo::of(at(5), initial.to_vec(), vec![]),
		StackMapFrameInfo::of(at(16), initial.to_vec(), vec![VerificationType::Long]),
		StackMapFrameInfo::of(at(30), vec![VerificationType::Object(class_name("org/example/Thing"))], vec![]),
		StackMapFrameInfo::of(
			at(50),
			vec![
				VerificationType::Object(class_name("org/example/Thing")),
				VerificationType::Integer,
				VerificationType::Uninitialized(at(48)),
			],
			vec![],
		),
		StackMapFrameInfo::of(
			at(80),
			vec![VerificationType::Null],
			vec![VerificationType::Object(class_name("org/example/Thing")), VerificationType::Top],
		),
	];
	assert_eq!(decoded, expected);

	// The compact tags survive as decode metadata, outside of equality.
	assert_eq!(decoded[0].frame_type(), 5);
	assert_eq!(decoded[2].frame_type(), 250);
	assert_eq!(decoded[4].frame_type(), 255);
}

#[test]
fn chop_of_more_locals_than_live_is_malformed() {
	let labels = CodeLabels::new(100);
	let pool = stack_map_pool();
	let bytes = payload::stack_map_table(&[StackMapFrame::Chop { k: 3, delta: 0 }]);
	let table = attribute_table(&[AttributeInfo { name_index: 1, info: bytes }]);

	let initial = [VerificationType::Integer];
	let ctx = ReadContext::new(&pool)
		.with_labels(&labels)
		.with_frame_locals(&initial);

	// The read itself stays lazy; the malformed payload surfaces at the
	// accessor.
	let attributes = read_attribute_list(&table, ctx).expect("reading is lazy");
	let [Attribute::StackMapTable(attr)] = &attributes[..] else {
		panic!("expected a single StackMapTable, got {attributes:?}");
	};
	assert!(attr.frames().is_err());
}

#[test]
fn append_matches_an_of_built_frame() {
	// A decoded append frame and an `of`-built frame for the same state are
	// indistinguishable, including inside a rebuilt attribute.
	let labels = CodeLabels::new(64);
	let at = |offset: u16| labels.label_at(offset).expect("in bounds");
	let initial = [VerificationType::Integer];

	let decoded = read_frames(
		payload::stack_map_table(&[StackMapFrame::Append { delta: 12, locals: vec![payload::VerificationType::Float] }]),
		&labels,
		&initial,
	);

	let built = StackMapTableAttribute::of(vec![
		StackMapFrameInfo::of(at(12), vec![VerificationType::Integer, VerificationType::Float], vec![]),
	]);
	assert_eq!(decoded, built.frames().expect("unbound"));
}
