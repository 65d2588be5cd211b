//! Laziness guarantees: reading a table never decodes payloads it wasn't
//! asked about, corrupt payloads only fail the accessors that need them, and
//! the annotation kinds get quietly dropped instead.

use java_string::JavaString;
use pretty_assertions::assert_eq;
use magpie::attr::mapper::{AttributeStability, CustomAttributeMeta, CustomMappers};
use magpie::pool::{PoolEntry, TablePool};
use magpie::{read_attribute_list, Attribute, Error, ReadContext};
use raw_attributes::{attribute_table, payload, AttributeInfo};

fn pool_with_names(names: &[&str]) -> TablePool {
	TablePool::new(names.iter().map(|name| PoolEntry::Utf8(JavaString::from(*name))).collect())
}

#[test]
fn corrupt_payloads_fail_at_the_accessor_not_at_read_time() {
	// ConstantValue whose index points at a Utf8 entry: structurally the
	// right length, semantically broken.
	let pool = pool_with_names(&["ConstantValue", "SourceFile", "Main.java"]);
	let table = attribute_table(&[
		AttributeInfo { name_index: 1, info: payload::constant_value(2) },
		AttributeInfo { name_index: 2, info: vec![0x00, 0x03] },
	]);

	let attributes = read_attribute_list(&table, ReadContext::new(&pool)).expect("reading is lazy");
	assert_eq!(attributes.len(), 2);

	let [Attribute::ConstantValue(broken), Attribute::SourceFile(fine)] = &attributes[..] else {
		panic!("expected ConstantValue and SourceFile, got {attributes:?}");
	};

	// The corrupt sibling costs nothing until poked, and poking it doesn't
	// disturb the healthy one.
	let error = broken.value().expect_err("wrong pool entry kind");
	assert!(matches!(error, Error::ConstantPoolTypeMismatch { index: 2, .. }));
	assert_eq!(fine.source_file().expect("decodes"), &JavaString::from("Main.java"));

	// A failed decode is cached like a successful one; asking again gives the
	// same answer.
	assert_eq!(broken.value().expect_err("still broken"), error);
}

#[test]
fn wrong_length_headers_fail_the_read() {
	// A three byte ConstantValue payload can't be anything; this is caught at
	// construction, not deferred.
	let pool = pool_with_names(&["ConstantValue"]);
	let table = attribute_table(&[AttributeInfo { name_index: 1, info: vec![0x00, 0x02, 0x00] }]);

	let error = read_attribute_list(&table, ReadContext::new(&pool)).expect_err("bad fixed length");
	assert!(matches!(error, Error::MalformedAttribute { .. }));
}

#[test]
fn truncated_tables_fail_the_read() {
	let pool = pool_with_names(&["ConstantValue"]);
	// Length header says 4 bytes, only 2 follow.
	let table = vec![0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x04, 0x00, 0x02];

	let error = read_attribute_list(&table, ReadContext::new(&pool)).expect_err("truncated payload");
	assert!(matches!(error, Error::MalformedAttribute { .. }));
}

#[test]
fn malformed_annotation_tables_are_dropped_not_fatal() {
	let pool = pool_with_names(&["RuntimeVisibleAnnotations", "SourceFile", "Main.java"]);
	let table = attribute_table(&[
		// count says one annotation, nothing follows
		AttributeInfo { name_index: 1, info: vec![0x00, 0x01] },
		AttributeInfo { name_index: 2, info: vec![0x00, 0x03] },
	]);

	let attributes = read_attribute_list(&table, ReadContext::new(&pool)).expect("drops the broken table");
	assert_eq!(attributes.len(), 1);
	assert!(matches!(attributes[0], Attribute::SourceFile(_)));
}

#[test]
fn custom_mapper_metadata_reaches_unknown_attributes() {
	let pool = pool_with_names(&["org.example.Checksum"]);
	let table = attribute_table(&[AttributeInfo { name_index: 1, info: vec![0xAA] }]);

	let mut custom = CustomMappers::new();
	custom.register(
		JavaString::from("org.example.Checksum"),
		CustomAttributeMeta { allow_multiple: true, stability: AttributeStability::Stateless },
	);

	let ctx = ReadContext::new(&pool).with_custom_mappers(&custom);
	let attributes = read_attribute_list(&table, ctx).expect("reads");
	let [Attribute::Unknown(unknown)] = &attributes[..] else {
		panic!("expected an Unknown attribute, got {attributes:?}");
	};
	assert_eq!(unknown.stability(), AttributeStability::Stateless);
	assert!(unknown.allow_multiple());
	assert_eq!(attributes[0].stability(), AttributeStability::Stateless);
}
