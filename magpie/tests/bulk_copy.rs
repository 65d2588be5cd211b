//! The stability classification has to actually gate the byte-reuse fast
//! path: stateless payloads ride along unchanged through any transform, and
//! anything else either re-encodes or refuses.

use java_string::JavaString;
use pretty_assertions::assert_eq;
use magpie::attr::encode::{encode_attribute, encode_attribute_list, EncodeContext, UnsafeCopyPolicy};
use magpie::attr::mapper::TransformContext;
use magpie::attr::unknown::UnknownAttribute;
use magpie::labels::{CodeLabels, LabelResolver};
use magpie::pool::{PoolBuilder, PoolEntry, TablePool};
use magpie::{read_attribute_list, Attribute, Error, ReadContext};
use raw_attributes::{attribute_table, payload, AttributeInfo};

fn code_changed() -> TransformContext {
	TransformContext { constant_pool_preserved: true, code_array_preserved: false }
}

fn everything_changed() -> TransformContext {
	TransformContext { constant_pool_preserved: false, code_array_preserved: false }
}

#[test]
fn stateless_attributes_survive_any_transform_verbatim() {
	// SourceDebugExtension payload is raw modified UTF-8; no pool, no labels.
	let pool = TablePool::new(vec![PoolEntry::Utf8(JavaString::from("SourceDebugExtension"))]);
	let table = attribute_table(&[AttributeInfo { name_index: 1, info: b"SMAP\nfoo.kt\n".to_vec() }]);
	let attributes = read_attribute_list(&table, ReadContext::new(&pool)).expect("reads");

	let mut target_pool = PoolBuilder::new();
	let mut sink = Vec::new();
	let mut ctx = EncodeContext::new(&mut target_pool).with_transform(everything_changed());
	assert!(encode_attribute(&attributes[0], &mut sink, &mut ctx).expect("bulk copies"));

	// name_index (2 bytes) + length (4 bytes) + verbatim payload
	assert_eq!(&sink[6..], b"SMAP\nfoo.kt\n");

	let reread_pool = target_pool.into_table_pool();
	let reread = read_attribute_list(&sink, ReadContext::new(&reread_pool)).expect("rereads");
	assert_eq!(attributes, reread);
}

#[test]
fn label_attributes_are_not_copied_verbatim_across_code_changes() {
	let labels = CodeLabels::new(16);
	let pool = TablePool::new(vec![PoolEntry::Utf8(JavaString::from("LineNumberTable"))]);
	let table = attribute_table(&[AttributeInfo {
		name_index: 1,
		info: payload::line_number_table(&[(4, 10)]),
	}]);
	let ctx = ReadContext::new(&pool).with_labels(&labels);
	let attributes = read_attribute_list(&table, ctx).expect("reads");

	// Without a resolver for the rewritten code array there is nothing to
	// re-encode against, and the verbatim copy is off the table: the write
	// must fail rather than emit stale offsets.
	let mut target_pool = PoolBuilder::new();
	let mut sink = Vec::new();
	let mut ctx = EncodeContext::new(&mut target_pool).with_transform(code_changed());
	let error = encode_attribute(&attributes[0], &mut sink, &mut ctx).expect_err("refuses the copy");
	assert!(matches!(error, Error::UnresolvedLabel(_)));

	// With a resolver for the new code array the labels re-resolve and the
	// attribute is re-encoded instead of copied.
	let new_labels = CodeLabels::new(16);
	new_labels.label_at(4).expect("in bounds");
	let mut sink = Vec::new();
	let mut ctx = EncodeContext::new(&mut target_pool)
		.with_transform(code_changed())
		.with_labels(&new_labels);
	assert!(encode_attribute(&attributes[0], &mut sink, &mut ctx).expect("re-encodes"));
}

#[test]
fn identity_transform_reuses_label_attribute_bytes() {
	let labels = CodeLabels::new(16);
	let pool = TablePool::new(vec![PoolEntry::Utf8(JavaString::from("LineNumberTable"))]);
	let info = payload::line_number_table(&[(4, 10)]);
	let table = attribute_table(&[AttributeInfo { name_index: 1, info: info.clone() }]);
	let ctx = ReadContext::new(&pool).with_labels(&labels);
	let attributes = read_attribute_list(&table, ctx).expect("reads");

	// No resolver in the encode context: the verbatim fast path must carry
	// this, proving the payload was never decoded on the way out.
	let mut target_pool = PoolBuilder::new();
	let mut sink = Vec::new();
	let mut ctx = EncodeContext::new(&mut target_pool);
	assert!(encode_attribute(&attributes[0], &mut sink, &mut ctx).expect("bulk copies"));
	assert_eq!(&sink[6..], &info[..]);
}

#[test]
fn unknown_attributes_refuse_or_drop_across_transforms() {
	let unknown = UnknownAttribute::of(JavaString::from("org.example.Custom"), vec![1, 2, 3]);
	let attr = Attribute::Unknown(unknown);

	let mut pool = PoolBuilder::new();
	let mut sink = Vec::new();
	let mut ctx = EncodeContext::new(&mut pool).with_transform(everything_changed());
	let error = encode_attribute(&attr, &mut sink, &mut ctx).expect_err("refuses by default");
	assert!(matches!(error, Error::UnsafeBulkCopy { .. }));

	let mut sink = Vec::new();
	let mut ctx = EncodeContext::new(&mut pool)
		.with_transform(everything_changed())
		.with_policy(UnsafeCopyPolicy::Drop);
	encode_attribute_list(std::slice::from_ref(&attr), &mut sink, &mut ctx).expect("drops instead");
	// attributes_count is zero, nothing follows
	assert_eq!(sink, vec![0x00, 0x00]);
}
