//! The bootstrap method table: produced by the pool, counted without
//! inflation, never attachable by hand.

use java_string::JavaString;
use pretty_assertions::assert_eq;
use magpie::attr::encode::{encode_attribute, EncodeContext};
use magpie::names::{ClassName, MethodDescriptor};
use magpie::attr::bootstrap::BootstrapMethodInfo;
use magpie::pool::{
	ConstantPoolBuilder, LoadableConstant, MethodHandleEntry, MethodRef, PoolBuilder, PoolEntry, TablePool,
};
use magpie::set::{AttributeSet, ElementKind};
use magpie::{read_attribute_list, Attribute, Error, ReadContext};
use raw_attributes::{attribute_table, AttributeInfo};

fn metafactory() -> MethodHandleEntry {
	MethodHandleEntry::InvokeStatic(
		MethodRef {
			class: ClassName::try_from("java/lang/invoke/LambdaMetafactory").expect("valid"),
			name: JavaString::from("metafactory"),
			descriptor: MethodDescriptor::try_from(
				"(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodHandle;Ljava/lang/invoke/MethodType;)Ljava/lang/invoke/CallSite;"
			).expect("valid"),
		},
		false,
	)
}

#[test]
fn the_pool_generates_the_attribute() {
	let mut pool = PoolBuilder::new();
	let first = pool.put_bootstrap_method(BootstrapMethodInfo {
		method: metafactory(),
		arguments: vec![LoadableConstant::Integer(7)],
	}).expect("interned");
	let again = pool.put_bootstrap_method(BootstrapMethodInfo {
		method: metafactory(),
		arguments: vec![LoadableConstant::Integer(7)],
	}).expect("interned");
	assert_eq!(first, again);

	let attr = pool.bootstrap_methods_attribute().expect("fits")
		.expect("one method was added");
	assert_eq!(attr.len(), 1);

	// Round trip the table through bytes and a rebuilt pool.
	let mut sink = Vec::new();
	let mut ctx = EncodeContext::new(&mut pool);
	let attr = Attribute::BootstrapMethods(attr);
	assert!(encode_attribute(&attr, &mut sink, &mut ctx).expect("encodes"));

	// encode_attribute wrote `name_index len payload`; wrap it as a
	// one-entry table for the reader.
	let mut table_bytes = vec![0x00, 0x01];
	table_bytes.extend_from_slice(&sink);

	let table = pool.into_table_pool();
	let decoded = read_attribute_list(&table_bytes, ReadContext::new(&table)).expect("reads");
	assert_eq!(decoded.len(), 1);
	assert_eq!(decoded[0], attr);
}

#[test]
fn the_count_never_inflates_the_entries() {
	// The single entry points at constant pool index 99, which doesn't
	// exist. The count must still be answerable; only the entries fail.
	let pool = TablePool::new(vec![PoolEntry::Utf8(JavaString::from("BootstrapMethods"))]);
	let table = attribute_table(&[AttributeInfo {
		name_index: 1,
		info: vec![0x00, 0x01, 0x00, 99, 0x00, 0x00],
	}]);

	let attributes = read_attribute_list(&table, ReadContext::new(&pool)).expect("reads");
	let [Attribute::BootstrapMethods(attr)] = &attributes[..] else {
		panic!("expected a BootstrapMethods attribute, got {attributes:?}");
	};

	assert_eq!(attr.len(), 1);
	assert!(!attr.is_empty());
	assert!(matches!(attr.methods(), Err(Error::ConstantPoolTypeMismatch { index: 99, .. })));
}

#[test]
fn the_table_cannot_be_attached_by_hand() {
	let pool = TablePool::new(vec![PoolEntry::Utf8(JavaString::from("BootstrapMethods"))]);
	let table = attribute_table(&[AttributeInfo { name_index: 1, info: vec![0x00, 0x00] }]);
	let mut attributes = read_attribute_list(&table, ReadContext::new(&pool)).expect("reads");

	let mut set = AttributeSet::new(ElementKind::Class);
	let error = set.attach(attributes.remove(0)).expect_err("pool-generated only");
	assert!(matches!(error, Error::UnsupportedBuilderOperation(_)));
}
