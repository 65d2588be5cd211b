//! The constant pool as attributes see it.
//!
//! Attributes resolve every index they read into an owned symbolic value right
//! away and never keep the index around. The two traits here are the seams to
//! the real pool of a class file: [`ConstantPool`] is what decoding consumes,
//! [`ConstantPoolBuilder`] is what encoding writes into. [`TablePool`] and
//! [`PoolBuilder`] are working implementations of both, enough for decoding,
//! re-encoding and the test suite.

use java_string::{JavaStr, JavaString};
use indexmap::IndexMap;
use crate::attr::bootstrap::BootstrapMethodInfo;
use crate::constants::method_handle;
use crate::error::{Error, Result};
use crate::names::{ClassName, FieldDescriptor, MethodDescriptor, ModuleName, PackageName};

/// A `CONSTANT_NameAndType_info` entry, resolved to its two strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameAndTypeEntry {
	pub name: JavaString,
	pub descriptor: JavaString,
}

/// A loadable constant that is legal as the value of a `ConstantValue` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValueEntry {
	Integer(i32),
	Float(f32),
	Long(i64),
	Double(f64),
	String(JavaString),
}

/// A reference to a field, as stored in a `CONSTANT_Fieldref_info` entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
	pub class: ClassName,
	pub name: JavaString,
	pub descriptor: FieldDescriptor,
}

/// A reference to a method, as stored in a `CONSTANT_Methodref_info` or
/// `CONSTANT_InterfaceMethodref_info` entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
	pub class: ClassName,
	pub name: JavaString,
	pub descriptor: MethodDescriptor,
}

/// A `CONSTANT_MethodHandle_info` entry, resolved per its `reference_kind`.
///
/// The `bool` on `InvokeStatic` and `InvokeSpecial` is `true` iff the handle
/// referenced a `CONSTANT_InterfaceMethodref_info` entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MethodHandleEntry {
	GetField(FieldRef),
	GetStatic(FieldRef),
	PutField(FieldRef),
	PutStatic(FieldRef),
	InvokeVirtual(MethodRef),
	InvokeStatic(MethodRef, bool),
	InvokeSpecial(MethodRef, bool),
	NewInvokeSpecial(MethodRef),
	InvokeInterface(MethodRef),
}

/// A `CONSTANT_Dynamic_info` entry.
///
/// The bootstrap method is kept as its index into the `BootstrapMethods` table
/// rather than inlined; a bootstrap method argument may itself be dynamic, and
/// keeping the link symbolic avoids chasing that recursion here.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDynamicEntry {
	pub bootstrap_method_index: u16,
	pub name: JavaString,
	pub descriptor: FieldDescriptor,
}

/// Any constant that `ldc` and bootstrap method arguments may load,
/// see [JVMS 4.4](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.4).
#[derive(Debug, Clone, PartialEq)]
pub enum LoadableConstant {
	Integer(i32),
	Float(f32),
	Long(i64),
	Double(f64),
	Class(ClassName),
	String(JavaString),
	MethodHandle(MethodHandleEntry),
	MethodType(MethodDescriptor),
	Dynamic(ConstantDynamicEntry),
}

/// Typed, tag-checked lookup into the constant pool of the class being read.
///
/// Every getter fails with [`Error::ConstantPoolTypeMismatch`] when the index
/// is out of range or the entry at it has a different tag.
pub trait ConstantPool {
	fn utf8(&self, index: u16) -> Result<JavaString>;
	fn class(&self, index: u16) -> Result<ClassName>;
	fn module(&self, index: u16) -> Result<ModuleName>;
	fn package(&self, index: u16) -> Result<PackageName>;
	fn name_and_type(&self, index: u16) -> Result<NameAndTypeEntry>;
	fn constant_value(&self, index: u16) -> Result<ConstantValueEntry>;
	fn method_handle(&self, index: u16) -> Result<MethodHandleEntry>;
	fn loadable(&self, index: u16) -> Result<LoadableConstant>;
}

/// Resolves an index where `0` means absent, per the many "may be zero" items
/// of the attribute layouts.
pub fn optional<T>(
	pool: &dyn ConstantPool,
	index: u16,
	get: impl FnOnce(&dyn ConstantPool, u16) -> Result<T>,
) -> Result<Option<T>> {
	if index == 0 {
		Ok(None)
	} else {
		get(pool, index).map(Some)
	}
}

/// The interning side used while encoding: every `put_*` hands back the index
/// the value lives at, adding the entry if it wasn't there yet.
pub trait ConstantPoolBuilder {
	fn put_utf8(&mut self, s: &JavaStr) -> Result<u16>;
	fn put_class(&mut self, name: &ClassName) -> Result<u16>;
	fn put_module(&mut self, name: &ModuleName) -> Result<u16>;
	fn put_package(&mut self, name: &PackageName) -> Result<u16>;
	fn put_name_and_type(&mut self, entry: &NameAndTypeEntry) -> Result<u16>;
	fn put_constant_value(&mut self, value: &ConstantValueEntry) -> Result<u16>;
	fn put_method_handle(&mut self, handle: &MethodHandleEntry) -> Result<u16>;
	fn put_loadable(&mut self, value: &LoadableConstant) -> Result<u16>;

	/// Adds a bootstrap method to the table backing `Dynamic` and
	/// `InvokeDynamic` entries, returning its index into that table.
	///
	/// The `BootstrapMethods` attribute itself is not written through the
	/// regular attribute machinery; it falls out of the methods collected here.
	fn put_bootstrap_method(&mut self, method: BootstrapMethodInfo) -> Result<u16>;
}

/// Writes `0` for an absent value instead of interning anything.
pub fn put_optional<P: ConstantPoolBuilder + ?Sized, T: ?Sized>(
	pool: &mut P,
	value: Option<&T>,
	put: impl FnOnce(&mut P, &T) -> Result<u16>,
) -> Result<u16> {
	match value {
		Some(value) => put(pool, value),
		None => Ok(0),
	}
}

/// One raw slot of a constant pool, with its cross-references still as indices.
///
/// This mirrors the on-disk `cp_info` structures; resolution into the symbolic
/// values above happens in [`TablePool`]'s getters. `Float` and `Double` store
/// raw bits so the type can be used as a hash map key while interning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PoolEntry {
	Utf8(JavaString),
	Integer(i32),
	Float(u32),
	Long(i64),
	Double(u64),
	Class { name_index: u16 },
	String { string_index: u16 },
	FieldRef { class_index: u16, name_and_type_index: u16 },
	MethodRef { class_index: u16, name_and_type_index: u16 },
	InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
	NameAndType { name_index: u16, descriptor_index: u16 },
	MethodHandle { reference_kind: u8, reference_index: u16 },
	MethodType { descriptor_index: u16 },
	Dynamic { bootstrap_method_attribute_index: u16, name_and_type_index: u16 },
	InvokeDynamic { bootstrap_method_attribute_index: u16, name_and_type_index: u16 },
	Module { name_index: u16 },
	Package { name_index: u16 },
}

impl PoolEntry {
	fn kind(&self) -> &'static str {
		match self {
			PoolEntry::Utf8(_) => "Utf8",
			PoolEntry::Integer(_) => "Integer",
			PoolEntry::Float(_) => "Float",
			PoolEntry::Long(_) => "Long",
			PoolEntry::Double(_) => "Double",
			PoolEntry::Class { .. } => "Class",
			PoolEntry::String { .. } => "String",
			PoolEntry::FieldRef { .. } => "FieldRef",
			PoolEntry::MethodRef { .. } => "MethodRef",
			PoolEntry::InterfaceMethodRef { .. } => "InterfaceMethodRef",
			PoolEntry::NameAndType { .. } => "NameAndType",
			PoolEntry::MethodHandle { .. } => "MethodHandle",
			PoolEntry::MethodType { .. } => "MethodType",
			PoolEntry::Dynamic { .. } => "Dynamic",
			PoolEntry::InvokeDynamic { .. } => "InvokeDynamic",
			PoolEntry::Module { .. } => "Module",
			PoolEntry::Package { .. } => "Package",
		}
	}

	/// `Long` and `Double` take up two slots, see JVMS 4.4.5.
	fn is_wide(&self) -> bool {
		matches!(self, PoolEntry::Long(_) | PoolEntry::Double(_))
	}
}

enum Slot {
	Entry(PoolEntry),
	/// Index 0, and the slot following a `Long` or `Double`.
	Unusable,
}

/// A constant pool held as a plain table of entries.
///
/// Indices are 1-based and `Long`/`Double` occupy two slots, exactly like in a
/// class file; [`TablePool::new`] inserts the unusable filler slots itself.
pub struct TablePool {
	slots: Vec<Slot>,
}

impl TablePool {
	pub fn new(entries: Vec<PoolEntry>) -> TablePool {
		let mut slots = Vec::with_capacity(entries.len() + 1);
		slots.push(Slot::Unusable);
		for entry in entries {
			let wide = entry.is_wide();
			slots.push(Slot::Entry(entry));
			if wide {
				slots.push(Slot::Unusable);
			}
		}
		TablePool { slots }
	}

	fn mismatch(&self, index: u16, expected: &'static str) -> Error {
		let found = match self.slots.get(index as usize) {
			Some(Slot::Entry(entry)) => entry.kind().to_string(),
			Some(Slot::Unusable) => "an unusable slot".to_string(),
			None => format!("nothing, the pool has {} slots", self.slots.len()),
		};
		Error::ConstantPoolTypeMismatch { index, expected, found }
	}

	fn entry(&self, index: u16, expected: &'static str) -> Result<&PoolEntry> {
		match self.slots.get(index as usize) {
			Some(Slot::Entry(entry)) => Ok(entry),
			_ => Err(self.mismatch(index, expected)),
		}
	}

	fn field_ref(&self, index: u16) -> Result<FieldRef> {
		let &PoolEntry::FieldRef { class_index, name_and_type_index } = self.entry(index, "FieldRef")? else {
			return Err(self.mismatch(index, "FieldRef"));
		};
		let class = self.class(class_index)?;
		let NameAndTypeEntry { name, descriptor } = self.name_and_type(name_and_type_index)?;
		Ok(FieldRef { class, name, descriptor: FieldDescriptor::try_from(descriptor)? })
	}

	fn method_ref(&self, index: u16) -> Result<MethodRef> {
		let (class_index, name_and_type_index) = match *self.entry(index, "MethodRef")? {
			PoolEntry::MethodRef { class_index, name_and_type_index } => (class_index, name_and_type_index),
			_ => return Err(self.mismatch(index, "MethodRef")),
		};
		self.any_method_ref(class_index, name_and_type_index)
	}

	fn interface_method_ref(&self, index: u16) -> Result<MethodRef> {
		let (class_index, name_and_type_index) = match *self.entry(index, "InterfaceMethodRef")? {
			PoolEntry::InterfaceMethodRef { class_index, name_and_type_index } => (class_index, name_and_type_index),
			_ => return Err(self.mismatch(index, "InterfaceMethodRef")),
		};
		self.any_method_ref(class_index, name_and_type_index)
	}

	/// The returned `bool` is `true` iff the entry was an `InterfaceMethodRef`.
	fn method_or_interface_method_ref(&self, index: u16) -> Result<(MethodRef, bool)> {
		let (class_index, name_and_type_index, is_interface) = match *self.entry(index, "MethodRef or InterfaceMethodRef")? {
			PoolEntry::MethodRef { class_index, name_and_type_index } => (class_index, name_and_type_index, false),
			PoolEntry::InterfaceMethodRef { class_index, name_and_type_index } => (class_index, name_and_type_index, true),
			_ => return Err(self.mismatch(index, "MethodRef or InterfaceMethodRef")),
		};
		Ok((self.any_method_ref(class_index, name_and_type_index)?, is_interface))
	}

	fn any_method_ref(&self, class_index: u16, name_and_type_index: u16) -> Result<MethodRef> {
		let class = self.class(class_index)?;
		let NameAndTypeEntry { name, descriptor } = self.name_and_type(name_and_type_index)?;
		Ok(MethodRef { class, name, descriptor: MethodDescriptor::try_from(descriptor)? })
	}
}

impl ConstantPool for TablePool {
	fn utf8(&self, index: u16) -> Result<JavaString> {
		match self.entry(index, "Utf8")? {
			PoolEntry::Utf8(string) => Ok(string.clone()),
			_ => Err(self.mismatch(index, "Utf8")),
		}
	}

	fn class(&self, index: u16) -> Result<ClassName> {
		let &PoolEntry::Class { name_index } = self.entry(index, "Class")? else {
			return Err(self.mismatch(index, "Class"));
		};
		ClassName::try_from(self.utf8(name_index)?)
	}

	fn module(&self, index: u16) -> Result<ModuleName> {
		let &PoolEntry::Module { name_index } = self.entry(index, "Module")? else {
			return Err(self.mismatch(index, "Module"));
		};
		ModuleName::try_from(self.utf8(name_index)?)
	}

	fn package(&self, index: u16) -> Result<PackageName> {
		let &PoolEntry::Package { name_index } = self.entry(index, "Package")? else {
			return Err(self.mismatch(index, "Package"));
		};
		PackageName::try_from(self.utf8(name_index)?)
	}

	fn name_and_type(&self, index: u16) -> Result<NameAndTypeEntry> {
		let &PoolEntry::NameAndType { name_index, descriptor_index } = self.entry(index, "NameAndType")? else {
			return Err(self.mismatch(index, "NameAndType"));
		};
		Ok(NameAndTypeEntry {
			name: self.utf8(name_index)?,
			descriptor: self.utf8(descriptor_index)?,
		})
	}

	fn constant_value(&self, index: u16) -> Result<ConstantValueEntry> {
		match *self.entry(index, "Integer, Float, Long, Double or String")? {
			PoolEntry::Integer(value) => Ok(ConstantValueEntry::Integer(value)),
			PoolEntry::Float(bits) => Ok(ConstantValueEntry::Float(f32::from_bits(bits))),
			PoolEntry::Long(value) => Ok(ConstantValueEntry::Long(value)),
			PoolEntry::Double(bits) => Ok(ConstantValueEntry::Double(f64::from_bits(bits))),
			PoolEntry::String { string_index } => Ok(ConstantValueEntry::String(self.utf8(string_index)?)),
			_ => Err(self.mismatch(index, "Integer, Float, Long, Double or String")),
		}
	}

	fn method_handle(&self, index: u16) -> Result<MethodHandleEntry> {
		let &PoolEntry::MethodHandle { reference_kind, reference_index } = self.entry(index, "MethodHandle")? else {
			return Err(self.mismatch(index, "MethodHandle"));
		};

		let handle = match reference_kind {
			method_handle::GET_FIELD => MethodHandleEntry::GetField(self.field_ref(reference_index)?),
			method_handle::GET_STATIC => MethodHandleEntry::GetStatic(self.field_ref(reference_index)?),
			method_handle::PUT_FIELD => MethodHandleEntry::PutField(self.field_ref(reference_index)?),
			method_handle::PUT_STATIC => MethodHandleEntry::PutStatic(self.field_ref(reference_index)?),
			method_handle::INVOKE_VIRTUAL => MethodHandleEntry::InvokeVirtual(self.method_ref(reference_index)?),
			method_handle::INVOKE_STATIC => {
				let (method, is_interface) = self.method_or_interface_method_ref(reference_index)?;
				MethodHandleEntry::InvokeStatic(method, is_interface)
			},
			method_handle::INVOKE_SPECIAL => {
				let (method, is_interface) = self.method_or_interface_method_ref(reference_index)?;
				MethodHandleEntry::InvokeSpecial(method, is_interface)
			},
			method_handle::NEW_INVOKE_SPECIAL => MethodHandleEntry::NewInvokeSpecial(self.method_ref(reference_index)?),
			method_handle::INVOKE_INTERFACE => MethodHandleEntry::InvokeInterface(self.interface_method_ref(reference_index)?),
			_ => return Err(Error::ConstantPoolTypeMismatch {
				index,
				expected: "a MethodHandle with a known reference_kind",
				found: format!("reference_kind {reference_kind}"),
			}),
		};
		Ok(handle)
	}

	fn loadable(&self, index: u16) -> Result<LoadableConstant> {
		match *self.entry(index, "a loadable entry")? {
			PoolEntry::Integer(value) => Ok(LoadableConstant::Integer(value)),
			PoolEntry::Float(bits) => Ok(LoadableConstant::Float(f32::from_bits(bits))),
			PoolEntry::Long(value) => Ok(LoadableConstant::Long(value)),
			PoolEntry::Double(bits) => Ok(LoadableConstant::Double(f64::from_bits(bits))),
			PoolEntry::Class { .. } => Ok(LoadableConstant::Class(self.class(index)?)),
			PoolEntry::String { string_index } => Ok(LoadableConstant::String(self.utf8(string_index)?)),
			PoolEntry::MethodHandle { .. } => Ok(LoadableConstant::MethodHandle(self.method_handle(index)?)),
			PoolEntry::MethodType { descriptor_index } => {
				Ok(LoadableConstant::MethodType(MethodDescriptor::try_from(self.utf8(descriptor_index)?)?))
			},
			PoolEntry::Dynamic { bootstrap_method_attribute_index, name_and_type_index } => {
				let NameAndTypeEntry { name, descriptor } = self.name_and_type(name_and_type_index)?;
				Ok(LoadableConstant::Dynamic(ConstantDynamicEntry {
					bootstrap_method_index: bootstrap_method_attribute_index,
					name,
					descriptor: FieldDescriptor::try_from(descriptor)?,
				}))
			},
			_ => Err(self.mismatch(index, "a loadable entry")),
		}
	}
}

/// An interning constant pool for the write side.
///
/// Entries keep their index once handed out, so values interned early stay
/// stable while later attributes add theirs. The builder also collects the
/// bootstrap method table as a side effect of [`ConstantPoolBuilder::put_bootstrap_method`];
/// see [`PoolBuilder::bootstrap_methods_attribute`].
pub struct PoolBuilder {
	entries: IndexMap<PoolEntry, u16>,
	next_index: u16,
	bootstrap_methods: Vec<BootstrapMethodInfo>,
}

impl Default for PoolBuilder {
	fn default() -> PoolBuilder {
		PoolBuilder::new()
	}
}

impl PoolBuilder {
	pub fn new() -> PoolBuilder {
		PoolBuilder {
			entries: IndexMap::new(),
			next_index: 1,
			bootstrap_methods: Vec::new(),
		}
	}

	fn put(&mut self, entry: PoolEntry) -> Result<u16> {
		if let Some(&index) = self.entries.get(&entry) {
			return Ok(index);
		}
		let index = self.next_index;
		let width = if entry.is_wide() { 2 } else { 1 };
		self.next_index = self.next_index.checked_add(width)
			.ok_or_else(|| Error::UnsupportedBuilderOperation("constant pool grew past 65535 slots".to_string()))?;
		self.entries.insert(entry, index);
		Ok(index)
	}

	fn put_field_ref(&mut self, field: &FieldRef) -> Result<u16> {
		let class_index = self.put_class(&field.class)?;
		let name_and_type_index = self.put_name_and_type(&NameAndTypeEntry {
			name: field.name.clone(),
			descriptor: field.descriptor.as_java_str().to_owned(),
		})?;
		self.put(PoolEntry::FieldRef { class_index, name_and_type_index })
	}

	fn put_method_ref(&mut self, method: &MethodRef, is_interface: bool) -> Result<u16> {
		let class_index = self.put_class(&method.class)?;
		let name_and_type_index = self.put_name_and_type(&NameAndTypeEntry {
			name: method.name.clone(),
			descriptor: method.descriptor.as_java_str().to_owned(),
		})?;
		if is_interface {
			self.put(PoolEntry::InterfaceMethodRef { class_index, name_and_type_index })
		} else {
			self.put(PoolEntry::MethodRef { class_index, name_and_type_index })
		}
	}

	pub fn bootstrap_methods(&self) -> &[BootstrapMethodInfo] {
		&self.bootstrap_methods
	}

	/// The `BootstrapMethods` attribute backing the entries interned so far,
	/// `None` while nothing needed one. This is the only way such an
	/// attribute comes into existence on the write side; it falls out of
	/// resolving dynamic constants, not out of a builder.
	pub fn bootstrap_methods_attribute(&self) -> Result<Option<crate::attr::bootstrap::BootstrapMethodsAttribute<'static>>> {
		if self.bootstrap_methods.is_empty() {
			return Ok(None);
		}
		crate::attr::bootstrap::BootstrapMethodsAttribute::from_methods(self.bootstrap_methods.clone()).map(Some)
	}

	/// Turns the interned entries into a [`TablePool`], mostly so tests can
	/// decode what they just encoded.
	pub fn into_table_pool(self) -> TablePool {
		let entries = self.entries.into_keys().collect();
		TablePool::new(entries)
	}
}

impl ConstantPoolBuilder for PoolBuilder {
	fn put_utf8(&mut self, s: &JavaStr) -> Result<u16> {
		self.put(PoolEntry::Utf8(s.to_owned()))
	}

	fn put_class(&mut self, name: &ClassName) -> Result<u16> {
		let name_index = self.put_utf8(name.as_java_str())?;
		self.put(PoolEntry::Class { name_index })
	}

	fn put_module(&mut self, name: &ModuleName) -> Result<u16> {
		let name_index = self.put_utf8(name.as_java_str())?;
		self.put(PoolEntry::Module { name_index })
	}

	fn put_package(&mut self, name: &PackageName) -> Result<u16> {
		let name_index = self.put_utf8(name.as_java_str())?;
		self.put(PoolEntry::Package { name_index })
	}

	fn put_name_and_type(&mut self, entry: &NameAndTypeEntry) -> Result<u16> {
		let name_index = self.put_utf8(&entry.name)?;
		let descriptor_index = self.put_utf8(&entry.descriptor)?;
		self.put(PoolEntry::NameAndType { name_index, descriptor_index })
	}

	fn put_constant_value(&mut self, value: &ConstantValueEntry) -> Result<u16> {
		match value {
			ConstantValueEntry::Integer(value) => self.put(PoolEntry::Integer(*value)),
			ConstantValueEntry::Float(value) => self.put(PoolEntry::Float(value.to_bits())),
			ConstantValueEntry::Long(value) => self.put(PoolEntry::Long(*value)),
			ConstantValueEntry::Double(value) => self.put(PoolEntry::Double(value.to_bits())),
			ConstantValueEntry::String(value) => {
				let string_index = self.put_utf8(value)?;
				self.put(PoolEntry::String { string_index })
			},
		}
	}

	fn put_method_handle(&mut self, handle: &MethodHandleEntry) -> Result<u16> {
		let (reference_kind, reference_index) = match handle {
			MethodHandleEntry::GetField(field) => (method_handle::GET_FIELD, self.put_field_ref(field)?),
			MethodHandleEntry::GetStatic(field) => (method_handle::GET_STATIC, self.put_field_ref(field)?),
			MethodHandleEntry::PutField(field) => (method_handle::PUT_FIELD, self.put_field_ref(field)?),
			MethodHandleEntry::PutStatic(field) => (method_handle::PUT_STATIC, self.put_field_ref(field)?),
			MethodHandleEntry::InvokeVirtual(method) => (method_handle::INVOKE_VIRTUAL, self.put_method_ref(method, false)?),
			MethodHandleEntry::InvokeStatic(method, is_interface) => (method_handle::INVOKE_STATIC, self.put_method_ref(method, *is_interface)?),
			MethodHandleEntry::InvokeSpecial(method, is_interface) => (method_handle::INVOKE_SPECIAL, self.put_method_ref(method, *is_interface)?),
			MethodHandleEntry::NewInvokeSpecial(method) => (method_handle::NEW_INVOKE_SPECIAL, self.put_method_ref(method, false)?),
			MethodHandleEntry::InvokeInterface(method) => (method_handle::INVOKE_INTERFACE, self.put_method_ref(method, true)?),
		};
		self.put(PoolEntry::MethodHandle { reference_kind, reference_index })
	}

	fn put_loadable(&mut self, value: &LoadableConstant) -> Result<u16> {
		match value {
			LoadableConstant::Integer(value) => self.put(PoolEntry::Integer(*value)),
			LoadableConstant::Float(value) => self.put(PoolEntry::Float(value.to_bits())),
			LoadableConstant::Long(value) => self.put(PoolEntry::Long(*value)),
			LoadableConstant::Double(value) => self.put(PoolEntry::Double(value.to_bits())),
			LoadableConstant::Class(name) => self.put_class(name),
			LoadableConstant::String(value) => {
				let string_index = self.put_utf8(value)?;
				self.put(PoolEntry::String { string_index })
			},
			LoadableConstant::MethodHandle(handle) => self.put_method_handle(handle),
			LoadableConstant::MethodType(descriptor) => {
				let descriptor_index = self.put_utf8(descriptor.as_java_str())?;
				self.put(PoolEntry::MethodType { descriptor_index })
			},
			LoadableConstant::Dynamic(dynamic) => {
				let name_and_type_index = self.put_name_and_type(&NameAndTypeEntry {
					name: dynamic.name.clone(),
					descriptor: dynamic.descriptor.as_java_str().to_owned(),
				})?;
				self.put(PoolEntry::Dynamic {
					bootstrap_method_attribute_index: dynamic.bootstrap_method_index,
					name_and_type_index,
				})
			},
		}
	}

	fn put_bootstrap_method(&mut self, method: BootstrapMethodInfo) -> Result<u16> {
		if let Some(index) = self.bootstrap_methods.iter().position(|existing| *existing == method) {
			return Ok(index as u16);
		}
		let index = u16::try_from(self.bootstrap_methods.len())
			.map_err(|_| Error::UnsupportedBuilderOperation("bootstrap method table grew past 65535 entries".to_string()))?;
		self.bootstrap_methods.push(method);
		Ok(index)
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn tag_mismatch_is_reported() {
		let pool = TablePool::new(vec![
			PoolEntry::Utf8(JavaString::from("java/lang/Thread")),
			PoolEntry::Class { name_index: 1 },
		]);
		assert_eq!(pool.class(2).expect("index 2 is a Class entry").to_string(), "java/lang/Thread");

		let error = pool.class(1).expect_err("index 1 is a Utf8 entry");
		assert!(matches!(error, Error::ConstantPoolTypeMismatch { index: 1, .. }));
	}

	#[test]
	fn wide_entries_take_two_slots() {
		let pool = TablePool::new(vec![
			PoolEntry::Long(42),
			PoolEntry::Integer(7),
		]);
		assert_eq!(pool.constant_value(1).expect("long at 1"), ConstantValueEntry::Long(42));
		assert!(pool.constant_value(2).is_err());
		assert_eq!(pool.constant_value(3).expect("integer at 3"), ConstantValueEntry::Integer(7));
	}

	#[test]
	fn builder_interns() {
		let mut pool = PoolBuilder::new();
		let name = ClassName::try_from("java/io/IOException").expect("valid");
		let first = pool.put_class(&name).expect("interned");
		let second = pool.put_class(&name).expect("interned");
		assert_eq!(first, second);

		let table = pool.into_table_pool();
		assert_eq!(table.class(first).expect("still there"), name);
	}

	#[test]
	fn builder_round_trips_values() {
		let mut pool = PoolBuilder::new();
		let index = pool.put_constant_value(&ConstantValueEntry::Double(1.25)).expect("interned");
		let table = pool.into_table_pool();
		assert_eq!(table.constant_value(index).expect("double"), ConstantValueEntry::Double(1.25));
	}
}
