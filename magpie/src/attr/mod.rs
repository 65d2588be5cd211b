//! The attributes of the class file format, one type per kind.
//!
//! Every attribute comes in two lifecycles behind one accessor surface:
//!
//! - *bound*: produced by [`read_attribute_list`], backed by a slice of the
//!   original buffer plus the constant pool and label resolver it was read
//!   with. Nothing beyond the attribute headers is decoded up front; each
//!   accessor decodes its payload on first use and caches the result.
//! - *unbound*: built in memory through the `of` constructors, owning its
//!   data outright, for assembling a new or transformed class file.
//!
//! A bound attribute never touches the bytes of a sibling attribute, so one
//! corrupt attribute spoils exactly the accessors that need it and nothing
//! else.

use std::fmt::{Debug, Formatter};
use std::sync::OnceLock;
use java_string::JavaStr;
use log::debug;
use crate::bytes::SliceReader;
use crate::constants::attribute;
use crate::error::{Error, Result};
use crate::labels::LabelResolver;
use crate::pool::ConstantPool;

pub mod annotations;
pub mod bootstrap;
pub mod character_range;
pub mod class_shape;
pub mod code;
pub mod debug;
pub mod encode;
pub mod mapper;
pub mod member;
pub mod module;
pub mod stack_map;
pub mod unknown;

use crate::attr::annotations::{
	AnnotationDefaultAttribute, RuntimeInvisibleAnnotationsAttribute, RuntimeInvisibleParameterAnnotationsAttribute,
	RuntimeInvisibleTypeAnnotationsAttribute, RuntimeVisibleAnnotationsAttribute,
	RuntimeVisibleParameterAnnotationsAttribute, RuntimeVisibleTypeAnnotationsAttribute,
};
use crate::attr::bootstrap::BootstrapMethodsAttribute;
use crate::attr::character_range::CharacterRangeTableAttribute;
use crate::attr::class_shape::{
	EnclosingMethodAttribute, InnerClassesAttribute, NestHostAttribute, NestMembersAttribute,
	PermittedSubclassesAttribute, RecordAttribute,
};
use crate::attr::code::CodeAttribute;
use crate::attr::debug::{
	CompilationIdAttribute, LineNumberTableAttribute, LocalVariableTableAttribute, LocalVariableTypeTableAttribute,
	SourceDebugExtensionAttribute, SourceFileAttribute, SourceIdAttribute,
};
use crate::attr::mapper::{AttributeMapper, AttributeStability, CustomMappers};
use crate::attr::member::{
	ConstantValueAttribute, DeprecatedAttribute, ExceptionsAttribute, MethodParametersAttribute, SignatureAttribute,
	SyntheticAttribute,
};
use crate::attr::module::{
	ModuleAttribute, ModuleHashesAttribute, ModuleMainClassAttribute, ModulePackagesAttribute,
	ModuleResolutionAttribute, ModuleTargetAttribute,
};
use crate::attr::stack_map::{StackMapTableAttribute, VerificationType};
use crate::attr::unknown::UnknownAttribute;

/// The external collaborators a bound attribute was read against.
///
/// A bound attribute borrows these for as long as it lives; it never owns the
/// buffer, the pool or the resolver.
#[derive(Copy, Clone)]
pub struct ReadContext<'a> {
	pub pool: &'a dyn ConstantPool,
	/// The resolver of the enclosing code array, for attributes inside `Code`.
	pub labels: Option<&'a dyn LabelResolver>,
	/// The verification types of the method's arguments (plus the receiver),
	/// which seed the expansion of the first stack map frame.
	pub frame_locals: Option<&'a [VerificationType]>,
	/// Metadata for nonstandard attribute kinds the caller knows about.
	pub custom: Option<&'a CustomMappers>,
}

impl<'a> ReadContext<'a> {
	pub fn new(pool: &'a dyn ConstantPool) -> ReadContext<'a> {
		ReadContext { pool, labels: None, frame_locals: None, custom: None }
	}

	pub fn with_labels(self, labels: &'a dyn LabelResolver) -> ReadContext<'a> {
		ReadContext { labels: Some(labels), ..self }
	}

	pub fn with_frame_locals(self, frame_locals: &'a [VerificationType]) -> ReadContext<'a> {
		ReadContext { frame_locals: Some(frame_locals), ..self }
	}

	pub fn with_custom_mappers(self, custom: &'a CustomMappers) -> ReadContext<'a> {
		ReadContext { custom: Some(custom), ..self }
	}
}

impl<'a> Debug for ReadContext<'a> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ReadContext")
			.field("labels", &self.labels.is_some())
			.field("frame_locals", &self.frame_locals.is_some())
			.finish_non_exhaustive()
	}
}

/// The label resolver of the enclosing code array, for attribute kinds that
/// cannot be decoded without one.
pub(crate) fn require_labels<'a>(ctx: ReadContext<'a>, name: &'static str) -> Result<&'a dyn LabelResolver> {
	ctx.labels.ok_or_else(|| Error::malformed(name, "no label resolver for the enclosing code array"))
}

/// The backing of one attribute: either a byte range still to be decoded, or
/// the materialized value.
///
/// Decoding is deterministic and side effect free, so the cache cell accepts
/// whichever of several racing readers gets there first; the losers recompute
/// an equal value and throw it away.
pub(crate) enum Payload<'a, T> {
	Bound {
		bytes: &'a [u8],
		ctx: ReadContext<'a>,
		cache: OnceLock<Result<T>>,
	},
	Unbound(T),
}

impl<'a, T> Payload<'a, T> {
	pub(crate) fn bound(bytes: &'a [u8], ctx: ReadContext<'a>) -> Payload<'a, T> {
		Payload::Bound { bytes, ctx, cache: OnceLock::new() }
	}

	pub(crate) fn unbound(value: T) -> Payload<'a, T> {
		Payload::Unbound(value)
	}

	pub(crate) fn get(&self, decode: impl FnOnce(&'a [u8], ReadContext<'a>) -> Result<T>) -> Result<&T> {
		match self {
			Payload::Unbound(value) => Ok(value),
			Payload::Bound { bytes, ctx, cache } => {
				match cache.get_or_init(|| decode(*bytes, *ctx)) {
					Ok(value) => Ok(value),
					Err(error) => Err(error.clone()),
				}
			},
		}
	}

	pub(crate) fn raw(&self) -> Option<&'a [u8]> {
		match self {
			Payload::Bound { bytes, .. } => Some(*bytes),
			Payload::Unbound(_) => None,
		}
	}
}

impl<'a, T: Debug> Debug for Payload<'a, T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Payload::Unbound(value) => value.fmt(f),
			Payload::Bound { bytes, cache, .. } => match cache.get() {
				Some(Ok(value)) => value.fmt(f),
				Some(Err(error)) => write!(f, "<undecodable: {error}>"),
				None => write!(f, "<{} bytes, not yet decoded>", bytes.len()),
			},
		}
	}
}

/// Generates the bound constructor, the cached payload accessor, raw byte
/// access, and content-based equality for an attribute struct wrapping a
/// [`Payload`] field.
macro_rules! attribute_payload {
	($attr:ident, $payload:ty, $decode:path) => {
		impl<'a> $attr<'a> {
			pub(crate) fn bound(bytes: &'a [u8], ctx: crate::attr::ReadContext<'a>) -> $attr<'a> {
				$attr { payload: crate::attr::Payload::bound(bytes, ctx) }
			}

			fn get(&self) -> crate::error::Result<&$payload> {
				self.payload.get($decode)
			}

			/// The raw payload, as long as this view is still backed by the
			/// buffer it was read from.
			pub fn raw_bytes(&self) -> Option<&'a [u8]> {
				self.payload.raw()
			}
		}

		/// Equality is by decoded content, across lifecycles: a bound view and
		/// a hand-built value for the same data are equal. A view whose
		/// payload doesn't decode compares unequal to everything, itself
		/// included.
		impl<'a, 'b> PartialEq<$attr<'b>> for $attr<'a> {
			fn eq(&self, other: &$attr<'b>) -> bool {
				match (self.get(), other.get()) {
					(Ok(a), Ok(b)) => a == b,
					_ => false,
				}
			}
		}

		impl<'a> std::fmt::Debug for $attr<'a> {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.debug_tuple(stringify!($attr)).field(&self.payload).finish()
			}
		}
	}
}
pub(crate) use attribute_payload;

/// Any attribute of the class file format.
///
/// This is the closed set of kinds the format defines (JVMS 4.7, plus the
/// `javac` and JDK build tool extras); anything else lands in
/// [`Attribute::Unknown`] with its payload preserved byte for byte.
#[derive(Debug)]
pub enum Attribute<'a> {
	AnnotationDefault(AnnotationDefaultAttribute<'a>),
	BootstrapMethods(BootstrapMethodsAttribute<'a>),
	CharacterRangeTable(CharacterRangeTableAttribute<'a>),
	Code(CodeAttribute<'a>),
	CompilationId(CompilationIdAttribute<'a>),
	ConstantValue(ConstantValueAttribute<'a>),
	Deprecated(DeprecatedAttribute),
	EnclosingMethod(EnclosingMethodAttribute<'a>),
	Exceptions(ExceptionsAttribute<'a>),
	InnerClasses(InnerClassesAttribute<'a>),
	LineNumberTable(LineNumberTableAttribute<'a>),
	LocalVariableTable(LocalVariableTableAttribute<'a>),
	LocalVariableTypeTable(LocalVariableTypeTableAttribute<'a>),
	MethodParameters(MethodParametersAttribute<'a>),
	Module(ModuleAttribute<'a>),
	ModuleHashes(ModuleHashesAttribute<'a>),
	ModuleMainClass(ModuleMainClassAttribute<'a>),
	ModulePackages(ModulePackagesAttribute<'a>),
	ModuleResolution(ModuleResolutionAttribute<'a>),
	ModuleTarget(ModuleTargetAttribute<'a>),
	NestHost(NestHostAttribute<'a>),
	NestMembers(NestMembersAttribute<'a>),
	PermittedSubclasses(PermittedSubclassesAttribute<'a>),
	Record(RecordAttribute<'a>),
	RuntimeInvisibleAnnotations(RuntimeInvisibleAnnotationsAttribute<'a>),
	RuntimeInvisibleParameterAnnotations(RuntimeInvisibleParameterAnnotationsAttribute<'a>),
	RuntimeInvisibleTypeAnnotations(RuntimeInvisibleTypeAnnotationsAttribute<'a>),
	RuntimeVisibleAnnotations(RuntimeVisibleAnnotationsAttribute<'a>),
	RuntimeVisibleParameterAnnotations(RuntimeVisibleParameterAnnotationsAttribute<'a>),
	RuntimeVisibleTypeAnnotations(RuntimeVisibleTypeAnnotationsAttribute<'a>),
	Signature(SignatureAttribute<'a>),
	SourceDebugExtension(SourceDebugExtensionAttribute<'a>),
	SourceFile(SourceFileAttribute<'a>),
	SourceId(SourceIdAttribute<'a>),
	StackMapTable(StackMapTableAttribute<'a>),
	Synthetic(SyntheticAttribute),
	Unknown(UnknownAttribute<'a>),
}

impl<'a> Attribute<'a> {
	/// The `attribute_name_index` string of this attribute.
	pub fn name(&self) -> &JavaStr {
		match self {
			Attribute::AnnotationDefault(_) => JavaStr::from_str(attribute::ANNOTATION_DEFAULT),
			Attribute::BootstrapMethods(_) => JavaStr::from_str(attribute::BOOTSTRAP_METHODS),
			Attribute::CharacterRangeTable(_) => JavaStr::from_str(attribute::CHARACTER_RANGE_TABLE),
			Attribute::Code(_) => JavaStr::from_str(attribute::CODE),
			Attribute::CompilationId(_) => JavaStr::from_str(attribute::COMPILATION_ID),
			Attribute::ConstantValue(_) => JavaStr::from_str(attribute::CONSTANT_VALUE),
			Attribute::Deprecated(_) => JavaStr::from_str(attribute::DEPRECATED),
			Attribute::EnclosingMethod(_) => JavaStr::from_str(attribute::ENCLOSING_METHOD),
			Attribute::Exceptions(_) => JavaStr::from_str(attribute::EXCEPTIONS),
			Attribute::InnerClasses(_) => JavaStr::from_str(attribute::INNER_CLASSES),
			Attribute::LineNumberTable(_) => JavaStr::from_str(attribute::LINE_NUMBER_TABLE),
			Attribute::LocalVariableTable(_) => JavaStr::from_str(attribute::LOCAL_VARIABLE_TABLE),
			Attribute::LocalVariableTypeTable(_) => JavaStr::from_str(attribute::LOCAL_VARIABLE_TYPE_TABLE),
			Attribute::MethodParameters(_) => JavaStr::from_str(attribute::METHOD_PARAMETERS),
			Attribute::Module(_) => JavaStr::from_str(attribute::MODULE),
			Attribute::ModuleHashes(_) => JavaStr::from_str(attribute::MODULE_HASHES),
			Attribute::ModuleMainClass(_) => JavaStr::from_str(attribute::MODULE_MAIN_CLASS),
			Attribute::ModulePackages(_) => JavaStr::from_str(attribute::MODULE_PACKAGES),
			Attribute::ModuleResolution(_) => JavaStr::from_str(attribute::MODULE_RESOLUTION),
			Attribute::ModuleTarget(_) => JavaStr::from_str(attribute::MODULE_TARGET),
			Attribute::NestHost(_) => JavaStr::from_str(attribute::NEST_HOST),
			Attribute::NestMembers(_) => JavaStr::from_str(attribute::NEST_MEMBERS),
			Attribute::PermittedSubclasses(_) => JavaStr::from_str(attribute::PERMITTED_SUBCLASSES),
			Attribute::Record(_) => JavaStr::from_str(attribute::RECORD),
			Attribute::RuntimeInvisibleAnnotations(_) => JavaStr::from_str(attribute::RUNTIME_INVISIBLE_ANNOTATIONS),
			Attribute::RuntimeInvisibleParameterAnnotations(_) => JavaStr::from_str(attribute::RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS),
			Attribute::RuntimeInvisibleTypeAnnotations(_) => JavaStr::from_str(attribute::RUNTIME_INVISIBLE_TYPE_ANNOTATIONS),
			Attribute::RuntimeVisibleAnnotations(_) => JavaStr::from_str(attribute::RUNTIME_VISIBLE_ANNOTATIONS),
			Attribute::RuntimeVisibleParameterAnnotations(_) => JavaStr::from_str(attribute::RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS),
			Attribute::RuntimeVisibleTypeAnnotations(_) => JavaStr::from_str(attribute::RUNTIME_VISIBLE_TYPE_ANNOTATIONS),
			Attribute::Signature(_) => JavaStr::from_str(attribute::SIGNATURE),
			Attribute::SourceDebugExtension(_) => JavaStr::from_str(attribute::SOURCE_DEBUG_EXTENSION),
			Attribute::SourceFile(_) => JavaStr::from_str(attribute::SOURCE_FILE),
			Attribute::SourceId(_) => JavaStr::from_str(attribute::SOURCE_ID),
			Attribute::StackMapTable(_) => JavaStr::from_str(attribute::STACK_MAP_TABLE),
			Attribute::Synthetic(_) => JavaStr::from_str(attribute::SYNTHETIC),
			Attribute::Unknown(unknown) => unknown.name(),
		}
	}

	/// The registry entry of this attribute's kind, `None` for unknown kinds.
	pub fn mapper(&self) -> Option<&'static AttributeMapper> {
		match self {
			Attribute::Unknown(_) => None,
			_ => AttributeMapper::by_name(self.name()),
		}
	}

	/// How safely the raw payload of this attribute survives a transform.
	pub fn stability(&self) -> AttributeStability {
		match self {
			Attribute::Unknown(unknown) => unknown.stability(),
			_ => match self.mapper() {
				Some(mapper) => mapper.stability,
				None => AttributeStability::Unstable,
			},
		}
	}

	/// Whether several attributes of this kind may sit on one element.
	pub fn allow_multiple(&self) -> bool {
		match self {
			Attribute::Unknown(unknown) => unknown.allow_multiple(),
			_ => match self.mapper() {
				Some(mapper) => mapper.allow_multiple,
				None => false,
			},
		}
	}

	/// The raw payload, for views still backed by the buffer they were read
	/// from. Unbound values return `None` and must be re-encoded.
	pub fn raw_bytes(&self) -> Option<&'a [u8]> {
		match self {
			Attribute::AnnotationDefault(attr) => attr.raw_bytes(),
			Attribute::BootstrapMethods(attr) => attr.raw_bytes(),
			Attribute::CharacterRangeTable(attr) => attr.raw_bytes(),
			Attribute::Code(attr) => attr.raw_bytes(),
			Attribute::CompilationId(attr) => attr.raw_bytes(),
			Attribute::ConstantValue(attr) => attr.raw_bytes(),
			// Both marker attributes have an empty payload.
			Attribute::Deprecated(_) => Some(&[]),
			Attribute::EnclosingMethod(attr) => attr.raw_bytes(),
			Attribute::Exceptions(attr) => attr.raw_bytes(),
			Attribute::InnerClasses(attr) => attr.raw_bytes(),
			Attribute::LineNumberTable(attr) => attr.raw_bytes(),
			Attribute::LocalVariableTable(attr) => attr.raw_bytes(),
			Attribute::LocalVariableTypeTable(attr) => attr.raw_bytes(),
			Attribute::MethodParameters(attr) => attr.raw_bytes(),
			Attribute::Module(attr) => attr.raw_bytes(),
			Attribute::ModuleHashes(attr) => attr.raw_bytes(),
			Attribute::ModuleMainClass(attr) => attr.raw_bytes(),
			Attribute::ModulePackages(attr) => attr.raw_bytes(),
			Attribute::ModuleResolution(attr) => attr.raw_bytes(),
			Attribute::ModuleTarget(attr) => attr.raw_bytes(),
			Attribute::NestHost(attr) => attr.raw_bytes(),
			Attribute::NestMembers(attr) => attr.raw_bytes(),
			Attribute::PermittedSubclasses(attr) => attr.raw_bytes(),
			Attribute::Record(attr) => attr.raw_bytes(),
			Attribute::RuntimeInvisibleAnnotations(attr) => attr.raw_bytes(),
			Attribute::RuntimeInvisibleParameterAnnotations(attr) => attr.raw_bytes(),
			Attribute::RuntimeInvisibleTypeAnnotations(attr) => attr.raw_bytes(),
			Attribute::RuntimeVisibleAnnotations(attr) => attr.raw_bytes(),
			Attribute::RuntimeVisibleParameterAnnotations(attr) => attr.raw_bytes(),
			Attribute::RuntimeVisibleTypeAnnotations(attr) => attr.raw_bytes(),
			Attribute::Signature(attr) => attr.raw_bytes(),
			Attribute::SourceDebugExtension(attr) => attr.raw_bytes(),
			Attribute::SourceFile(attr) => attr.raw_bytes(),
			Attribute::SourceId(attr) => attr.raw_bytes(),
			Attribute::StackMapTable(attr) => attr.raw_bytes(),
			Attribute::Synthetic(_) => Some(&[]),
			Attribute::Unknown(unknown) => unknown.raw_bytes(),
		}
	}
}

/// Kinds compare only against themselves, each by its own decoded-content
/// equality; the two lifetimes may differ, so a freshly read view can be
/// checked against the value it was encoded from.
impl<'a, 'b> PartialEq<Attribute<'b>> for Attribute<'a> {
	fn eq(&self, other: &Attribute<'b>) -> bool {
		match (self, other) {
			(Attribute::AnnotationDefault(a), Attribute::AnnotationDefault(b)) => a == b,
			(Attribute::BootstrapMethods(a), Attribute::BootstrapMethods(b)) => a == b,
			(Attribute::CharacterRangeTable(a), Attribute::CharacterRangeTable(b)) => a == b,
			(Attribute::Code(a), Attribute::Code(b)) => a == b,
			(Attribute::CompilationId(a), Attribute::CompilationId(b)) => a == b,
			(Attribute::ConstantValue(a), Attribute::ConstantValue(b)) => a == b,
			(Attribute::Deprecated(a), Attribute::Deprecated(b)) => a == b,
			(Attribute::EnclosingMethod(a), Attribute::EnclosingMethod(b)) => a == b,
			(Attribute::Exceptions(a), Attribute::Exceptions(b)) => a == b,
			(Attribute::InnerClasses(a), Attribute::InnerClasses(b)) => a == b,
			(Attribute::LineNumberTable(a), Attribute::LineNumberTable(b)) => a == b,
			(Attribute::LocalVariableTable(a), Attribute::LocalVariableTable(b)) => a == b,
			(Attribute::LocalVariableTypeTable(a), Attribute::LocalVariableTypeTable(b)) => a == b,
			(Attribute::MethodParameters(a), Attribute::MethodParameters(b)) => a == b,
			(Attribute::Module(a), Attribute::Module(b)) => a == b,
			(Attribute::ModuleHashes(a), Attribute::ModuleHashes(b)) => a == b,
			(Attribute::ModuleMainClass(a), Attribute::ModuleMainClass(b)) => a == b,
			(Attribute::ModulePackages(a), Attribute::ModulePackages(b)) => a == b,
			(Attribute::ModuleResolution(a), Attribute::ModuleResolution(b)) => a == b,
			(Attribute::ModuleTarget(a), Attribute::ModuleTarget(b)) => a == b,
			(Attribute::NestHost(a), Attribute::NestHost(b)) => a == b,
			(Attribute::NestMembers(a), Attribute::NestMembers(b)) => a == b,
			(Attribute::PermittedSubclasses(a), Attribute::PermittedSubclasses(b)) => a == b,
			(Attribute::Record(a), Attribute::Record(b)) => a == b,
			(Attribute::RuntimeInvisibleAnnotations(a), Attribute::RuntimeInvisibleAnnotations(b)) => a == b,
			(Attribute::RuntimeInvisibleParameterAnnotations(a), Attribute::RuntimeInvisibleParameterAnnotations(b)) => a == b,
			(Attribute::RuntimeInvisibleTypeAnnotations(a), Attribute::RuntimeInvisibleTypeAnnotations(b)) => a == b,
			(Attribute::RuntimeVisibleAnnotations(a), Attribute::RuntimeVisibleAnnotations(b)) => a == b,
			(Attribute::RuntimeVisibleParameterAnnotations(a), Attribute::RuntimeVisibleParameterAnnotations(b)) => a == b,
			(Attribute::RuntimeVisibleTypeAnnotations(a), Attribute::RuntimeVisibleTypeAnnotations(b)) => a == b,
			(Attribute::Signature(a), Attribute::Signature(b)) => a == b,
			(Attribute::SourceDebugExtension(a), Attribute::SourceDebugExtension(b)) => a == b,
			(Attribute::SourceFile(a), Attribute::SourceFile(b)) => a == b,
			(Attribute::SourceId(a), Attribute::SourceId(b)) => a == b,
			(Attribute::StackMapTable(a), Attribute::StackMapTable(b)) => a == b,
			(Attribute::Synthetic(a), Attribute::Synthetic(b)) => a == b,
			(Attribute::Unknown(a), Attribute::Unknown(b)) => a == b,
			_ => false,
		}
	}
}

/// Reads a full `attributes_count` plus `attributes[]` table.
///
/// Each entry costs O(1) here: the payload is sliced by its length header and
/// handed to the kind's bound constructor, which does at most fixed-layout
/// length checks. Decode failures of the annotation table kinds drop the
/// single attribute (with a `debug!` trace) instead of failing the read; all
/// other kinds propagate.
pub fn read_attribute_list<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<Attribute<'a>>> {
	let mut reader = SliceReader::new("attribute table", bytes);
	let attributes = read_attributes_from(&mut reader, ctx)?;
	reader.expect_end()?;
	Ok(attributes)
}

/// Like [`read_attribute_list`], but reading mid-stream and leaving whatever
/// follows the table alone. Used for the tables nested in `Code` payloads and
/// record components.
pub(crate) fn read_attributes_from<'a>(reader: &mut SliceReader<'a>, ctx: ReadContext<'a>) -> Result<Vec<Attribute<'a>>> {
	let count = reader.read_u16()?;
	let mut attributes = Vec::with_capacity((count as usize).min(64));
	for _ in 0..count {
		let name_index = reader.read_u16()?;
		let name = ctx.pool.utf8(name_index)?;
		let length = reader.read_u32()? as usize;
		let payload = reader.read_slice(length)?;

		match AttributeMapper::by_name(name.as_java_str()) {
			Some(mapper) => match (mapper.decode)(payload, ctx) {
				Ok(attribute) => attributes.push(attribute),
				Err(error) if mapper.ignorable_when_malformed => {
					debug!("dropping malformed {} attribute: {error}", mapper.name);
				},
				Err(error) => return Err(error),
			},
			None => {
				let meta = ctx.custom.and_then(|custom| custom.get(name.as_java_str()));
				attributes.push(Attribute::Unknown(UnknownAttribute::bound(name, payload, meta)));
			},
		}
	}
	Ok(attributes)
}
