//! The per-kind codec registry: one [`AttributeMapper`] per attribute name,
//! with the multiplicity, stability and placement metadata the builder and
//! writer layers work from.

use std::collections::HashMap;
use java_string::{JavaStr, JavaString};
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
use crate::attr::member::{
	ConstantValueAttribute, DeprecatedAttribute, ExceptionsAttribute, MethodParametersAttribute, SignatureAttribute,
	SyntheticAttribute,
};
use crate::attr::module::{
	ModuleAttribute, ModuleHashesAttribute, ModuleMainClassAttribute, ModulePackagesAttribute,
	ModuleResolutionAttribute, ModuleTargetAttribute,
};
use crate::attr::stack_map::StackMapTableAttribute;
use crate::attr::{Attribute, ReadContext};
use crate::constants::attribute;
use crate::error::{Error, Result};

/// How safely an attribute's raw bytes can be reused unmodified across a
/// read–transform–write pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AttributeStability {
	/// The payload references nothing outside itself; always reusable.
	Stateless,
	/// The payload holds constant pool indices; reusable iff the pool entries
	/// survive at the same indices.
	ConstantPoolRefs,
	/// The payload holds bytecode offsets; reusable iff the code array is
	/// byte-identical.
	Labels,
	/// The payload embeds arbitrary indices this crate doesn't track (or is
	/// entirely opaque); reusable only when nothing at all changed.
	Unstable,
}

/// What a transformation pipeline kept intact, from the point of view of one
/// element being re-emitted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TransformContext {
	/// Every constant pool entry of the source survives at its old index.
	pub constant_pool_preserved: bool,
	/// The enclosing code array is byte-identical.
	pub code_array_preserved: bool,
}

impl TransformContext {
	/// A plain read–write cycle with no changes anywhere.
	pub fn identity() -> TransformContext {
		TransformContext { constant_pool_preserved: true, code_array_preserved: true }
	}
}

impl AttributeStability {
	/// Whether a verbatim byte copy is sound under the given transform.
	pub fn is_bulk_copy_safe(self, transform: &TransformContext) -> bool {
		match self {
			AttributeStability::Stateless => true,
			AttributeStability::ConstantPoolRefs => transform.constant_pool_preserved,
			AttributeStability::Labels => transform.code_array_preserved,
			AttributeStability::Unstable => transform.constant_pool_preserved && transform.code_array_preserved,
		}
	}
}

/// The element kinds an attribute may be attached to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttachPoints {
	pub class: bool,
	pub field: bool,
	pub method: bool,
	pub code: bool,
	pub record_component: bool,
}

impl AttachPoints {
	const NONE: AttachPoints = AttachPoints {
		class: false,
		field: false,
		method: false,
		code: false,
		record_component: false,
	};
	const CLASS: AttachPoints = AttachPoints { class: true, ..AttachPoints::NONE };
	const FIELD: AttachPoints = AttachPoints { field: true, ..AttachPoints::NONE };
	const METHOD: AttachPoints = AttachPoints { method: true, ..AttachPoints::NONE };
	const CODE: AttachPoints = AttachPoints { code: true, ..AttachPoints::NONE };
	const MEMBERS: AttachPoints = AttachPoints { class: true, field: true, method: true, ..AttachPoints::NONE };
	const DECLARATIONS: AttachPoints = AttachPoints { class: true, field: true, method: true, record_component: true, ..AttachPoints::NONE };
	const EVERYWHERE: AttachPoints = AttachPoints { class: true, field: true, method: true, code: true, record_component: true };
}

pub(crate) type DecodeFn = for<'a> fn(&'a [u8], ReadContext<'a>) -> Result<Attribute<'a>>;

/// The codec and metadata for one attribute kind.
pub struct AttributeMapper {
	pub name: &'static str,
	/// Whether several attributes of this kind may sit on one element. When
	/// `false`, the attribute set keeps only the last one supplied.
	pub allow_multiple: bool,
	pub stability: AttributeStability,
	pub attaches_to: AttachPoints,
	/// Kinds the format allows a reader to drop when their payload is broken,
	/// rather than failing the whole read.
	pub(crate) ignorable_when_malformed: bool,
	pub(crate) decode: DecodeFn,
}

impl AttributeMapper {
	/// Looks up the registry entry for an attribute name read from a stream.
	pub fn by_name(name: &JavaStr) -> Option<&'static AttributeMapper> {
		REGISTRY.iter().copied().find(|mapper| JavaStr::from_str(mapper.name) == name)
	}

	pub fn ignorable_when_malformed(&self) -> bool {
		self.ignorable_when_malformed
	}
}

impl std::fmt::Debug for AttributeMapper {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AttributeMapper")
			.field("name", &self.name)
			.field("allow_multiple", &self.allow_multiple)
			.field("stability", &self.stability)
			.finish_non_exhaustive()
	}
}

/// Metadata for a nonstandard attribute kind, supplied by the caller through
/// [`ReadContext::with_custom_mappers`]. The payload of a matching attribute
/// stays raw; only multiplicity and stability are taken from here.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CustomAttributeMeta {
	pub allow_multiple: bool,
	pub stability: AttributeStability,
}

/// A caller-supplied name → metadata table for attribute kinds outside the
/// standard set. Deliberately not a process-wide registry: custom kinds only
/// exist for the reads that ask for them.
#[derive(Debug, Default)]
pub struct CustomMappers {
	map: HashMap<JavaString, CustomAttributeMeta>,
}

impl CustomMappers {
	pub fn new() -> CustomMappers {
		CustomMappers::default()
	}

	pub fn register(&mut self, name: JavaString, meta: CustomAttributeMeta) {
		self.map.insert(name, meta);
	}

	pub fn get(&self, name: &JavaStr) -> Option<&CustomAttributeMeta> {
		self.map.get(name)
	}
}

fn expect_length(name: &'static str, bytes: &[u8], expected: usize) -> Result<()> {
	if bytes.len() != expected {
		return Err(Error::malformed(
			name,
			format!("payload must be {expected} bytes, got {}", bytes.len()),
		));
	}
	Ok(())
}

fn bound_annotation_default<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	let attr = AnnotationDefaultAttribute::bound(bytes, ctx);
	attr.default_value()?;
	Ok(Attribute::AnnotationDefault(attr))
}

fn bound_bootstrap_methods<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::BootstrapMethods(BootstrapMethodsAttribute::bound(bytes, ctx)?))
}

fn bound_character_range_table<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::CharacterRangeTable(CharacterRangeTableAttribute::bound(bytes, ctx)))
}

fn bound_code<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::Code(CodeAttribute::bound(bytes, ctx)?))
}

fn bound_compilation_id<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	expect_length(attribute::COMPILATION_ID, bytes, 2)?;
	Ok(Attribute::CompilationId(CompilationIdAttribute::bound(bytes, ctx)))
}

fn bound_constant_value<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	expect_length(attribute::CONSTANT_VALUE, bytes, 2)?;
	Ok(Attribute::ConstantValue(ConstantValueAttribute::bound(bytes, ctx)))
}

fn bound_deprecated<'a>(bytes: &'a [u8], _ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	expect_length(attribute::DEPRECATED, bytes, 0)?;
	Ok(Attribute::Deprecated(DeprecatedAttribute))
}

fn bound_enclosing_method<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	expect_length(attribute::ENCLOSING_METHOD, bytes, 4)?;
	Ok(Attribute::EnclosingMethod(EnclosingMethodAttribute::bound(bytes, ctx)))
}

fn bound_exceptions<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::Exceptions(ExceptionsAttribute::bound(bytes, ctx)))
}

fn bound_inner_classes<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::InnerClasses(InnerClassesAttribute::bound(bytes, ctx)))
}

fn bound_line_number_table<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::LineNumberTable(LineNumberTableAttribute::bound(bytes, ctx)))
}

fn bound_local_variable_table<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::LocalVariableTable(LocalVariableTableAttribute::bound(bytes, ctx)))
}

fn bound_local_variable_type_table<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::LocalVariableTypeTable(LocalVariableTypeTableAttribute::bound(bytes, ctx)))
}

fn bound_method_parameters<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::MethodParameters(MethodParametersAttribute::bound(bytes, ctx)))
}

fn bound_module<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::Module(ModuleAttribute::bound(bytes, ctx)))
}

fn bound_module_hashes<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::ModuleHashes(ModuleHashesAttribute::bound(bytes, ctx)))
}

fn bound_module_main_class<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	expect_length(attribute::MODULE_MAIN_CLASS, bytes, 2)?;
	Ok(Attribute::ModuleMainClass(ModuleMainClassAttribute::bound(bytes, ctx)))
}

fn bound_module_packages<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::ModulePackages(ModulePackagesAttribute::bound(bytes, ctx)))
}

fn bound_module_resolution<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	expect_length(attribute::MODULE_RESOLUTION, bytes, 2)?;
	Ok(Attribute::ModuleResolution(ModuleResolutionAttribute::bound(bytes, ctx)))
}

fn bound_module_target<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	expect_length(attribute::MODULE_TARGET, bytes, 2)?;
	Ok(Attribute::ModuleTarget(ModuleTargetAttribute::bound(bytes, ctx)))
}

fn bound_nest_host<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	expect_length(attribute::NEST_HOST, bytes, 2)?;
	Ok(Attribute::NestHost(NestHostAttribute::bound(bytes, ctx)))
}

fn bound_nest_members<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::NestMembers(NestMembersAttribute::bound(bytes, ctx)))
}

fn bound_permitted_subclasses<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::PermittedSubclasses(PermittedSubclassesAttribute::bound(bytes, ctx)))
}

fn bound_record<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::Record(RecordAttribute::bound(bytes, ctx)))
}

fn bound_runtime_invisible_annotations<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	let attr = RuntimeInvisibleAnnotationsAttribute::bound(bytes, ctx);
	attr.annotations()?;
	Ok(Attribute::RuntimeInvisibleAnnotations(attr))
}

fn bound_runtime_invisible_parameter_annotations<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	let attr = RuntimeInvisibleParameterAnnotationsAttribute::bound(bytes, ctx);
	attr.parameter_annotations()?;
	Ok(Attribute::RuntimeInvisibleParameterAnnotations(attr))
}

fn bound_runtime_invisible_type_annotations<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	let attr = RuntimeInvisibleTypeAnnotationsAttribute::bound(bytes, ctx);
	attr.type_annotations()?;
	Ok(Attribute::RuntimeInvisibleTypeAnnotations(attr))
}

fn bound_runtime_visible_annotations<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	let attr = RuntimeVisibleAnnotationsAttribute::bound(bytes, ctx);
	attr.annotations()?;
	Ok(Attribute::RuntimeVisibleAnnotations(attr))
}

fn bound_runtime_visible_parameter_annotations<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	let attr = RuntimeVisibleParameterAnnotationsAttribute::bound(bytes, ctx);
	attr.parameter_annotations()?;
	Ok(Attribute::RuntimeVisibleParameterAnnotations(attr))
}

fn bound_runtime_visible_type_annotations<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	let attr = RuntimeVisibleTypeAnnotationsAttribute::bound(bytes, ctx);
	attr.type_annotations()?;
	Ok(Attribute::RuntimeVisibleTypeAnnotations(attr))
}

fn bound_signature<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	expect_length(attribute::SIGNATURE, bytes, 2)?;
	Ok(Attribute::Signature(SignatureAttribute::bound(bytes, ctx)))
}

fn bound_source_debug_extension<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::SourceDebugExtension(SourceDebugExtensionAttribute::bound(bytes, ctx)))
}

fn bound_source_file<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	expect_length(attribute::SOURCE_FILE, bytes, 2)?;
	Ok(Attribute::SourceFile(SourceFileAttribute::bound(bytes, ctx)))
}

fn bound_source_id<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	expect_length(attribute::SOURCE_ID, bytes, 2)?;
	Ok(Attribute::SourceId(SourceIdAttribute::bound(bytes, ctx)))
}

fn bound_stack_map_table<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	Ok(Attribute::StackMapTable(StackMapTableAttribute::bound(bytes, ctx)))
}

fn bound_synthetic<'a>(bytes: &'a [u8], _ctx: ReadContext<'a>) -> Result<Attribute<'a>> {
	expect_length(attribute::SYNTHETIC, bytes, 0)?;
	Ok(Attribute::Synthetic(SyntheticAttribute))
}

pub static ANNOTATION_DEFAULT: AttributeMapper = AttributeMapper {
	name: attribute::ANNOTATION_DEFAULT,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::METHOD,
	ignorable_when_malformed: true,
	decode: bound_annotation_default,
};

pub static BOOTSTRAP_METHODS: AttributeMapper = AttributeMapper {
	name: attribute::BOOTSTRAP_METHODS,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_bootstrap_methods,
};

pub static CHARACTER_RANGE_TABLE: AttributeMapper = AttributeMapper {
	name: attribute::CHARACTER_RANGE_TABLE,
	allow_multiple: true,
	stability: AttributeStability::Labels,
	attaches_to: AttachPoints::CODE,
	ignorable_when_malformed: false,
	decode: bound_character_range_table,
};

pub static CODE: AttributeMapper = AttributeMapper {
	name: attribute::CODE,
	allow_multiple: false,
	// The payload is the code array plus everything hanging off it; a
	// verbatim copy is only sound when nothing at all changed.
	stability: AttributeStability::Unstable,
	attaches_to: AttachPoints::METHOD,
	ignorable_when_malformed: false,
	decode: bound_code,
};

pub static COMPILATION_ID: AttributeMapper = AttributeMapper {
	name: attribute::COMPILATION_ID,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_compilation_id,
};

pub static CONSTANT_VALUE: AttributeMapper = AttributeMapper {
	name: attribute::CONSTANT_VALUE,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::FIELD,
	ignorable_when_malformed: false,
	decode: bound_constant_value,
};

pub static DEPRECATED: AttributeMapper = AttributeMapper {
	name: attribute::DEPRECATED,
	allow_multiple: false,
	stability: AttributeStability::Stateless,
	attaches_to: AttachPoints::MEMBERS,
	ignorable_when_malformed: false,
	decode: bound_deprecated,
};

pub static ENCLOSING_METHOD: AttributeMapper = AttributeMapper {
	name: attribute::ENCLOSING_METHOD,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_enclosing_method,
};

pub static EXCEPTIONS: AttributeMapper = AttributeMapper {
	name: attribute::EXCEPTIONS,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::METHOD,
	ignorable_when_malformed: false,
	decode: bound_exceptions,
};

pub static INNER_CLASSES: AttributeMapper = AttributeMapper {
	name: attribute::INNER_CLASSES,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_inner_classes,
};

pub static LINE_NUMBER_TABLE: AttributeMapper = AttributeMapper {
	name: attribute::LINE_NUMBER_TABLE,
	allow_multiple: true,
	stability: AttributeStability::Labels,
	attaches_to: AttachPoints::CODE,
	ignorable_when_malformed: false,
	decode: bound_line_number_table,
};

pub static LOCAL_VARIABLE_TABLE: AttributeMapper = AttributeMapper {
	name: attribute::LOCAL_VARIABLE_TABLE,
	allow_multiple: true,
	stability: AttributeStability::Labels,
	attaches_to: AttachPoints::CODE,
	ignorable_when_malformed: false,
	decode: bound_local_variable_table,
};

pub static LOCAL_VARIABLE_TYPE_TABLE: AttributeMapper = AttributeMapper {
	name: attribute::LOCAL_VARIABLE_TYPE_TABLE,
	allow_multiple: true,
	stability: AttributeStability::Labels,
	attaches_to: AttachPoints::CODE,
	ignorable_when_malformed: false,
	decode: bound_local_variable_type_table,
};

pub static METHOD_PARAMETERS: AttributeMapper = AttributeMapper {
	name: attribute::METHOD_PARAMETERS,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::METHOD,
	ignorable_when_malformed: false,
	decode: bound_method_parameters,
};

pub static MODULE: AttributeMapper = AttributeMapper {
	name: attribute::MODULE,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_module,
};

pub static MODULE_HASHES: AttributeMapper = AttributeMapper {
	name: attribute::MODULE_HASHES,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_module_hashes,
};

pub static MODULE_MAIN_CLASS: AttributeMapper = AttributeMapper {
	name: attribute::MODULE_MAIN_CLASS,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_module_main_class,
};

pub static MODULE_PACKAGES: AttributeMapper = AttributeMapper {
	name: attribute::MODULE_PACKAGES,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_module_packages,
};

pub static MODULE_RESOLUTION: AttributeMapper = AttributeMapper {
	name: attribute::MODULE_RESOLUTION,
	allow_multiple: false,
	stability: AttributeStability::Stateless,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_module_resolution,
};

pub static MODULE_TARGET: AttributeMapper = AttributeMapper {
	name: attribute::MODULE_TARGET,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_module_target,
};

pub static NEST_HOST: AttributeMapper = AttributeMapper {
	name: attribute::NEST_HOST,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_nest_host,
};

pub static NEST_MEMBERS: AttributeMapper = AttributeMapper {
	name: attribute::NEST_MEMBERS,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_nest_members,
};

pub static PERMITTED_SUBCLASSES: AttributeMapper = AttributeMapper {
	name: attribute::PERMITTED_SUBCLASSES,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_permitted_subclasses,
};

pub static RECORD: AttributeMapper = AttributeMapper {
	name: attribute::RECORD,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_record,
};

pub static RUNTIME_INVISIBLE_ANNOTATIONS: AttributeMapper = AttributeMapper {
	name: attribute::RUNTIME_INVISIBLE_ANNOTATIONS,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::DECLARATIONS,
	ignorable_when_malformed: true,
	decode: bound_runtime_invisible_annotations,
};

pub static RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS: AttributeMapper = AttributeMapper {
	name: attribute::RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::METHOD,
	ignorable_when_malformed: true,
	decode: bound_runtime_invisible_parameter_annotations,
};

pub static RUNTIME_INVISIBLE_TYPE_ANNOTATIONS: AttributeMapper = AttributeMapper {
	name: attribute::RUNTIME_INVISIBLE_TYPE_ANNOTATIONS,
	allow_multiple: false,
	stability: AttributeStability::Unstable,
	attaches_to: AttachPoints::EVERYWHERE,
	ignorable_when_malformed: true,
	decode: bound_runtime_invisible_type_annotations,
};

pub static RUNTIME_VISIBLE_ANNOTATIONS: AttributeMapper = AttributeMapper {
	name: attribute::RUNTIME_VISIBLE_ANNOTATIONS,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::DECLARATIONS,
	ignorable_when_malformed: true,
	decode: bound_runtime_visible_annotations,
};

pub static RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS: AttributeMapper = AttributeMapper {
	name: attribute::RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::METHOD,
	ignorable_when_malformed: true,
	decode: bound_runtime_visible_parameter_annotations,
};

pub static RUNTIME_VISIBLE_TYPE_ANNOTATIONS: AttributeMapper = AttributeMapper {
	name: attribute::RUNTIME_VISIBLE_TYPE_ANNOTATIONS,
	allow_multiple: false,
	stability: AttributeStability::Unstable,
	attaches_to: AttachPoints::EVERYWHERE,
	ignorable_when_malformed: true,
	decode: bound_runtime_visible_type_annotations,
};

pub static SIGNATURE: AttributeMapper = AttributeMapper {
	name: attribute::SIGNATURE,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::DECLARATIONS,
	ignorable_when_malformed: false,
	decode: bound_signature,
};

pub static SOURCE_DEBUG_EXTENSION: AttributeMapper = AttributeMapper {
	name: attribute::SOURCE_DEBUG_EXTENSION,
	allow_multiple: false,
	stability: AttributeStability::Stateless,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_source_debug_extension,
};

pub static SOURCE_FILE: AttributeMapper = AttributeMapper {
	name: attribute::SOURCE_FILE,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_source_file,
};

pub static SOURCE_ID: AttributeMapper = AttributeMapper {
	name: attribute::SOURCE_ID,
	allow_multiple: false,
	stability: AttributeStability::ConstantPoolRefs,
	attaches_to: AttachPoints::CLASS,
	ignorable_when_malformed: false,
	decode: bound_source_id,
};

pub static STACK_MAP_TABLE: AttributeMapper = AttributeMapper {
	name: attribute::STACK_MAP_TABLE,
	allow_multiple: false,
	stability: AttributeStability::Labels,
	attaches_to: AttachPoints::CODE,
	ignorable_when_malformed: false,
	decode: bound_stack_map_table,
};

pub static SYNTHETIC: AttributeMapper = AttributeMapper {
	name: attribute::SYNTHETIC,
	allow_multiple: false,
	stability: AttributeStability::Stateless,
	attaches_to: AttachPoints::MEMBERS,
	ignorable_when_malformed: false,
	decode: bound_synthetic,
};

/// Every mapper of the standard set, the lookup table behind
/// [`AttributeMapper::by_name`]. Built once at compile time; nothing
/// registers here at runtime.
static REGISTRY: [&AttributeMapper; 36] = [
	&ANNOTATION_DEFAULT,
	&BOOTSTRAP_METHODS,
	&CHARACTER_RANGE_TABLE,
	&CODE,
	&COMPILATION_ID,
	&CONSTANT_VALUE,
	&DEPRECATED,
	&ENCLOSING_METHOD,
	&EXCEPTIONS,
	&INNER_CLASSES,
	&LINE_NUMBER_TABLE,
	&LOCAL_VARIABLE_TABLE,
	&LOCAL_VARIABLE_TYPE_TABLE,
	&METHOD_PARAMETERS,
	&MODULE,
	&MODULE_HASHES,
	&MODULE_MAIN_CLASS,
	&MODULE_PACKAGES,
	&MODULE_RESOLUTION,
	&MODULE_TARGET,
	&NEST_HOST,
	&NEST_MEMBERS,
	&PERMITTED_SUBCLASSES,
	&RECORD,
	&RUNTIME_INVISIBLE_ANNOTATIONS,
	&RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS,
	&RUNTIME_INVISIBLE_TYPE_ANNOTATIONS,
	&RUNTIME_VISIBLE_ANNOTATIONS,
	&RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS,
	&RUNTIME_VISIBLE_TYPE_ANNOTATIONS,
	&SIGNATURE,
	&SOURCE_DEBUG_EXTENSION,
	&SOURCE_FILE,
	&SOURCE_ID,
	&STACK_MAP_TABLE,
	&SYNTHETIC,
];

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn lookup_finds_every_registered_name() {
		for mapper in REGISTRY {
			let found = AttributeMapper::by_name(JavaStr::from_str(mapper.name))
				.unwrap_or_else(|| panic!("{} missing from lookup", mapper.name));
			assert_eq!(found.name, mapper.name);
		}
		assert!(AttributeMapper::by_name(JavaStr::from_str("NoSuchAttribute")).is_none());
	}

	#[test]
	fn stability_gates_bulk_copies() {
		let pool_changed = TransformContext { constant_pool_preserved: false, code_array_preserved: true };
		let code_changed = TransformContext { constant_pool_preserved: true, code_array_preserved: false };

		assert!(AttributeStability::Stateless.is_bulk_copy_safe(&pool_changed));
		assert!(AttributeStability::Stateless.is_bulk_copy_safe(&code_changed));

		assert!(!AttributeStability::ConstantPoolRefs.is_bulk_copy_safe(&pool_changed));
		assert!(AttributeStability::ConstantPoolRefs.is_bulk_copy_safe(&code_changed));

		assert!(AttributeStability::Labels.is_bulk_copy_safe(&pool_changed));
		assert!(!AttributeStability::Labels.is_bulk_copy_safe(&code_changed));

		assert!(AttributeStability::Unstable.is_bulk_copy_safe(&TransformContext::identity()));
		assert!(!AttributeStability::Unstable.is_bulk_copy_safe(&pool_changed));
		assert!(!AttributeStability::Unstable.is_bulk_copy_safe(&code_changed));
	}
}
