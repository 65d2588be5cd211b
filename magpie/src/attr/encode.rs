//! Writing attributes back out: `name_index`, a length computed from what was
//! actually written, and the payload — either the original bytes verbatim
//! when the stability class allows it, or a re-encode against the target pool
//! and label resolver.

use java_string::JavaStr;
use log::debug;
use crate::attr::annotations::{write_annotations, write_element_value, write_parameter_annotations, write_type_annotations};
use crate::attr::bootstrap::encode_bootstrap_methods;
use crate::attr::character_range::encode_character_range_table;
use crate::attr::class_shape::{
	encode_enclosing_method, encode_inner_classes, encode_nest_host, encode_nest_members,
	encode_permitted_subclasses, RecordAttribute,
};
use crate::attr::code::CodeAttribute;
use crate::attr::debug::{
	encode_compilation_id, encode_line_number_table, encode_local_variable_table,
	encode_local_variable_type_table, encode_source_debug_extension, encode_source_file, encode_source_id,
};
use crate::attr::mapper::TransformContext;
use crate::attr::member::{encode_constant_value, encode_exceptions, encode_method_parameters, encode_signature};
use crate::attr::module::{
	encode_module, encode_module_hashes, encode_module_main_class, encode_module_packages,
	encode_module_resolution, encode_module_target,
};
use crate::attr::stack_map::{encode_stack_map_table, VerificationType};
use crate::attr::Attribute;
use crate::bytes::ByteSink;
use crate::constants::attribute;
use crate::error::{Error, Result};
use crate::labels::LabelResolver;
use crate::pool::{put_optional, ConstantPoolBuilder};

/// What to do with an attribute whose bytes cannot be reused under the
/// current transform and that cannot be re-encoded either (unknown kinds).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnsafeCopyPolicy {
	/// Fail the write with [`Error::UnsafeBulkCopy`].
	Refuse,
	/// Leave the attribute out of the output.
	Drop,
}

/// Everything the write side needs in one place, threaded through the nested
/// attribute tables of `Code` and `Record`.
pub struct EncodeContext<'e> {
	pub pool: &'e mut dyn ConstantPoolBuilder,
	/// The resolver of the code array being written, for label-bearing kinds.
	pub labels: Option<&'e dyn LabelResolver>,
	/// Initial frame locals, for compacting stack map frames.
	pub frame_locals: Option<&'e [VerificationType]>,
	pub transform: TransformContext,
	pub policy: UnsafeCopyPolicy,
}

impl<'e> EncodeContext<'e> {
	/// A context for a plain write: identity transform, refusing unsafe
	/// copies.
	pub fn new(pool: &'e mut dyn ConstantPoolBuilder) -> EncodeContext<'e> {
		EncodeContext {
			pool,
			labels: None,
			frame_locals: None,
			transform: TransformContext::identity(),
			policy: UnsafeCopyPolicy::Refuse,
		}
	}

	pub fn with_labels(self, labels: &'e dyn LabelResolver) -> EncodeContext<'e> {
		EncodeContext { labels: Some(labels), ..self }
	}

	pub fn with_frame_locals(self, frame_locals: &'e [VerificationType]) -> EncodeContext<'e> {
		EncodeContext { frame_locals: Some(frame_locals), ..self }
	}

	pub fn with_transform(self, transform: TransformContext) -> EncodeContext<'e> {
		EncodeContext { transform, ..self }
	}

	pub fn with_policy(self, policy: UnsafeCopyPolicy) -> EncodeContext<'e> {
		EncodeContext { policy, ..self }
	}

	fn require_labels(&self, name: &JavaStr) -> Result<&'e dyn LabelResolver> {
		self.labels.ok_or_else(|| Error::UnresolvedLabel(format!("no label resolver to encode the {name:?} attribute against")))
	}
}

fn write_attribute_info(sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder, name: &JavaStr, payload: &[u8]) -> Result<()> {
	sink.put_u16(pool.put_utf8(name)?);
	let length = u32::try_from(payload.len())
		.map_err(|_| Error::UnsupportedBuilderOperation(format!("the {name:?} attribute payload exceeds four gigabytes")))?;
	sink.put_u32(length);
	sink.put_slice(payload);
	Ok(())
}

/// Writes one `attribute_info` structure.
///
/// Returns `false` when the attribute was left out under
/// [`UnsafeCopyPolicy::Drop`]; callers counting attributes must mind the
/// return value.
pub fn encode_attribute(attr: &Attribute<'_>, sink: &mut Vec<u8>, ctx: &mut EncodeContext<'_>) -> Result<bool> {
	// Fast path: the original bytes survive this transform as they are.
	if let Some(raw) = attr.raw_bytes() {
		if attr.stability().is_bulk_copy_safe(&ctx.transform) {
			write_attribute_info(sink, &mut *ctx.pool, attr.name(), raw)?;
			return Ok(true);
		}
	}

	let mut payload = Vec::new();
	match attr {
		Attribute::AnnotationDefault(attr) => write_element_value(&mut payload, &mut *ctx.pool, attr.default_value()?)?,
		Attribute::BootstrapMethods(attr) => encode_bootstrap_methods(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::CharacterRangeTable(attr) => encode_character_range_table(attr, &mut payload)?,
		Attribute::Code(attr) => encode_code(attr, &mut payload, ctx)?,
		Attribute::CompilationId(attr) => encode_compilation_id(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::ConstantValue(attr) => encode_constant_value(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::Deprecated(_) => {},
		Attribute::EnclosingMethod(attr) => encode_enclosing_method(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::Exceptions(attr) => encode_exceptions(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::InnerClasses(attr) => encode_inner_classes(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::LineNumberTable(attr) => {
			let labels = ctx.require_labels(JavaStr::from_str(attribute::LINE_NUMBER_TABLE))?;
			encode_line_number_table(attr, &mut payload, labels)?;
		},
		Attribute::LocalVariableTable(attr) => {
			let labels = ctx.require_labels(JavaStr::from_str(attribute::LOCAL_VARIABLE_TABLE))?;
			encode_local_variable_table(attr, &mut payload, &mut *ctx.pool, labels)?;
		},
		Attribute::LocalVariableTypeTable(attr) => {
			let labels = ctx.require_labels(JavaStr::from_str(attribute::LOCAL_VARIABLE_TYPE_TABLE))?;
			encode_local_variable_type_table(attr, &mut payload, &mut *ctx.pool, labels)?;
		},
		Attribute::MethodParameters(attr) => encode_method_parameters(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::Module(attr) => encode_module(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::ModuleHashes(attr) => encode_module_hashes(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::ModuleMainClass(attr) => encode_module_main_class(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::ModulePackages(attr) => encode_module_packages(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::ModuleResolution(attr) => encode_module_resolution(attr, &mut payload)?,
		Attribute::ModuleTarget(attr) => encode_module_target(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::NestHost(attr) => encode_nest_host(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::NestMembers(attr) => encode_nest_members(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::PermittedSubclasses(attr) => encode_permitted_subclasses(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::Record(attr) => encode_record(attr, &mut payload, ctx)?,
		Attribute::RuntimeInvisibleAnnotations(attr) => write_annotations(&mut payload, &mut *ctx.pool, attr.annotations()?)?,
		Attribute::RuntimeInvisibleParameterAnnotations(attr) => write_parameter_annotations(&mut payload, &mut *ctx.pool, attr.parameter_annotations()?)?,
		Attribute::RuntimeInvisibleTypeAnnotations(attr) => write_type_annotations(&mut payload, &mut *ctx.pool, attr.type_annotations()?)?,
		Attribute::RuntimeVisibleAnnotations(attr) => write_annotations(&mut payload, &mut *ctx.pool, attr.annotations()?)?,
		Attribute::RuntimeVisibleParameterAnnotations(attr) => write_parameter_annotations(&mut payload, &mut *ctx.pool, attr.parameter_annotations()?)?,
		Attribute::RuntimeVisibleTypeAnnotations(attr) => write_type_annotations(&mut payload, &mut *ctx.pool, attr.type_annotations()?)?,
		Attribute::Signature(attr) => encode_signature(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::SourceDebugExtension(attr) => encode_source_debug_extension(attr, &mut payload)?,
		Attribute::SourceFile(attr) => encode_source_file(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::SourceId(attr) => encode_source_id(attr, &mut payload, &mut *ctx.pool)?,
		Attribute::StackMapTable(attr) => {
			let labels = ctx.require_labels(JavaStr::from_str(attribute::STACK_MAP_TABLE))?;
			encode_stack_map_table(attr, &mut payload, &mut *ctx.pool, labels, ctx.frame_locals)?;
		},
		Attribute::Synthetic(_) => {},
		Attribute::Unknown(unknown) => {
			// There is no layout to re-encode; the bytes go out verbatim or
			// not at all.
			if unknown.stability().is_bulk_copy_safe(&ctx.transform) {
				payload.put_slice(unknown.bytes());
			} else {
				match ctx.policy {
					UnsafeCopyPolicy::Refuse => {
						return Err(Error::UnsafeBulkCopy { name: format!("{:?}", unknown.name()) });
					},
					UnsafeCopyPolicy::Drop => {
						debug!("dropping {:?} attribute: bytes are not reusable across this transform", unknown.name());
						return Ok(false);
					},
				}
			}
		},
	}

	write_attribute_info(sink, &mut *ctx.pool, attr.name(), &payload)?;
	Ok(true)
}

/// Writes `attributes_count` followed by the attributes, with the count
/// reflecting any drops.
pub fn encode_attribute_list(attrs: &[Attribute<'_>], sink: &mut Vec<u8>, ctx: &mut EncodeContext<'_>) -> Result<()> {
	let mut buffer = Vec::new();
	let mut count = 0usize;
	for attr in attrs {
		if encode_attribute(attr, &mut buffer, ctx)? {
			count += 1;
		}
	}
	sink.put_u16_count(count, "attributes")?;
	sink.put_slice(&buffer);
	Ok(())
}

fn encode_code(attr: &CodeAttribute<'_>, sink: &mut Vec<u8>, ctx: &mut EncodeContext<'_>) -> Result<()> {
	let labels = ctx.require_labels(JavaStr::from_str(attribute::CODE))?;

	sink.put_u16(attr.max_stack());
	sink.put_u16(attr.max_locals());

	let code = attr.code();
	let code_length = u32::try_from(code.len())
		.map_err(|_| Error::UnsupportedBuilderOperation("code array exceeds four gigabytes".to_string()))?;
	sink.put_u32(code_length);
	sink.put_slice(code);

	let handlers = attr.exception_table()?;
	sink.put_u16_count(handlers.len(), "exception handlers")?;
	for handler in handlers {
		sink.put_u16(labels.offset_of(handler.start)?);
		sink.put_u16(labels.offset_of(handler.end)?);
		sink.put_u16(labels.offset_of(handler.handler)?);
		sink.put_u16(put_optional(&mut *ctx.pool, handler.catch_type.as_ref(), |pool, class| pool.put_class(class))?);
	}

	encode_attribute_list(attr.attributes()?, sink, ctx)
}

fn encode_record(attr: &RecordAttribute<'_>, sink: &mut Vec<u8>, ctx: &mut EncodeContext<'_>) -> Result<()> {
	let components = attr.components()?;
	sink.put_u16_count(components.len(), "record components")?;
	for component in components {
		sink.put_u16(ctx.pool.put_utf8(&component.name)?);
		sink.put_u16(ctx.pool.put_utf8(component.descriptor.as_java_str())?);
		encode_attribute_list(&component.attributes, sink, ctx)?;
	}
	Ok(())
}

