//! The annotation attributes and the element value model they share,
//! see JVMS 4.7.16 through 4.7.22.
//!
//! All of these kinds are *ignorable*: a malformed table is dropped by the
//! attribute list reader instead of failing the read, so their payloads are
//! probed eagerly at read time (and the probe result is cached, making the
//! later accessor free).

use java_string::JavaString;
use crate::attr::{attribute_payload, Payload, ReadContext};
use crate::bytes::{ByteSink, SliceReader};
use crate::constants::{attribute, target_type, type_path};
use crate::error::{Error, Result};
use crate::names::FieldDescriptor;
use crate::pool::{ConstantPool, ConstantPoolBuilder, ConstantValueEntry};

/// One annotation, see JVMS 4.7.16.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
	/// The field descriptor of the annotation interface, like
	/// `Ljava/lang/Deprecated;`.
	pub annotation_type: FieldDescriptor,
	pub element_value_pairs: Vec<ElementValuePair>,
}

impl Annotation {
	pub fn new(annotation_type: FieldDescriptor) -> Annotation {
		Annotation { annotation_type, element_value_pairs: Vec::new() }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementValuePair {
	pub name: JavaString,
	pub value: AnnotationValue,
}

/// An `element_value`, see JVMS 4.7.16.1.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
	Byte(i8),
	Char(u16),
	Double(f64),
	Float(f32),
	Int(i32),
	Long(i64),
	Short(i16),
	Boolean(bool),
	String(JavaString),
	Enum {
		type_name: FieldDescriptor,
		const_name: JavaString,
	},
	/// A class literal, stored as a return descriptor (`V` for `void.class`).
	Class(JavaString),
	Annotation(Annotation),
	Array(Vec<AnnotationValue>),
}

/// What a type annotation is attached to, see JVMS 4.7.20.1.
///
/// The code-array positions (`offset`) and the indices into sibling tables are
/// kept raw; they are the reason the type annotation attributes are classified
/// [`AttributeStability::Unstable`][crate::attr::mapper::AttributeStability::Unstable].
#[derive(Debug, Clone, PartialEq)]
pub enum TargetInfo {
	ClassTypeParameter { index: u8 },
	MethodTypeParameter { index: u8 },
	/// `65535` targets the superclass, anything else indexes the interfaces.
	ClassExtends { index: u16 },
	ClassTypeParameterBound { type_parameter_index: u8, bound_index: u8 },
	MethodTypeParameterBound { type_parameter_index: u8, bound_index: u8 },
	Field,
	MethodReturn,
	MethodReceiver,
	MethodFormalParameter { index: u8 },
	Throws { index: u16 },
	LocalVariable { table: Vec<LocalVariableTarget> },
	ResourceVariable { table: Vec<LocalVariableTarget> },
	ExceptionParameter { index: u16 },
	InstanceOf { offset: u16 },
	New { offset: u16 },
	ConstructorReference { offset: u16 },
	MethodReference { offset: u16 },
	Cast { offset: u16, type_argument_index: u8 },
	ConstructorInvocationTypeArgument { offset: u16, type_argument_index: u8 },
	MethodInvocationTypeArgument { offset: u16, type_argument_index: u8 },
	ConstructorReferenceTypeArgument { offset: u16, type_argument_index: u8 },
	MethodReferenceTypeArgument { offset: u16, type_argument_index: u8 },
}

/// One row of a `localvar_target` table; a variable may live in several
/// disjoint ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVariableTarget {
	pub start_pc: u16,
	pub length: u16,
	pub index: u16,
}

/// One step into the type a type annotation sits on, see JVMS 4.7.20.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePathSegment {
	/// Deeper into an array type.
	ArrayElement,
	/// Deeper into a nested type.
	InnerType,
	/// Onto the bound of a wildcard type argument.
	WildcardBound,
	/// Onto a type argument of a parameterized type.
	TypeArgument { index: u8 },
}

/// A type annotation, see JVMS 4.7.20.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
	pub target_info: TargetInfo,
	pub target_path: Vec<TypePathSegment>,
	pub annotation: Annotation,
}

macro_rules! annotations_attribute {
	(
		$( #[$doc:meta] )*
		$attr:ident, $payload:ty, $accessor:ident, $decode:ident, $decode_payload:path, $name_const:path
	) => {
		$( #[$doc] )*
		pub struct $attr<'a> {
			payload: Payload<'a, $payload>,
		}

		attribute_payload!($attr, $payload, $decode);

		impl $attr<'static> {
			pub fn of($accessor: $payload) -> $attr<'static> {
				$attr { payload: Payload::unbound($accessor) }
			}
		}

		impl<'a> $attr<'a> {
			pub fn $accessor(&self) -> crate::error::Result<&$payload> {
				self.get()
			}
		}

		fn $decode<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<$payload> {
			$decode_payload($name_const, bytes, ctx)
		}
	}
}

annotations_attribute!(
	/// The `RuntimeVisibleAnnotations` attribute, see JVMS 4.7.16.
	RuntimeVisibleAnnotationsAttribute, Vec<Annotation>, annotations,
	decode_runtime_visible_annotations, decode_annotations_payload, attribute::RUNTIME_VISIBLE_ANNOTATIONS
);
annotations_attribute!(
	/// The `RuntimeInvisibleAnnotations` attribute, see JVMS 4.7.17.
	RuntimeInvisibleAnnotationsAttribute, Vec<Annotation>, annotations,
	decode_runtime_invisible_annotations, decode_annotations_payload, attribute::RUNTIME_INVISIBLE_ANNOTATIONS
);
annotations_attribute!(
	/// The `RuntimeVisibleParameterAnnotations` attribute, see JVMS 4.7.18.
	/// One inner list per formal parameter, possibly empty.
	RuntimeVisibleParameterAnnotationsAttribute, Vec<Vec<Annotation>>, parameter_annotations,
	decode_runtime_visible_parameter_annotations, decode_parameter_annotations_payload, attribute::RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS
);
annotations_attribute!(
	/// The `RuntimeInvisibleParameterAnnotations` attribute, see JVMS 4.7.19.
	RuntimeInvisibleParameterAnnotationsAttribute, Vec<Vec<Annotation>>, parameter_annotations,
	decode_runtime_invisible_parameter_annotations, decode_parameter_annotations_payload, attribute::RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS
);
annotations_attribute!(
	/// The `RuntimeVisibleTypeAnnotations` attribute, see JVMS 4.7.20.
	RuntimeVisibleTypeAnnotationsAttribute, Vec<TypeAnnotation>, type_annotations,
	decode_runtime_visible_type_annotations, decode_type_annotations_payload, attribute::RUNTIME_VISIBLE_TYPE_ANNOTATIONS
);
annotations_attribute!(
	/// The `RuntimeInvisibleTypeAnnotations` attribute, see JVMS 4.7.21.
	RuntimeInvisibleTypeAnnotationsAttribute, Vec<TypeAnnotation>, type_annotations,
	decode_runtime_invisible_type_annotations, decode_type_annotations_payload, attribute::RUNTIME_INVISIBLE_TYPE_ANNOTATIONS
);
annotations_attribute!(
	/// The `AnnotationDefault` attribute on an annotation interface method,
	/// see JVMS 4.7.22.
	AnnotationDefaultAttribute, AnnotationValue, default_value,
	decode_annotation_default, decode_annotation_default_payload, attribute::ANNOTATION_DEFAULT
);

fn int_constant(name: &'static str, pool: &dyn ConstantPool, index: u16) -> Result<i32> {
	match pool.constant_value(index)? {
		ConstantValueEntry::Integer(value) => Ok(value),
		other => Err(Error::ConstantPoolTypeMismatch {
			index,
			expected: "Integer",
			found: format!("{other:?} (in {name})"),
		}),
	}
}

fn decode_element_value(name: &'static str, reader: &mut SliceReader<'_>, pool: &dyn ConstantPool) -> Result<AnnotationValue> {
	let tag = reader.read_u8()?;
	let value = match tag {
		b'B' => AnnotationValue::Byte(int_constant(name, pool, reader.read_u16()?)? as i8),
		b'C' => AnnotationValue::Char(int_constant(name, pool, reader.read_u16()?)? as u16),
		b'D' => match pool.constant_value(reader.read_u16()?)? {
			ConstantValueEntry::Double(value) => AnnotationValue::Double(value),
			other => return Err(Error::malformed(name, format!("element value tagged `D` points at {other:?}"))),
		},
		b'F' => match pool.constant_value(reader.read_u16()?)? {
			ConstantValueEntry::Float(value) => AnnotationValue::Float(value),
			other => return Err(Error::malformed(name, format!("element value tagged `F` points at {other:?}"))),
		},
		b'I' => AnnotationValue::Int(int_constant(name, pool, reader.read_u16()?)?),
		b'J' => match pool.constant_value(reader.read_u16()?)? {
			ConstantValueEntry::Long(value) => AnnotationValue::Long(value),
			other => return Err(Error::malformed(name, format!("element value tagged `J` points at {other:?}"))),
		},
		b'S' => AnnotationValue::Short(int_constant(name, pool, reader.read_u16()?)? as i16),
		b'Z' => AnnotationValue::Boolean(int_constant(name, pool, reader.read_u16()?)? != 0),
		// `s` points straight at a Utf8 entry, not at a String entry.
		b's' => AnnotationValue::String(pool.utf8(reader.read_u16()?)?),
		b'e' => AnnotationValue::Enum {
			type_name: FieldDescriptor::try_from(pool.utf8(reader.read_u16()?)?)?,
			const_name: pool.utf8(reader.read_u16()?)?,
		},
		b'c' => AnnotationValue::Class(pool.utf8(reader.read_u16()?)?),
		b'@' => AnnotationValue::Annotation(decode_annotation(name, reader, pool)?),
		b'[' => {
			let values = reader.read_list(|r| decode_element_value(name, r, pool))?;
			AnnotationValue::Array(values)
		},
		_ => return Err(Error::malformed(name, format!("unknown element value tag {:?}", tag as char))),
	};
	Ok(value)
}

fn decode_annotation(name: &'static str, reader: &mut SliceReader<'_>, pool: &dyn ConstantPool) -> Result<Annotation> {
	let annotation_type = FieldDescriptor::try_from(pool.utf8(reader.read_u16()?)?)?;
	let element_value_pairs = reader.read_list(|r| {
		Ok(ElementValuePair {
			name: pool.utf8(r.read_u16()?)?,
			value: decode_element_value(name, r, pool)?,
		})
	})?;
	Ok(Annotation { annotation_type, element_value_pairs })
}

fn decode_annotations_payload<'a>(name: &'static str, bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<Annotation>> {
	let mut reader = SliceReader::new(name, bytes);
	let annotations = reader.read_list(|r| decode_annotation(name, r, ctx.pool))?;
	reader.expect_end()?;
	Ok(annotations)
}

fn decode_parameter_annotations_payload<'a>(name: &'static str, bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<Vec<Annotation>>> {
	let mut reader = SliceReader::new(name, bytes);
	let num_parameters = reader.read_u8()?;
	let mut parameters = Vec::with_capacity(num_parameters as usize);
	for _ in 0..num_parameters {
		parameters.push(reader.read_list(|r| decode_annotation(name, r, ctx.pool))?);
	}
	reader.expect_end()?;
	Ok(parameters)
}

fn decode_target_info(name: &'static str, reader: &mut SliceReader<'_>) -> Result<TargetInfo> {
	let tag = reader.read_u8()?;
	let target = match tag {
		target_type::CLASS_TYPE_PARAMETER => TargetInfo::ClassTypeParameter { index: reader.read_u8()? },
		target_type::METHOD_TYPE_PARAMETER => TargetInfo::MethodTypeParameter { index: reader.read_u8()? },
		target_type::CLASS_EXTENDS => TargetInfo::ClassExtends { index: reader.read_u16()? },
		target_type::CLASS_TYPE_PARAMETER_BOUND => TargetInfo::ClassTypeParameterBound {
			type_parameter_index: reader.read_u8()?,
			bound_index: reader.read_u8()?,
		},
		target_type::METHOD_TYPE_PARAMETER_BOUND => TargetInfo::MethodTypeParameterBound {
			type_parameter_index: reader.read_u8()?,
			bound_index: reader.read_u8()?,
		},
		target_type::FIELD => TargetInfo::Field,
		target_type::METHOD_RETURN => TargetInfo::MethodReturn,
		target_type::METHOD_RECEIVER => TargetInfo::MethodReceiver,
		target_type::METHOD_FORMAL_PARAMETER => TargetInfo::MethodFormalParameter { index: reader.read_u8()? },
		target_type::THROWS => TargetInfo::Throws { index: reader.read_u16()? },
		target_type::LOCAL_VARIABLE => TargetInfo::LocalVariable { table: decode_local_variable_targets(reader)? },
		target_type::RESOURCE_VARIABLE => TargetInfo::ResourceVariable { table: decode_local_variable_targets(reader)? },
		target_type::EXCEPTION_PARAMETER => TargetInfo::ExceptionParameter { index: reader.read_u16()? },
		target_type::INSTANCE_OF => TargetInfo::InstanceOf { offset: reader.read_u16()? },
		target_type::NEW => TargetInfo::New { offset: reader.read_u16()? },
		target_type::CONSTRUCTOR_REFERENCE => TargetInfo::ConstructorReference { offset: reader.read_u16()? },
		target_type::METHOD_REFERENCE => TargetInfo::MethodReference { offset: reader.read_u16()? },
		target_type::CAST => TargetInfo::Cast {
			offset: reader.read_u16()?,
			type_argument_index: reader.read_u8()?,
		},
		target_type::CONSTRUCTOR_INVOCATION_TYPE_ARGUMENT => TargetInfo::ConstructorInvocationTypeArgument {
			offset: reader.read_u16()?,
			type_argument_index: reader.read_u8()?,
		},
		target_type::METHOD_INVOCATION_TYPE_ARGUMENT => TargetInfo::MethodInvocationTypeArgument {
			offset: reader.read_u16()?,
			type_argument_index: reader.read_u8()?,
		},
		target_type::CONSTRUCTOR_REFERENCE_TYPE_ARGUMENT => TargetInfo::ConstructorReferenceTypeArgument {
			offset: reader.read_u16()?,
			type_argument_index: reader.read_u8()?,
		},
		target_type::METHOD_REFERENCE_TYPE_ARGUMENT => TargetInfo::MethodReferenceTypeArgument {
			offset: reader.read_u16()?,
			type_argument_index: reader.read_u8()?,
		},
		_ => return Err(Error::malformed(name, format!("unknown target_type {tag:#04x}"))),
	};
	Ok(target)
}

fn decode_local_variable_targets(reader: &mut SliceReader<'_>) -> Result<Vec<LocalVariableTarget>> {
	reader.read_list(|r| {
		Ok(LocalVariableTarget {
			start_pc: r.read_u16()?,
			length: r.read_u16()?,
			index: r.read_u16()?,
		})
	})
}

fn decode_type_path(name: &'static str, reader: &mut SliceReader<'_>) -> Result<Vec<TypePathSegment>> {
	let length = reader.read_u8()?;
	let mut path = Vec::with_capacity(length as usize);
	for _ in 0..length {
		let kind = reader.read_u8()?;
		let argument_index = reader.read_u8()?;
		path.push(match kind {
			type_path::ARRAY => TypePathSegment::ArrayElement,
			type_path::NESTED => TypePathSegment::InnerType,
			type_path::WILDCARD_BOUND => TypePathSegment::WildcardBound,
			type_path::TYPE_ARGUMENT => TypePathSegment::TypeArgument { index: argument_index },
			_ => return Err(Error::malformed(name, format!("unknown type_path_kind {kind}"))),
		});
	}
	Ok(path)
}

fn decode_type_annotations_payload<'a>(name: &'static str, bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<TypeAnnotation>> {
	let mut reader = SliceReader::new(name, bytes);
	let annotations = reader.read_list(|r| {
		Ok(TypeAnnotation {
			target_info: decode_target_info(name, r)?,
			target_path: decode_type_path(name, r)?,
			annotation: decode_annotation(name, r, ctx.pool)?,
		})
	})?;
	reader.expect_end()?;
	Ok(annotations)
}

fn decode_annotation_default_payload<'a>(name: &'static str, bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<AnnotationValue> {
	let mut reader = SliceReader::new(name, bytes);
	let value = decode_element_value(name, &mut reader, ctx.pool)?;
	reader.expect_end()?;
	Ok(value)
}

pub(crate) fn write_element_value(sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder, value: &AnnotationValue) -> Result<()> {
	match value {
		AnnotationValue::Byte(value) => {
			sink.put_u8(b'B');
			sink.put_u16(pool.put_constant_value(&ConstantValueEntry::Integer(*value as i32))?);
		},
		AnnotationValue::Char(value) => {
			sink.put_u8(b'C');
			sink.put_u16(pool.put_constant_value(&ConstantValueEntry::Integer(*value as i32))?);
		},
		AnnotationValue::Double(value) => {
			sink.put_u8(b'D');
			sink.put_u16(pool.put_constant_value(&ConstantValueEntry::Double(*value))?);
		},
		AnnotationValue::Float(value) => {
			sink.put_u8(b'F');
			sink.put_u16(pool.put_constant_value(&ConstantValueEntry::Float(*value))?);
		},
		AnnotationValue::Int(value) => {
			sink.put_u8(b'I');
			sink.put_u16(pool.put_constant_value(&ConstantValueEntry::Integer(*value))?);
		},
		AnnotationValue::Long(value) => {
			sink.put_u8(b'J');
			sink.put_u16(pool.put_constant_value(&ConstantValueEntry::Long(*value))?);
		},
		AnnotationValue::Short(value) => {
			sink.put_u8(b'S');
			sink.put_u16(pool.put_constant_value(&ConstantValueEntry::Integer(*value as i32))?);
		},
		AnnotationValue::Boolean(value) => {
			sink.put_u8(b'Z');
			sink.put_u16(pool.put_constant_value(&ConstantValueEntry::Integer(*value as i32))?);
		},
		AnnotationValue::String(value) => {
			sink.put_u8(b's');
			sink.put_u16(pool.put_utf8(value)?);
		},
		AnnotationValue::Enum { type_name, const_name } => {
			sink.put_u8(b'e');
			sink.put_u16(pool.put_utf8(type_name.as_java_str())?);
			sink.put_u16(pool.put_utf8(const_name)?);
		},
		AnnotationValue::Class(descriptor) => {
			sink.put_u8(b'c');
			sink.put_u16(pool.put_utf8(descriptor)?);
		},
		AnnotationValue::Annotation(annotation) => {
			sink.put_u8(b'@');
			write_annotation(sink, pool, annotation)?;
		},
		AnnotationValue::Array(values) => {
			sink.put_u8(b'[');
			sink.put_u16_count(values.len(), "element values")?;
			for value in values {
				write_element_value(sink, pool, value)?;
			}
		},
	}
	Ok(())
}

pub(crate) fn write_annotation(sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder, annotation: &Annotation) -> Result<()> {
	sink.put_u16(pool.put_utf8(annotation.annotation_type.as_java_str())?);
	sink.put_u16_count(annotation.element_value_pairs.len(), "element value pairs")?;
	for pair in &annotation.element_value_pairs {
		sink.put_u16(pool.put_utf8(&pair.name)?);
		write_element_value(sink, pool, &pair.value)?;
	}
	Ok(())
}

pub(crate) fn write_annotations(sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder, annotations: &[Annotation]) -> Result<()> {
	sink.put_u16_count(annotations.len(), "annotations")?;
	for annotation in annotations {
		write_annotation(sink, pool, annotation)?;
	}
	Ok(())
}

pub(crate) fn write_parameter_annotations(sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder, parameters: &[Vec<Annotation>]) -> Result<()> {
	let count = u8::try_from(parameters.len())
		.map_err(|_| Error::UnsupportedBuilderOperation(
			format!("{} parameters don't fit in a one byte count", parameters.len())
		))?;
	sink.put_u8(count);
	for annotations in parameters {
		write_annotations(sink, pool, annotations)?;
	}
	Ok(())
}

fn write_target_info(sink: &mut Vec<u8>, target: &TargetInfo) -> Result<()> {
	match target {
		TargetInfo::ClassTypeParameter { index } => {
			sink.put_u8(target_type::CLASS_TYPE_PARAMETER);
			sink.put_u8(*index);
		},
		TargetInfo::MethodTypeParameter { index } => {
			sink.put_u8(target_type::METHOD_TYPE_PARAMETER);
			sink.put_u8(*index);
		},
		TargetInfo::ClassExtends { index } => {
			sink.put_u8(target_type::CLASS_EXTENDS);
			sink.put_u16(*index);
		},
		TargetInfo::ClassTypeParameterBound { type_parameter_index, bound_index } => {
			sink.put_u8(target_type::CLASS_TYPE_PARAMETER_BOUND);
			sink.put_u8(*type_parameter_index);
			sink.put_u8(*bound_index);
		},
		TargetInfo::MethodTypeParameterBound { type_parameter_index, bound_index } => {
			sink.put_u8(target_type::METHOD_TYPE_PARAMETER_BOUND);
			sink.put_u8(*type_parameter_index);
			sink.put_u8(*bound_index);
		},
		TargetInfo::Field => sink.put_u8(target_type::FIELD),
		TargetInfo::MethodReturn => sink.put_u8(target_type::METHOD_RETURN),
		TargetInfo::MethodReceiver => sink.put_u8(target_type::METHOD_RECEIVER),
		TargetInfo::MethodFormalParameter { index } => {
			sink.put_u8(target_type::METHOD_FORMAL_PARAMETER);
			sink.put_u8(*index);
		},
		TargetInfo::Throws { index } => {
			sink.put_u8(target_type::THROWS);
			sink.put_u16(*index);
		},
		TargetInfo::LocalVariable { table } => {
			sink.put_u8(target_type::LOCAL_VARIABLE);
			write_local_variable_targets(sink, table)?;
		},
		TargetInfo::ResourceVariable { table } => {
			sink.put_u8(target_type::RESOURCE_VARIABLE);
			write_local_variable_targets(sink, table)?;
		},
		TargetInfo::ExceptionParameter { index } => {
			sink.put_u8(target_type::EXCEPTION_PARAMETER);
			sink.put_u16(*index);
		},
		TargetInfo::InstanceOf { offset } => {
			sink.put_u8(target_type::INSTANCE_OF);
			sink.put_u16(*offset);
		},
		TargetInfo::New { offset } => {
			sink.put_u8(target_type::NEW);
			sink.put_u16(*offset);
		},
		TargetInfo::ConstructorReference { offset } => {
			sink.put_u8(target_type::CONSTRUCTOR_REFERENCE);
			sink.put_u16(*offset);
		},
		TargetInfo::MethodReference { offset } => {
			sink.put_u8(target_type::METHOD_REFERENCE);
			sink.put_u16(*offset);
		},
		TargetInfo::Cast { offset, type_argument_index } => {
			sink.put_u8(target_type::CAST);
			sink.put_u16(*offset);
			sink.put_u8(*type_argument_index);
		},
		TargetInfo::ConstructorInvocationTypeArgument { offset, type_argument_index } => {
			sink.put_u8(target_type::CONSTRUCTOR_INVOCATION_TYPE_ARGUMENT);
			sink.put_u16(*offset);
			sink.put_u8(*type_argument_index);
		},
		TargetInfo::MethodInvocationTypeArgument { offset, type_argument_index } => {
			sink.put_u8(target_type::METHOD_INVOCATION_TYPE_ARGUMENT);
			sink.put_u16(*offset);
			sink.put_u8(*type_argument_index);
		},
		TargetInfo::ConstructorReferenceTypeArgument { offset, type_argument_index } => {
			sink.put_u8(target_type::CONSTRUCTOR_REFERENCE_TYPE_ARGUMENT);
			sink.put_u16(*offset);
			sink.put_u8(*type_argument_index);
		},
		TargetInfo::MethodReferenceTypeArgument { offset, type_argument_index } => {
			sink.put_u8(target_type::METHOD_REFERENCE_TYPE_ARGUMENT);
			sink.put_u16(*offset);
			sink.put_u8(*type_argument_index);
		},
	}
	Ok(())
}

fn write_local_variable_targets(sink: &mut Vec<u8>, table: &[LocalVariableTarget]) -> Result<()> {
	sink.put_u16_count(table.len(), "local variable targets")?;
	for target in table {
		sink.put_u16(target.start_pc);
		sink.put_u16(target.length);
		sink.put_u16(target.index);
	}
	Ok(())
}

fn write_type_path(sink: &mut Vec<u8>, path: &[TypePathSegment]) -> Result<()> {
	let length = u8::try_from(path.len())
		.map_err(|_| Error::UnsupportedBuilderOperation(
			format!("a type path of {} segments doesn't fit in a one byte count", path.len())
		))?;
	sink.put_u8(length);
	for segment in path {
		match segment {
			TypePathSegment::ArrayElement => {
				sink.put_u8(type_path::ARRAY);
				sink.put_u8(0);
			},
			TypePathSegment::InnerType => {
				sink.put_u8(type_path::NESTED);
				sink.put_u8(0);
			},
			TypePathSegment::WildcardBound => {
				sink.put_u8(type_path::WILDCARD_BOUND);
				sink.put_u8(0);
			},
			TypePathSegment::TypeArgument { index } => {
				sink.put_u8(type_path::TYPE_ARGUMENT);
				sink.put_u8(*index);
			},
		}
	}
	Ok(())
}

pub(crate) fn write_type_annotations(sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder, annotations: &[TypeAnnotation]) -> Result<()> {
	sink.put_u16_count(annotations.len(), "type annotations")?;
	for annotation in annotations {
		write_target_info(sink, &annotation.target_info)?;
		write_type_path(sink, &annotation.target_path)?;
		write_annotation(sink, pool, &annotation.annotation)?;
	}
	Ok(())
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::pool::{PoolEntry, TablePool};
	use super::*;

	#[test]
	fn element_values_round_trip_through_the_pool() {
		let mut annotation = Annotation::new(FieldDescriptor::try_from("Lorg/example/Marker;").expect("valid"));
		annotation.element_value_pairs.push(ElementValuePair {
			name: JavaString::from("value"),
			value: AnnotationValue::Array(vec![
				AnnotationValue::Int(3),
				AnnotationValue::Boolean(true),
			]),
		});

		let mut pool = crate::pool::PoolBuilder::new();
		let mut sink = Vec::new();
		write_annotations(&mut sink, &mut pool, std::slice::from_ref(&annotation)).expect("encodes");

		let table = pool.into_table_pool();
		let ctx = ReadContext::new(&table);
		let decoded = decode_annotations_payload(attribute::RUNTIME_VISIBLE_ANNOTATIONS, &sink, ctx).expect("decodes");
		assert_eq!(decoded, vec![annotation]);
	}

	#[test]
	fn unknown_element_value_tags_are_malformed() {
		let pool = TablePool::new(vec![PoolEntry::Utf8(JavaString::from("LA;"))]);
		let ctx = ReadContext::new(&pool);
		// annotation count 1, type_index 1, one pair with tag `?`
		let bytes = [0x00, 0x01, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01, b'?', 0x00, 0x01];
		assert!(decode_annotations_payload(attribute::RUNTIME_VISIBLE_ANNOTATIONS, &bytes, ctx).is_err());
	}
}
