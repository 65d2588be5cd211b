//! Encode-then-decode checks through a real interning pool: whatever an
//! unbound attribute says, its bound re-read must say too.

use java_string::JavaString;
use pretty_assertions::assert_eq;
use magpie::attr::annotations::{
	Annotation, AnnotationDefaultAttribute, AnnotationValue, ElementValuePair, LocalVariableTarget,
	RuntimeVisibleAnnotationsAttribute, RuntimeVisibleParameterAnnotationsAttribute,
	RuntimeVisibleTypeAnnotationsAttribute, TargetInfo, TypeAnnotation, TypePathSegment,
};
use magpie::attr::class_shape::{
	EnclosingMethodAttribute, EnclosingMethodInfo, InnerClassesAttribute, InnerClassFlags, InnerClassInfo,
	NestHostAttribute, NestMembersAttribute, PermittedSubclassesAttribute, RecordAttribute, RecordComponentInfo,
};
use magpie::attr::code::{CodeAttribute, ExceptionHandlerInfo};
use magpie::attr::debug::{
	LineNumberInfo, LineNumberTableAttribute, LocalVariableInfo, LocalVariableTableAttribute,
	SourceDebugExtensionAttribute, SourceFileAttribute,
};
use magpie::attr::encode::{encode_attribute_list, EncodeContext};
use magpie::attr::member::{
	ConstantValueAttribute, DeprecatedAttribute, ExceptionsAttribute, MethodParameterFlags, MethodParameterInfo,
	MethodParametersAttribute, SignatureAttribute, SyntheticAttribute,
};
use magpie::attr::module::{
	ModuleAttribute, ModuleExportFlags, ModuleHashes, ModuleHashInfo, ModuleHashesAttribute,
	ModuleMainClassAttribute, ModulePackagesAttribute, ModuleRequireFlags, ModuleResolutionAttribute,
	ModuleResolutionFlags, ModuleTargetAttribute,
};
use magpie::attr::unknown::UnknownAttribute;
use magpie::labels::{CodeLabels, LabelResolver};
use magpie::names::{ClassName, FieldDescriptor, ModuleName, PackageName};
use magpie::pool::{ConstantValueEntry, NameAndTypeEntry, PoolBuilder};
use magpie::{read_attribute_list, Attribute, ReadContext};

/// Encodes the attributes against a fresh pool, then reads them back bound to
/// that pool, handing both lists to the check.
fn round_trip(attributes: Vec<Attribute<'_>>, labels: Option<&CodeLabels>, check: impl FnOnce(&[Attribute<'_>], &[Attribute<'_>])) {
	let mut pool = PoolBuilder::new();
	let mut sink = Vec::new();
	{
		let mut ctx = EncodeContext::new(&mut pool);
		if let Some(labels) = labels {
			ctx = ctx.with_labels(labels);
		}
		encode_attribute_list(&attributes, &mut sink, &mut ctx).expect("attributes encode");
	}

	let table = pool.into_table_pool();
	let mut ctx = ReadContext::new(&table);
	if let Some(labels) = labels {
		ctx = ctx.with_labels(labels);
	}
	let decoded = read_attribute_list(&sink, ctx).expect("attributes read back");
	check(&attributes, &decoded);
}

fn assert_round_trips(attributes: Vec<Attribute<'_>>) {
	round_trip(attributes, None, |original, decoded| assert_eq!(original, decoded));
}

fn class_name(name: &str) -> ClassName {
	ClassName::try_from(name).expect("valid class name")
}

#[test]
fn constant_values() {
	assert_round_trips(vec![
		Attribute::ConstantValue(ConstantValueAttribute::of(ConstantValueEntry::Integer(42))),
	]);
	assert_round_trips(vec![
		Attribute::ConstantValue(ConstantValueAttribute::of(ConstantValueEntry::Long(-3))),
	]);
	assert_round_trips(vec![
		Attribute::ConstantValue(ConstantValueAttribute::of(ConstantValueEntry::String(JavaString::from("hello")))),
	]);
}

#[test]
fn exceptions_built_from_symbols() {
	let attr = ExceptionsAttribute::of_symbols(["java/io/IOException"]).expect("valid name");
	round_trip(vec![Attribute::Exceptions(attr)], None, |_, decoded| {
		let Attribute::Exceptions(decoded) = &decoded[0] else {
			panic!("expected an Exceptions attribute, got {decoded:?}");
		};
		let exceptions = decoded.exceptions().expect("decodes");
		assert_eq!(exceptions, &[class_name("java/io/IOException")]);
	});
}

#[test]
fn markers_and_small_strings() {
	assert_round_trips(vec![
		Attribute::Deprecated(DeprecatedAttribute),
		Attribute::Synthetic(SyntheticAttribute),
		Attribute::Signature(SignatureAttribute::of(JavaString::from("Ljava/util/List<Ljava/lang/String;>;"))),
		Attribute::SourceFile(SourceFileAttribute::of(JavaString::from("Main.java"))),
		Attribute::SourceDebugExtension(SourceDebugExtensionAttribute::of(JavaString::from("SMAP\nMain.kt\n"))),
	]);
}

#[test]
fn method_parameters() {
	assert_round_trips(vec![
		Attribute::MethodParameters(MethodParametersAttribute::of(vec![
			MethodParameterInfo {
				name: Some(JavaString::from("config")),
				flags: MethodParameterFlags { is_final: true, ..Default::default() },
			},
			MethodParameterInfo {
				name: None,
				flags: MethodParameterFlags { is_synthetic: true, ..Default::default() },
			},
		])),
	]);
}

#[test]
fn class_shape_attributes() {
	assert_round_trips(vec![
		Attribute::InnerClasses(InnerClassesAttribute::of(vec![
			InnerClassInfo {
				inner_class: class_name("org/example/Outer$Inner"),
				outer_class: Some(class_name("org/example/Outer")),
				inner_name: Some(JavaString::from("Inner")),
				flags: InnerClassFlags { is_public: true, is_static: true, ..Default::default() },
			},
			InnerClassInfo {
				inner_class: class_name("org/example/Outer$1"),
				outer_class: None,
				inner_name: None,
				flags: InnerClassFlags::default(),
			},
		])),
		Attribute::EnclosingMethod(EnclosingMethodAttribute::of(EnclosingMethodInfo {
			class: class_name("org/example/Outer"),
			method: Some(NameAndTypeEntry {
				name: JavaString::from("run"),
				descriptor: JavaString::from("()V"),
			}),
		})),
		Attribute::NestHost(NestHostAttribute::of(class_name("org/example/Outer"))),
		Attribute::NestMembers(NestMembersAttribute::of(vec![
			class_name("org/example/Outer$Inner"),
			class_name("org/example/Outer$1"),
		])),
		Attribute::PermittedSubclasses(PermittedSubclassesAttribute::of(vec![
			class_name("org/example/Circle"),
			class_name("org/example/Square"),
		])),
	]);
}

#[test]
fn record_components_with_nested_attributes() {
	assert_round_trips(vec![
		Attribute::Record(RecordAttribute::of(vec![
			RecordComponentInfo {
				name: JavaString::from("point"),
				descriptor: FieldDescriptor::try_from("Lorg/example/Point;").expect("valid"),
				attributes: vec![
					Attribute::Signature(SignatureAttribute::of(JavaString::from("Lorg/example/Point<TT;>;"))),
				],
			},
			RecordComponentInfo::new(
				JavaString::from("count"),
				FieldDescriptor::try_from("I").expect("valid"),
			),
		])),
	]);
}

#[test]
fn module_attributes() {
	let module = ModuleAttribute::builder()
		.module_name_symbol("org.example.app").expect("valid")
		.module_version(JavaString::from("1.2.3"))
		.requires_symbol("java.base", ModuleRequireFlags { is_mandated: true, ..Default::default() }, Some("21"))
		.expect("valid")
		.exports_symbol("org/example/api", ModuleExportFlags::default(), ["org.example.client"])
		.expect("valid")
		.opens_symbol("org/example/internal", Default::default(), ["org.example.client"]).expect("valid")
		.uses_symbol("org/example/spi/Hook").expect("valid")
		.provides_symbol("org/example/spi/Hook", ["org/example/impl/DefaultHook"]).expect("valid")
		.build().expect("has a name");

	assert_round_trips(vec![
		Attribute::Module(module),
		Attribute::ModulePackages(ModulePackagesAttribute::of(vec![
			PackageName::try_from("org/example/api").expect("valid"),
			PackageName::try_from("org/example/internal").expect("valid"),
		])),
		Attribute::ModuleMainClass(ModuleMainClassAttribute::of(class_name("org/example/Main"))),
		Attribute::ModuleHashes(ModuleHashesAttribute::of(ModuleHashes {
			algorithm: JavaString::from("SHA-256"),
			hashes: vec![ModuleHashInfo {
				module: ModuleName::try_from("org.example.other").expect("valid"),
				hash: vec![0xDE, 0xAD, 0xBE, 0xEF],
			}],
		})),
		Attribute::ModuleResolution(ModuleResolutionAttribute::of(ModuleResolutionFlags {
			warn_incubating: true,
			..Default::default()
		})),
		Attribute::ModuleTarget(ModuleTargetAttribute::of(JavaString::from("linux-amd64"))),
	]);
}

#[test]
fn annotations() {
	let marker = Annotation::new(FieldDescriptor::try_from("Lorg/example/Marker;").expect("valid"));
	let mut rich = Annotation::new(FieldDescriptor::try_from("Lorg/example/Config;").expect("valid"));
	rich.element_value_pairs.push(ElementValuePair {
		name: JavaString::from("value"),
		value: AnnotationValue::String(JavaString::from("production")),
	});
	rich.element_value_pairs.push(ElementValuePair {
		name: JavaString::from("retries"),
		value: AnnotationValue::Array(vec![AnnotationValue::Int(1), AnnotationValue::Int(5)]),
	});
	rich.element_value_pairs.push(ElementValuePair {
		name: JavaString::from("level"),
		value: AnnotationValue::Enum {
			type_name: FieldDescriptor::try_from("Lorg/example/Level;").expect("valid"),
			const_name: JavaString::from("WARN"),
		},
	});
	rich.element_value_pairs.push(ElementValuePair {
		name: JavaString::from("nested"),
		value: AnnotationValue::Annotation(marker.clone()),
	});

	assert_round_trips(vec![
		Attribute::RuntimeVisibleAnnotations(RuntimeVisibleAnnotationsAttribute::of(vec![marker.clone(), rich])),
		Attribute::RuntimeVisibleParameterAnnotations(RuntimeVisibleParameterAnnotationsAttribute::of(vec![
			vec![marker.clone()],
			vec![],
		])),
		Attribute::AnnotationDefault(AnnotationDefaultAttribute::of(AnnotationValue::Class(JavaString::from("V")))),
	]);
}

#[test]
fn type_annotations() {
	let marker = Annotation::new(FieldDescriptor::try_from("Lorg/example/NonNull;").expect("valid"));
	assert_round_trips(vec![
		Attribute::RuntimeVisibleTypeAnnotations(RuntimeVisibleTypeAnnotationsAttribute::of(vec![
			TypeAnnotation {
				target_info: TargetInfo::ClassExtends { index: 65535 },
				target_path: vec![],
				annotation: marker.clone(),
			},
			TypeAnnotation {
				target_info: TargetInfo::LocalVariable {
					table: vec![LocalVariableTarget { start_pc: 0, length: 8, index: 2 }],
				},
				target_path: vec![TypePathSegment::ArrayElement, TypePathSegment::TypeArgument { index: 1 }],
				annotation: marker,
			},
		])),
	]);
}

#[test]
fn code_tables_with_labels() {
	let labels = CodeLabels::new(8);
	let at = |offset: u16| labels.label_at(offset).expect("in bounds");

	let attributes = vec![
		Attribute::LineNumberTable(LineNumberTableAttribute::of(vec![
			LineNumberInfo { start: at(0), line_number: 10 },
			LineNumberInfo { start: at(4), line_number: 11 },
		])),
		Attribute::LocalVariableTable(LocalVariableTableAttribute::of(vec![
			LocalVariableInfo {
				start: at(0),
				end: at(8),
				name: JavaString::from("this"),
				descriptor: FieldDescriptor::try_from("Lorg/example/Main;").expect("valid"),
				index: 0,
			},
		])),
	];
	round_trip(attributes, Some(&labels), |original, decoded| assert_eq!(original, decoded));
}

#[test]
fn code_with_nested_attributes() {
	let labels = CodeLabels::new(4);
	let at = |offset: u16| labels.label_at(offset).expect("in bounds");

	let code = CodeAttribute::of(
		2,
		1,
		vec![0x03, 0x3B, 0xB1, 0x00],
		vec![ExceptionHandlerInfo {
			start: at(0),
			end: at(2),
			handler: at(3),
			catch_type: Some(class_name("java/io/IOException")),
		}],
		vec![
			Attribute::LineNumberTable(LineNumberTableAttribute::of(vec![
				LineNumberInfo { start: at(0), line_number: 3 },
			])),
		],
	);

	round_trip(vec![Attribute::Code(code)], Some(&labels), |original, decoded| {
		assert_eq!(original, decoded);
		let Attribute::Code(decoded) = &decoded[0] else {
			panic!("expected a Code attribute, got {decoded:?}");
		};
		assert_eq!(decoded.max_stack(), 2);
		assert_eq!(decoded.code(), &[0x03, 0x3B, 0xB1, 0x00]);
		assert_eq!(decoded.attributes().expect("nested table decodes").len(), 1);
	});
}

#[test]
fn unknown_attributes_are_preserved_byte_for_byte() {
	let attr = UnknownAttribute::of(JavaString::from("org.example.Custom"), vec![0x01, 0x02, 0xFF]);
	round_trip(vec![Attribute::Unknown(attr)], None, |_, decoded| {
		let Attribute::Unknown(decoded) = &decoded[0] else {
			panic!("expected an Unknown attribute, got {decoded:?}");
		};
		assert_eq!(decoded.name(), java_string::JavaStr::from_str("org.example.Custom"));
		assert_eq!(decoded.bytes(), &[0x01, 0x02, 0xFF]);
	});
}
