//! Numeric tags and well-known names from the class file format.
//!
//! Everything in here is straight out of
//! [chapter 4 of the Java Virtual Machine Specification](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html).

/// The `attribute_name_index` strings of the predefined attributes, plus the
/// nonstandard ones `javac` emits (`CharacterRangeTable`, `CompilationID`,
/// `SourceID`) and the module metadata the JDK build tools write.
pub(crate) mod attribute {
	pub const ANNOTATION_DEFAULT: &str = "AnnotationDefault";
	pub const BOOTSTRAP_METHODS: &str = "BootstrapMethods";
	pub const CHARACTER_RANGE_TABLE: &str = "CharacterRangeTable";
	pub const CODE: &str = "Code";
	pub const COMPILATION_ID: &str = "CompilationID";
	pub const CONSTANT_VALUE: &str = "ConstantValue";
	pub const DEPRECATED: &str = "Deprecated";
	pub const ENCLOSING_METHOD: &str = "EnclosingMethod";
	pub const EXCEPTIONS: &str = "Exceptions";
	pub const INNER_CLASSES: &str = "InnerClasses";
	pub const LINE_NUMBER_TABLE: &str = "LineNumberTable";
	pub const LOCAL_VARIABLE_TABLE: &str = "LocalVariableTable";
	pub const LOCAL_VARIABLE_TYPE_TABLE: &str = "LocalVariableTypeTable";
	pub const METHOD_PARAMETERS: &str = "MethodParameters";
	pub const MODULE: &str = "Module";
	pub const MODULE_HASHES: &str = "ModuleHashes";
	pub const MODULE_MAIN_CLASS: &str = "ModuleMainClass";
	pub const MODULE_PACKAGES: &str = "ModulePackages";
	pub const MODULE_RESOLUTION: &str = "ModuleResolution";
	pub const MODULE_TARGET: &str = "ModuleTarget";
	pub const NEST_HOST: &str = "NestHost";
	pub const NEST_MEMBERS: &str = "NestMembers";
	pub const PERMITTED_SUBCLASSES: &str = "PermittedSubclasses";
	pub const RECORD: &str = "Record";
	pub const RUNTIME_INVISIBLE_ANNOTATIONS: &str = "RuntimeInvisibleAnnotations";
	pub const RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS: &str = "RuntimeInvisibleParameterAnnotations";
	pub const RUNTIME_INVISIBLE_TYPE_ANNOTATIONS: &str = "RuntimeInvisibleTypeAnnotations";
	pub const RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";
	pub const RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS: &str = "RuntimeVisibleParameterAnnotations";
	pub const RUNTIME_VISIBLE_TYPE_ANNOTATIONS: &str = "RuntimeVisibleTypeAnnotations";
	pub const SIGNATURE: &str = "Signature";
	pub const SOURCE_DEBUG_EXTENSION: &str = "SourceDebugExtension";
	pub const SOURCE_FILE: &str = "SourceFile";
	pub const SOURCE_ID: &str = "SourceID";
	pub const STACK_MAP_TABLE: &str = "StackMapTable";
	pub const SYNTHETIC: &str = "Synthetic";
}

/// `stack_map_frame` discriminants, see JVMS 4.7.4.
pub(crate) mod frame {
	pub const SAME_MAX: u8 = 63;
	pub const SAME_LOCALS_1_STACK_ITEM_MIN: u8 = 64;
	pub const SAME_LOCALS_1_STACK_ITEM_MAX: u8 = 127;
	pub const SAME_LOCALS_1_STACK_ITEM_EXTENDED: u8 = 247;
	pub const CHOP_MIN: u8 = 248;
	pub const CHOP_MAX: u8 = 250;
	pub const SAME_EXTENDED: u8 = 251;
	pub const APPEND_MIN: u8 = 252;
	pub const APPEND_MAX: u8 = 254;
	pub const FULL: u8 = 255;
}

/// `verification_type_info` discriminants, see JVMS 4.7.4.
pub(crate) mod verification_type {
	pub const TOP: u8 = 0;
	pub const INTEGER: u8 = 1;
	pub const FLOAT: u8 = 2;
	pub const DOUBLE: u8 = 3;
	pub const LONG: u8 = 4;
	pub const NULL: u8 = 5;
	pub const UNINITIALIZED_THIS: u8 = 6;
	pub const OBJECT: u8 = 7;
	pub const UNINITIALIZED: u8 = 8;
}

/// The `reference_kind` item of a `CONSTANT_MethodHandle_info` entry, see JVMS 4.4.8.
pub(crate) mod method_handle {
	pub const GET_FIELD: u8 = 1;
	pub const GET_STATIC: u8 = 2;
	pub const PUT_FIELD: u8 = 3;
	pub const PUT_STATIC: u8 = 4;
	pub const INVOKE_VIRTUAL: u8 = 5;
	pub const INVOKE_STATIC: u8 = 6;
	pub const INVOKE_SPECIAL: u8 = 7;
	pub const NEW_INVOKE_SPECIAL: u8 = 8;
	pub const INVOKE_INTERFACE: u8 = 9;
}

/// The `target_type` item of a `type_annotation` structure, see JVMS 4.7.20-A/B.
pub(crate) mod target_type {
	pub const CLASS_TYPE_PARAMETER: u8 = 0x00;
	pub const METHOD_TYPE_PARAMETER: u8 = 0x01;
	pub const CLASS_EXTENDS: u8 = 0x10;
	pub const CLASS_TYPE_PARAMETER_BOUND: u8 = 0x11;
	pub const METHOD_TYPE_PARAMETER_BOUND: u8 = 0x12;
	pub const FIELD: u8 = 0x13;
	pub const METHOD_RETURN: u8 = 0x14;
	pub const METHOD_RECEIVER: u8 = 0x15;
	pub const METHOD_FORMAL_PARAMETER: u8 = 0x16;
	pub const THROWS: u8 = 0x17;
	pub const LOCAL_VARIABLE: u8 = 0x40;
	pub const RESOURCE_VARIABLE: u8 = 0x41;
	pub const EXCEPTION_PARAMETER: u8 = 0x42;
	pub const INSTANCE_OF: u8 = 0x43;
	pub const NEW: u8 = 0x44;
	pub const CONSTRUCTOR_REFERENCE: u8 = 0x45;
	pub const METHOD_REFERENCE: u8 = 0x46;
	pub const CAST: u8 = 0x47;
	pub const CONSTRUCTOR_INVOCATION_TYPE_ARGUMENT: u8 = 0x48;
	pub const METHOD_INVOCATION_TYPE_ARGUMENT: u8 = 0x49;
	pub const CONSTRUCTOR_REFERENCE_TYPE_ARGUMENT: u8 = 0x4A;
	pub const METHOD_REFERENCE_TYPE_ARGUMENT: u8 = 0x4B;
}

/// The `type_path_kind` item of a `type_path` structure, see JVMS 4.7.20.2.
pub(crate) mod type_path {
	pub const ARRAY: u8 = 0;
	pub const NESTED: u8 = 1;
	pub const WILDCARD_BOUND: u8 = 2;
	pub const TYPE_ARGUMENT: u8 = 3;
}
