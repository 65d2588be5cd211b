//! The `Module` attribute family, see JVMS 4.7.25 through 4.7.27, plus the
//! module metadata the JDK build writes (`ModuleHashes`, `ModuleResolution`,
//! `ModuleTarget`).

use std::fmt::{Debug, Formatter};
use java_string::JavaString;
use crate::attr::{attribute_payload, Payload, ReadContext};
use crate::bytes::{ByteSink, SliceReader};
use crate::constants::attribute;
use crate::error::{Error, Result};
use crate::names::{ClassName, ModuleName, PackageName};
use crate::pool::{optional, put_optional, ConstantPool, ConstantPoolBuilder};

/// The decoded payload of a `Module` attribute: the seven facets of a module
/// descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
	pub name: ModuleName,
	pub flags: ModuleFlags,
	pub version: Option<JavaString>,
	pub requires: Vec<ModuleRequireInfo>,
	pub exports: Vec<ModuleExportInfo>,
	pub opens: Vec<ModuleOpenInfo>,
	pub uses: Vec<ClassName>,
	pub provides: Vec<ModuleProvideInfo>,
}

#[derive(Copy, Clone, Default, PartialEq)]
pub struct ModuleFlags {
	pub is_open: bool,
	pub is_synthetic: bool,
	pub is_mandated: bool,
}

impl Debug for ModuleFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("ModuleFlags { ")?;
		if self.is_open      { f.write_str("open ")?; }
		if self.is_synthetic { f.write_str("synthetic ")?; }
		if self.is_mandated  { f.write_str("mandated ")?; }
		f.write_str("}")
	}
}

impl From<u16> for ModuleFlags {
	fn from(value: u16) -> Self {
		ModuleFlags {
			is_open:      value & 0x0020 != 0,
			is_synthetic: value & 0x1000 != 0,
			is_mandated:  value & 0x8000 != 0,
		}
	}
}

impl From<ModuleFlags> for u16 {
	fn from(value: ModuleFlags) -> Self {
		(if value.is_open      { 0x0020 } else { 0 }) |
		(if value.is_synthetic { 0x1000 } else { 0 }) |
		(if value.is_mandated  { 0x8000 } else { 0 })
	}
}

/// One `requires` entry of a module descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRequireInfo {
	pub requires: ModuleName,
	pub flags: ModuleRequireFlags,
	pub version: Option<JavaString>,
}

#[derive(Copy, Clone, Default, PartialEq)]
pub struct ModuleRequireFlags {
	pub is_transitive: bool,
	pub is_static_phase: bool,
	pub is_synthetic: bool,
	pub is_mandated: bool,
}

impl Debug for ModuleRequireFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("ModuleRequireFlags { ")?;
		if self.is_transitive   { f.write_str("transitive ")?; }
		if self.is_static_phase { f.write_str("static-phase ")?; }
		if self.is_synthetic    { f.write_str("synthetic ")?; }
		if self.is_mandated     { f.write_str("mandated ")?; }
		f.write_str("}")
	}
}

impl From<u16> for ModuleRequireFlags {
	fn from(value: u16) -> Self {
		ModuleRequireFlags {
			is_transitive:   value & 0x0020 != 0,
			is_static_phase: value & 0x0040 != 0,
			is_synthetic:    value & 0x1000 != 0,
			is_mandated:     value & 0x8000 != 0,
		}
	}
}

impl From<ModuleRequireFlags> for u16 {
	fn from(value: ModuleRequireFlags) -> Self {
		(if value.is_transitive   { 0x0020 } else { 0 }) |
		(if value.is_static_phase { 0x0040 } else { 0 }) |
		(if value.is_synthetic    { 0x1000 } else { 0 }) |
		(if value.is_mandated     { 0x8000 } else { 0 })
	}
}

/// One `exports` entry of a module descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleExportInfo {
	pub package: PackageName,
	pub flags: ModuleExportFlags,
	/// Empty for an unqualified export.
	pub exports_to: Vec<ModuleName>,
}

#[derive(Copy, Clone, Default, PartialEq)]
pub struct ModuleExportFlags {
	pub is_synthetic: bool,
	pub is_mandated: bool,
}

impl Debug for ModuleExportFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("ModuleExportFlags { ")?;
		if self.is_synthetic { f.write_str("synthetic ")?; }
		if self.is_mandated  { f.write_str("mandated ")?; }
		f.write_str("}")
	}
}

impl From<u16> for ModuleExportFlags {
	fn from(value: u16) -> Self {
		ModuleExportFlags {
			is_synthetic: value & 0x1000 != 0,
			is_mandated:  value & 0x8000 != 0,
		}
	}
}

impl From<ModuleExportFlags> for u16 {
	fn from(value: ModuleExportFlags) -> Self {
		(if value.is_synthetic { 0x1000 } else { 0 }) |
		(if value.is_mandated  { 0x8000 } else { 0 })
	}
}

/// One `opens` entry of a module descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleOpenInfo {
	pub package: PackageName,
	pub flags: ModuleOpenFlags,
	/// Empty for an unqualified open.
	pub opens_to: Vec<ModuleName>,
}

#[derive(Copy, Clone, Default, PartialEq)]
pub struct ModuleOpenFlags {
	pub is_synthetic: bool,
	pub is_mandated: bool,
}

impl Debug for ModuleOpenFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("ModuleOpenFlags { ")?;
		if self.is_synthetic { f.write_str("synthetic ")?; }
		if self.is_mandated  { f.write_str("mandated ")?; }
		f.write_str("}")
	}
}

impl From<u16> for ModuleOpenFlags {
	fn from(value: u16) -> Self {
		ModuleOpenFlags {
			is_synthetic: value & 0x1000 != 0,
			is_mandated:  value & 0x8000 != 0,
		}
	}
}

impl From<ModuleOpenFlags> for u16 {
	fn from(value: ModuleOpenFlags) -> Self {
		(if value.is_synthetic { 0x1000 } else { 0 }) |
		(if value.is_mandated  { 0x8000 } else { 0 })
	}
}

/// One `provides` entry of a module descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleProvideInfo {
	pub provides: ClassName,
	pub provides_with: Vec<ClassName>,
}

/// The `Module` attribute, see JVMS 4.7.25.
pub struct ModuleAttribute<'a> {
	payload: Payload<'a, Module>,
}

attribute_payload!(ModuleAttribute, Module, decode_module);

impl ModuleAttribute<'static> {
	pub fn of(module: Module) -> ModuleAttribute<'static> {
		ModuleAttribute { payload: Payload::unbound(module) }
	}

	pub fn builder() -> ModuleAttributeBuilder {
		ModuleAttributeBuilder::new()
	}
}

impl<'a> ModuleAttribute<'a> {
	pub fn module(&self) -> Result<&Module> {
		self.get()
	}
}

/// Accumulates the facets of a module descriptor before producing an immutable
/// [`ModuleAttribute`].
///
/// Every `requires`/`exports`/`opens`/`provides` call appends in order;
/// nothing is deduplicated here. Repeating an entry is the class file
/// verifier's problem, not this builder's.
#[derive(Debug, Default)]
pub struct ModuleAttributeBuilder {
	name: Option<ModuleName>,
	flags: ModuleFlags,
	version: Option<JavaString>,
	requires: Vec<ModuleRequireInfo>,
	exports: Vec<ModuleExportInfo>,
	opens: Vec<ModuleOpenInfo>,
	uses: Vec<ClassName>,
	provides: Vec<ModuleProvideInfo>,
}

impl ModuleAttributeBuilder {
	pub fn new() -> ModuleAttributeBuilder {
		ModuleAttributeBuilder::default()
	}

	pub fn module_name(mut self, name: ModuleName) -> Self {
		self.name = Some(name);
		self
	}

	pub fn module_name_symbol(self, name: &str) -> Result<Self> {
		Ok(self.module_name(ModuleName::try_from(name)?))
	}

	pub fn module_flags(mut self, flags: ModuleFlags) -> Self {
		self.flags = flags;
		self
	}

	pub fn module_version(mut self, version: JavaString) -> Self {
		self.version = Some(version);
		self
	}

	pub fn requires(mut self, require: ModuleRequireInfo) -> Self {
		self.requires.push(require);
		self
	}

	pub fn requires_symbol(self, name: &str, flags: ModuleRequireFlags, version: Option<&str>) -> Result<Self> {
		Ok(self.requires(ModuleRequireInfo {
			requires: ModuleName::try_from(name)?,
			flags,
			version: version.map(JavaString::from),
		}))
	}

	pub fn exports(mut self, export: ModuleExportInfo) -> Self {
		self.exports.push(export);
		self
	}

	pub fn exports_symbol<'s>(self, package: &str, flags: ModuleExportFlags, to: impl IntoIterator<Item = &'s str>) -> Result<Self> {
		let exports_to = to.into_iter().map(ModuleName::try_from).collect::<Result<Vec<_>>>()?;
		Ok(self.exports(ModuleExportInfo {
			package: PackageName::try_from(package)?,
			flags,
			exports_to,
		}))
	}

	pub fn opens(mut self, open: ModuleOpenInfo) -> Self {
		self.opens.push(open);
		self
	}

	pub fn opens_symbol<'s>(self, package: &str, flags: ModuleOpenFlags, to: impl IntoIterator<Item = &'s str>) -> Result<Self> {
		let opens_to = to.into_iter().map(ModuleName::try_from).collect::<Result<Vec<_>>>()?;
		Ok(self.opens(ModuleOpenInfo {
			package: PackageName::try_from(package)?,
			flags,
			opens_to,
		}))
	}

	pub fn uses(mut self, service: ClassName) -> Self {
		self.uses.push(service);
		self
	}

	pub fn uses_symbol(self, service: &str) -> Result<Self> {
		Ok(self.uses(ClassName::try_from(service)?))
	}

	pub fn provides(mut self, provide: ModuleProvideInfo) -> Self {
		self.provides.push(provide);
		self
	}

	pub fn provides_symbol<'s>(self, service: &str, with: impl IntoIterator<Item = &'s str>) -> Result<Self> {
		let provides_with = with.into_iter().map(ClassName::try_from).collect::<Result<Vec<_>>>()?;
		Ok(self.provides(ModuleProvideInfo {
			provides: ClassName::try_from(service)?,
			provides_with,
		}))
	}

	/// Fails when no module name was ever set; everything else may be empty.
	pub fn build(self) -> Result<ModuleAttribute<'static>> {
		let Some(name) = self.name else {
			return Err(Error::UnsupportedBuilderOperation("a Module attribute needs a module name".to_string()));
		};
		Ok(ModuleAttribute::of(Module {
			name,
			flags: self.flags,
			version: self.version,
			requires: self.requires,
			exports: self.exports,
			opens: self.opens,
			uses: self.uses,
			provides: self.provides,
		}))
	}
}

fn decode_module<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Module> {
	let pool = ctx.pool;
	let mut reader = SliceReader::new(attribute::MODULE, bytes);

	let name = pool.module(reader.read_u16()?)?;
	let flags = reader.read_u16()?.into();
	let version = optional(pool, reader.read_u16()?, |p, i| p.utf8(i))?;

	let requires = reader.read_list(|r| {
		Ok(ModuleRequireInfo {
			requires: pool.module(r.read_u16()?)?,
			flags: r.read_u16()?.into(),
			version: optional(pool, r.read_u16()?, |p, i| p.utf8(i))?,
		})
	})?;
	let exports = reader.read_list(|r| {
		Ok(ModuleExportInfo {
			package: pool.package(r.read_u16()?)?,
			flags: r.read_u16()?.into(),
			exports_to: r.read_list(|r| pool.module(r.read_u16()?))?,
		})
	})?;
	let opens = reader.read_list(|r| {
		Ok(ModuleOpenInfo {
			package: pool.package(r.read_u16()?)?,
			flags: r.read_u16()?.into(),
			opens_to: r.read_list(|r| pool.module(r.read_u16()?))?,
		})
	})?;
	let uses = reader.read_list(|r| pool.class(r.read_u16()?))?;
	let provides = reader.read_list(|r| {
		Ok(ModuleProvideInfo {
			provides: pool.class(r.read_u16()?)?,
			provides_with: r.read_list(|r| pool.class(r.read_u16()?))?,
		})
	})?;

	reader.expect_end()?;
	Ok(Module { name, flags, version, requires, exports, opens, uses, provides })
}

pub(crate) fn encode_module(attr: &ModuleAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	let module = attr.module()?;

	sink.put_u16(pool.put_module(&module.name)?);
	sink.put_u16(module.flags.into());
	sink.put_u16(put_optional(pool, module.version.as_deref(), |pool, version| pool.put_utf8(version))?);

	sink.put_u16_count(module.requires.len(), "requires entries")?;
	for require in &module.requires {
		sink.put_u16(pool.put_module(&require.requires)?);
		sink.put_u16(require.flags.into());
		sink.put_u16(put_optional(pool, require.version.as_deref(), |pool, version| pool.put_utf8(version))?);
	}

	sink.put_u16_count(module.exports.len(), "exports entries")?;
	for export in &module.exports {
		sink.put_u16(pool.put_package(&export.package)?);
		sink.put_u16(export.flags.into());
		sink.put_u16_count(export.exports_to.len(), "exports_to entries")?;
		for to in &export.exports_to {
			sink.put_u16(pool.put_module(to)?);
		}
	}

	sink.put_u16_count(module.opens.len(), "opens entries")?;
	for open in &module.opens {
		sink.put_u16(pool.put_package(&open.package)?);
		sink.put_u16(open.flags.into());
		sink.put_u16_count(open.opens_to.len(), "opens_to entries")?;
		for to in &open.opens_to {
			sink.put_u16(pool.put_module(to)?);
		}
	}

	sink.put_u16_count(module.uses.len(), "uses entries")?;
	for service in &module.uses {
		sink.put_u16(pool.put_class(service)?);
	}

	sink.put_u16_count(module.provides.len(), "provides entries")?;
	for provide in &module.provides {
		sink.put_u16(pool.put_class(&provide.provides)?);
		sink.put_u16_count(provide.provides_with.len(), "provides_with entries")?;
		for with in &provide.provides_with {
			sink.put_u16(pool.put_class(with)?);
		}
	}

	Ok(())
}

/// The `ModulePackages` attribute, see JVMS 4.7.26.
pub struct ModulePackagesAttribute<'a> {
	payload: Payload<'a, Vec<PackageName>>,
}

attribute_payload!(ModulePackagesAttribute, Vec<PackageName>, decode_module_packages);

impl ModulePackagesAttribute<'static> {
	pub fn of(packages: Vec<PackageName>) -> ModulePackagesAttribute<'static> {
		ModulePackagesAttribute { payload: Payload::unbound(packages) }
	}
}

impl<'a> ModulePackagesAttribute<'a> {
	pub fn packages(&self) -> Result<&[PackageName]> {
		Ok(self.get()?.as_slice())
	}
}

fn decode_module_packages<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<Vec<PackageName>> {
	let mut reader = SliceReader::new(attribute::MODULE_PACKAGES, bytes);
	let packages = reader.read_list(|r| ctx.pool.package(r.read_u16()?))?;
	reader.expect_end()?;
	Ok(packages)
}

pub(crate) fn encode_module_packages(attr: &ModulePackagesAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	let packages = attr.packages()?;
	sink.put_u16_count(packages.len(), "module packages")?;
	for package in packages {
		sink.put_u16(pool.put_package(package)?);
	}
	Ok(())
}

/// The `ModuleMainClass` attribute, see JVMS 4.7.27.
pub struct ModuleMainClassAttribute<'a> {
	payload: Payload<'a, ClassName>,
}

attribute_payload!(ModuleMainClassAttribute, ClassName, decode_module_main_class);

impl ModuleMainClassAttribute<'static> {
	pub fn of(main_class: ClassName) -> ModuleMainClassAttribute<'static> {
		ModuleMainClassAttribute { payload: Payload::unbound(main_class) }
	}
}

impl<'a> ModuleMainClassAttribute<'a> {
	pub fn main_class(&self) -> Result<&ClassName> {
		self.get()
	}
}

fn decode_module_main_class<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<ClassName> {
	let mut reader = SliceReader::new(attribute::MODULE_MAIN_CLASS, bytes);
	let main_class = ctx.pool.class(reader.read_u16()?)?;
	reader.expect_end()?;
	Ok(main_class)
}

pub(crate) fn encode_module_main_class(attr: &ModuleMainClassAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	sink.put_u16(pool.put_class(attr.main_class()?)?);
	Ok(())
}

/// One hash of the `ModuleHashes` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleHashInfo {
	pub module: ModuleName,
	pub hash: Vec<u8>,
}

/// The decoded payload of a `ModuleHashes` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleHashes {
	pub algorithm: JavaString,
	pub hashes: Vec<ModuleHashInfo>,
}

/// The `ModuleHashes` attribute the JDK build writes into `module-info.class`
/// files. Not part of the JVMS; the layout follows the JDK's own reader.
pub struct ModuleHashesAttribute<'a> {
	payload: Payload<'a, ModuleHashes>,
}

attribute_payload!(ModuleHashesAttribute, ModuleHashes, decode_module_hashes);

impl ModuleHashesAttribute<'static> {
	pub fn of(hashes: ModuleHashes) -> ModuleHashesAttribute<'static> {
		ModuleHashesAttribute { payload: Payload::unbound(hashes) }
	}
}

impl<'a> ModuleHashesAttribute<'a> {
	pub fn hashes(&self) -> Result<&ModuleHashes> {
		self.get()
	}
}

fn decode_module_hashes<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<ModuleHashes> {
	let mut reader = SliceReader::new(attribute::MODULE_HASHES, bytes);
	let algorithm = ctx.pool.utf8(reader.read_u16()?)?;
	let hashes = reader.read_list(|r| {
		let module = ctx.pool.module(r.read_u16()?)?;
		let length = r.read_u16()? as usize;
		let hash = r.read_slice(length)?.to_vec();
		Ok(ModuleHashInfo { module, hash })
	})?;
	reader.expect_end()?;
	Ok(ModuleHashes { algorithm, hashes })
}

pub(crate) fn encode_module_hashes(attr: &ModuleHashesAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	let hashes = attr.hashes()?;
	sink.put_u16(pool.put_utf8(&hashes.algorithm)?);
	sink.put_u16_count(hashes.hashes.len(), "module hashes")?;
	for hash in &hashes.hashes {
		sink.put_u16(pool.put_module(&hash.module)?);
		sink.put_u16_count(hash.hash.len(), "hash bytes")?;
		sink.put_slice(&hash.hash);
	}
	Ok(())
}

#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct ModuleResolutionFlags {
	pub do_not_resolve_by_default: bool,
	pub warn_deprecated: bool,
	pub warn_deprecated_for_removal: bool,
	pub warn_incubating: bool,
}

impl Debug for ModuleResolutionFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("ModuleResolutionFlags { ")?;
		if self.do_not_resolve_by_default    { f.write_str("do-not-resolve-by-default ")?; }
		if self.warn_deprecated              { f.write_str("warn-deprecated ")?; }
		if self.warn_deprecated_for_removal  { f.write_str("warn-deprecated-for-removal ")?; }
		if self.warn_incubating              { f.write_str("warn-incubating ")?; }
		f.write_str("}")
	}
}

impl From<u16> for ModuleResolutionFlags {
	fn from(value: u16) -> Self {
		ModuleResolutionFlags {
			do_not_resolve_by_default:   value & 0x0001 != 0,
			warn_deprecated:             value & 0x0002 != 0,
			warn_deprecated_for_removal: value & 0x0004 != 0,
			warn_incubating:             value & 0x0008 != 0,
		}
	}
}

impl From<ModuleResolutionFlags> for u16 {
	fn from(value: ModuleResolutionFlags) -> Self {
		(if value.do_not_resolve_by_default   { 0x0001 } else { 0 }) |
		(if value.warn_deprecated             { 0x0002 } else { 0 }) |
		(if value.warn_deprecated_for_removal { 0x0004 } else { 0 }) |
		(if value.warn_incubating             { 0x0008 } else { 0 })
	}
}

/// The `ModuleResolution` attribute of `module-info.class` files in the JDK
/// image. Not part of the JVMS.
pub struct ModuleResolutionAttribute<'a> {
	payload: Payload<'a, ModuleResolutionFlags>,
}

attribute_payload!(ModuleResolutionAttribute, ModuleResolutionFlags, decode_module_resolution);

impl ModuleResolutionAttribute<'static> {
	pub fn of(flags: ModuleResolutionFlags) -> ModuleResolutionAttribute<'static> {
		ModuleResolutionAttribute { payload: Payload::unbound(flags) }
	}
}

impl<'a> ModuleResolutionAttribute<'a> {
	pub fn resolution_flags(&self) -> Result<ModuleResolutionFlags> {
		self.get().map(|flags| *flags)
	}
}

fn decode_module_resolution<'a>(bytes: &'a [u8], _ctx: ReadContext<'a>) -> Result<ModuleResolutionFlags> {
	let mut reader = SliceReader::new(attribute::MODULE_RESOLUTION, bytes);
	let flags = reader.read_u16()?.into();
	reader.expect_end()?;
	Ok(flags)
}

pub(crate) fn encode_module_resolution(attr: &ModuleResolutionAttribute<'_>, sink: &mut Vec<u8>) -> Result<()> {
	sink.put_u16(attr.resolution_flags()?.into());
	Ok(())
}

/// The `ModuleTarget` attribute naming the platform a module was linked for,
/// like `linux-amd64`. Not part of the JVMS.
pub struct ModuleTargetAttribute<'a> {
	payload: Payload<'a, JavaString>,
}

attribute_payload!(ModuleTargetAttribute, JavaString, decode_module_target);

impl ModuleTargetAttribute<'static> {
	pub fn of(platform: JavaString) -> ModuleTargetAttribute<'static> {
		ModuleTargetAttribute { payload: Payload::unbound(platform) }
	}
}

impl<'a> ModuleTargetAttribute<'a> {
	pub fn platform(&self) -> Result<&JavaString> {
		self.get()
	}
}

fn decode_module_target<'a>(bytes: &'a [u8], ctx: ReadContext<'a>) -> Result<JavaString> {
	let mut reader = SliceReader::new(attribute::MODULE_TARGET, bytes);
	let platform = ctx.pool.utf8(reader.read_u16()?)?;
	reader.expect_end()?;
	Ok(platform)
}

pub(crate) fn encode_module_target(attr: &ModuleTargetAttribute<'_>, sink: &mut Vec<u8>, pool: &mut dyn ConstantPoolBuilder) -> Result<()> {
	sink.put_u16(pool.put_utf8(attr.platform()?)?);
	Ok(())
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn builder_without_name_fails() {
		let result = ModuleAttribute::builder()
			.requires_symbol("java.base", ModuleRequireFlags { is_mandated: true, ..Default::default() }, None)
			.expect("valid module name")
			.build();
		assert!(matches!(result, Err(Error::UnsupportedBuilderOperation(_))));
	}

	#[test]
	fn builder_keeps_duplicate_entries() {
		let attr = ModuleAttribute::builder()
			.module_name_symbol("org.example.app").expect("valid")
			.requires_symbol("java.base", ModuleRequireFlags::default(), None).expect("valid")
			.requires_symbol("java.base", ModuleRequireFlags::default(), None).expect("valid")
			.build().expect("has a name");
		// Duplicate detection is the verifier's concern, not the builder's.
		assert_eq!(attr.module().expect("unbound").requires.len(), 2);
	}

	#[test]
	fn resolution_flags_round_trip() {
		let flags = ModuleResolutionFlags { warn_incubating: true, ..Default::default() };
		assert_eq!(ModuleResolutionFlags::from(u16::from(flags)), flags);
	}
}
