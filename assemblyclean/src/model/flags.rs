//! ECMA-335 attribute flag words.
//!
//! Grounded on the teacher library's `raw/heaps/table.rs` `TypeAttributes`/
//! `FieldAttributes` (copied verbatim, same bit values) plus `MethodAttributes`,
//! which the teacher left as a bare `//TODO` stub — filled in here since the
//! reachability, invalidation and rename passes all branch on these bits.

use bitflags::bitflags;

bitflags! {
	#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
	pub struct TypeAttributes: u32 {
		// #### Visibility attributes ####
		const VISIBILITY_MASK = 0x0000_0007;
		const NOT_PUBLIC = 0x0000_0000;
		const PUBLIC = 0x0000_0001;
		const NESTED_PUBLIC = 0x0000_0002;
		const NESTED_PRIVATE = 0x0000_0003;
		const NESTED_FAMILY = 0x0000_0004;
		const NESTED_ASSEMBLY = 0x0000_0005;
		const NESTED_FAMILY_AND_ASSEMBLY = 0x0000_0006;
		const NESTED_FAMILY_OR_ASSEMBLY = 0x0000_0007;

		// #### Class layout attributes ####
		const LAYOUT_MASK = 0x0000_0018;
		const AUTO_LAYOUT = 0x0000_0000;
		const SEQUENTIAL_LAYOUT = 0x0000_0008;
		const EXPLICIT_LAYOUT = 0x0000_0010;

		// #### Class semantics attributes ####
		const CLASS_SEMANTICS_MASK = 0x0000_0020;
		const CLASS = 0x0000_0000;
		const INTERFACE = 0x0000_0020;

		// #### Special semantics in addition to class semantics ####
		const ABSTRACT = 0x0000_0080;
		const SEALED = 0x0000_0100;
		const SPECIAL_NAME = 0x0000_0400;

		// #### Implementation attributes ####
		const IMPORTED = 0x0000_1000;
		const SERIALIZABLE = 0x0000_2000;

		// #### Additional attributes ####
		const RT_SPECIAL_NAME = 0x0000_0800;
		const HAS_SECURITY = 0x0004_0000;
		const BEFORE_FIELD_INIT = 0x0010_0000;
		const IS_TYPE_FORWARDER = 0x0020_0000;
	}
}

impl TypeAttributes {
	#[inline]
	pub fn is_public(&self) -> bool {
		matches!(
			*self & Self::VISIBILITY_MASK,
			Self::PUBLIC | Self::NESTED_PUBLIC
		)
	}

	#[inline]
	pub fn is_interface(&self) -> bool {
		self.contains(Self::INTERFACE)
	}
}

bitflags! {
	#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
	pub struct FieldAttributes: u16 {
		const FIELD_ACCESS_MASK = 0x0007;
		const COMPILER_CONTROLLED = 0x0000;
		const PRIVATE = 0x0001;
		const FAMILY_AND_ASSEMBLY = 0x0002;
		const ASSEMBLY = 0x0003;
		const FAMILY = 0x0004;
		const FAMILY_OR_ASSEMBLY = 0x0005;
		const PUBLIC = 0x0006;

		const STATIC = 0x0010;
		const INIT_ONLY = 0x0020;
		const LITERAL = 0x0040;
		const NOT_SERIALIZED = 0x0080;
		const SPECIAL_NAME = 0x0200;

		const PINVOKE_IMPL = 0x2000;

		const RT_SPECIAL_NAME = 0x0400;
		const HAS_FIELD_MARSHAL = 0x1000;
		const HAS_DEFAULT = 0x8000;
		const HAS_FIELD_RVA = 0x0100;
	}
}

bitflags! {
	#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
	pub struct MethodAttributes: u16 {
		const MEMBER_ACCESS_MASK = 0x0007;
		const COMPILER_CONTROLLED = 0x0000;
		const PRIVATE = 0x0001;
		const FAMILY_AND_ASSEMBLY = 0x0002;
		const ASSEMBLY = 0x0003;
		const FAMILY = 0x0004;
		const FAMILY_OR_ASSEMBLY = 0x0005;
		const PUBLIC = 0x0006;

		const STATIC = 0x0010;
		const FINAL = 0x0020;
		const VIRTUAL = 0x0040;
		const HIDE_BY_SIG = 0x0080;

		const VTABLE_LAYOUT_MASK = 0x0100;
		const REUSE_SLOT = 0x0000;
		const NEW_SLOT = 0x0100;

		const STRICT = 0x0200;
		const ABSTRACT = 0x0400;
		const SPECIAL_NAME = 0x0800;

		const PINVOKE_IMPL = 0x2000;
		const UNMANAGED_EXPORT = 0x0008;
		const RT_SPECIAL_NAME = 0x1000;
		const HAS_SECURITY = 0x4000;
		const REQUIRE_SEC_OBJECT = 0x8000;
	}
}

impl MethodAttributes {
	#[inline]
	pub fn is_public(&self) -> bool {
		matches!(*self & Self::MEMBER_ACCESS_MASK, Self::PUBLIC)
	}

	#[inline]
	pub fn is_static(&self) -> bool {
		self.contains(Self::STATIC)
	}

	#[inline]
	pub fn is_abstract(&self) -> bool {
		self.contains(Self::ABSTRACT)
	}

	/// `specialname` or `rtspecialname` — constructors (`.ctor`/`.cctor`) always carry
	/// `rtspecialname`, as do property/event accessor pairs and operator overloads.
	#[inline]
	pub fn is_special_name(&self) -> bool {
		self.contains(Self::SPECIAL_NAME) || self.contains(Self::RT_SPECIAL_NAME)
	}
}
