use crate::model::field::FieldDef;
use crate::model::ids::{FieldId, MethodId, TypeId};
use crate::model::method::MethodDef;
use crate::model::ty::TypeDef;

/// The assembly object graph the pipeline operates on. `spec.md` §3: "root; owns an
/// ordered sequence of top-level types; each type may contain nested types."
///
/// Stored as three flat arenas (`type_defs`/`method_defs`/`field_defs`) indexed by
/// the small dense ids in `model::ids`, rather than an owned recursive tree —
/// per `spec.md` §9's Design Notes, this is the "stable numeric IDs assigned at
/// load time" alternative to textual identity, used internally alongside (not
/// instead of) the full-name strings the log format and live-sets are keyed on.
#[derive(Debug, Clone, Default)]
pub struct Module {
	pub(crate) type_defs: Vec<TypeDef>,
	pub(crate) method_defs: Vec<MethodDef>,
	pub(crate) field_defs: Vec<FieldDef>,
	top_level_types: Vec<TypeId>,
}

impl Module {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_type(&mut self, def: TypeDef) -> TypeId {
		let id = TypeId(self.type_defs.len() as u32);
		self.type_defs.push(def);
		self.top_level_types.push(id);
		id
	}

	pub fn add_nested_type(&mut self, parent: TypeId, mut def: TypeDef) -> TypeId {
		def.declaring_type = Some(parent);
		let id = TypeId(self.type_defs.len() as u32);
		self.type_defs.push(def);
		self.type_defs[parent.index()].nested_types.push(id);
		id
	}

	pub fn add_method(&mut self, owner: TypeId, def: MethodDef) -> MethodId {
		debug_assert_eq!(def.declaring_type, owner);
		let id = MethodId(self.method_defs.len() as u32);
		self.method_defs.push(def);
		self.type_defs[owner.index()].methods.push(id);
		id
	}

	pub fn add_field(&mut self, owner: TypeId, def: FieldDef) -> FieldId {
		let id = FieldId(self.field_defs.len() as u32);
		self.field_defs.push(def);
		self.type_defs[owner.index()].fields.push(id);
		id
	}

	pub fn type_def(&self, id: TypeId) -> Option<&TypeDef> {
		self.type_defs.get(id.index())
	}

	pub fn type_def_mut(&mut self, id: TypeId) -> Option<&mut TypeDef> {
		self.type_defs.get_mut(id.index())
	}

	pub fn method_def(&self, id: MethodId) -> Option<&MethodDef> {
		self.method_defs.get(id.index())
	}

	pub fn method_def_mut(&mut self, id: MethodId) -> Option<&mut MethodDef> {
		self.method_defs.get_mut(id.index())
	}

	pub fn field_def(&self, id: FieldId) -> Option<&FieldDef> {
		self.field_defs.get(id.index())
	}

	pub fn top_level_types(&self) -> &[TypeId] {
		&self.top_level_types
	}

	/// Depth-first walk of the full nesting tree. `spec.md` §3: "The core
	/// enumerates *all* types via depth-first traversal of the nesting tree." Every
	/// other pass (C2's table build, C6's top-level-only scan, C7's enumeration
	/// order) is built on top of this one walk rather than re-implementing it.
	pub fn type_ids(&self) -> Vec<TypeId> {
		let mut order = Vec::with_capacity(self.type_defs.len());
		let mut stack: Vec<TypeId> = self.top_level_types.iter().rev().copied().collect();
		while let Some(id) = stack.pop() {
			order.push(id);
			if let Some(def) = self.type_defs.get(id.index()) {
				stack.extend(def.nested_types.iter().rev().copied());
			}
		}
		order
	}

	pub fn method_ids(&self) -> Vec<MethodId> {
		self.type_ids()
			.into_iter()
			.flat_map(|t| self.type_defs[t.index()].methods.iter().copied())
			.collect()
	}

	pub fn field_ids(&self) -> Vec<FieldId> {
		self.type_ids()
			.into_iter()
			.flat_map(|t| self.type_defs[t.index()].fields.iter().copied())
			.collect()
	}
}
