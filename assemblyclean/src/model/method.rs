use crate::model::body::Body;
use crate::model::flags::MethodAttributes;
use crate::model::ids::TypeId;
use crate::model::reference::{GenericParam, TypeRef};
use crate::model::Module;

#[derive(Debug, Clone)]
pub struct ParamDef {
	pub name: String,
	pub ty: TypeRef,
}

/// A method definition. Full-name identity (`spec.md` §3 invariant 1 and 4) is
/// computed on demand from `declaring_type`/`name`/`params`/`return_type` rather
/// than cached, so renaming a *type* automatically changes every one of its
/// methods' full names the next time someone asks for one — which is exactly the
/// behavior `spec.md` wants *before* live-sets are frozen, and exactly the behavior
/// that must stop once they are (hence renames are confined to the rewrite phase,
/// which runs strictly after the analyzer has captured its live-sets as owned
/// `String`s).
#[derive(Debug, Clone)]
pub struct MethodDef {
	pub declaring_type: TypeId,
	pub name: String,
	pub return_type: TypeRef,
	pub params: Vec<ParamDef>,
	pub generic_params: Vec<GenericParam>,
	pub flags: MethodAttributes,
	pub body: Option<Body>,
}

impl MethodDef {
	pub fn is_constructor(&self) -> bool {
		self.flags.is_special_name() && (self.name == ".ctor" || self.name == ".cctor")
	}

	pub fn full_name(&self, module: &Module) -> String {
		let declaring = module
			.type_defs
			.get(self.declaring_type.index())
			.map(|t| t.full_name(module))
			.unwrap_or_default();
		let params = self
			.params
			.iter()
			.map(|p| p.ty.full_name(module))
			.collect::<Vec<_>>()
			.join(", ");
		let ret = self.return_type.full_name(module);
		format!("{declaring}::{}({params}) : {ret}", self.name)
	}
}
