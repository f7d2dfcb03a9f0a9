//! C1 (type-reference walker) and C2 (reachability analyzer): a worklist-driven
//! graph walk over the method/type metadata computing the live sets the rest of
//! the pipeline invalidates, reorders and renames against.

use std::collections::{HashSet, VecDeque};

use crate::model::{MethodId, MethodRef, Module, Operand, TypeId, TypeRef};
use crate::options::CleanOptions;

/// C1. Transitively marks `type_ref` reachable: generic parameters are a no-op,
/// generic instances recurse into their element and arguments, and anything
/// else is inserted into `live_types` by full name and, if it resolves to a
/// local definition, enqueued on `worklist` for C2 to expand.
///
/// `spec.md` §4.1's rationale: a reference to `Container<Foo, Bar>` does not
/// make the unbound `Container<,>` key live by itself — it makes `Container<,>`,
/// `Foo`, and `Bar` each live, which is why generic instances fan out here
/// instead of being inserted as a single opaque key.
pub fn mark(module: &Module, type_ref: Option<&TypeRef>, live_types: &mut HashSet<String>, worklist: &mut VecDeque<TypeId>) {
	let Some(type_ref) = type_ref else { return };
	match type_ref {
		TypeRef::GenericParam { .. } => {}
		// Primitives have no `TypeDef` row to mark live or dead (`model::reference`'s
		// doc comment on `TypeRef::Primitive`) -- inserting their display string
		// (`"string"`, `"int"`, ...) into `live_types` would both pollute the set and,
		// if a real type happened to share that full-name, steal its `insert` so it's
		// never enqueued for expansion.
		TypeRef::Primitive(_) => {}
		TypeRef::GenericInstance { element, arguments } => {
			mark(module, Some(element), live_types, worklist);
			for argument in arguments {
				mark(module, Some(argument), live_types, worklist);
			}
		}
		other => {
			let full_name = other.full_name(module);
			if live_types.insert(full_name) {
				if let TypeRef::Def(id) = other {
					worklist.push_back(*id);
				}
			}
		}
	}
}

fn mark_method_ref(module: &Module, method_ref: &MethodRef, live_methods: &mut HashSet<String>, worklist: &mut VecDeque<MethodId>) {
	let full_name = method_ref.full_name(module);
	if live_methods.insert(full_name) {
		if let MethodRef::Def(id) = method_ref {
			worklist.push_back(*id);
		}
	}
}

/// C2. `spec.md` §4.2: build the two full-name lookup tables, seed both
/// worklists, then alternately drain them to a fixed point. Both returned sets
/// are keyed by full-name string, matching the execution-log format and the
/// identity invariant in `spec.md` §3.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn identify_live_code(module: &Module, roots: &HashSet<String>, options: &CleanOptions) -> (HashSet<String>, HashSet<String>) {
	// Step 1: full-name -> id tables, first occurrence wins on duplicate keys.
	let mut methods_by_name: fxhash::FxHashMap<String, MethodId> = fxhash::FxHashMap::default();
	for id in module.method_ids() {
		let Some(def) = module.method_def(id) else { continue };
		methods_by_name.entry(def.full_name(module)).or_insert(id);
	}
	let mut types_by_name: fxhash::FxHashMap<String, TypeId> = fxhash::FxHashMap::default();
	for id in module.type_ids() {
		let Some(def) = module.type_def(id) else { continue };
		types_by_name.entry(def.full_name(module)).or_insert(id);
	}

	let mut live_methods = HashSet::new();
	let mut method_worklist: VecDeque<MethodId> = VecDeque::new();

	// Step 2: seed live-methods with roots that resolve to a known method.
	for root in roots {
		if let Some(&id) = methods_by_name.get(root) {
			if live_methods.insert(root.clone()) {
				method_worklist.push_back(id);
			}
		}
	}

	let mut live_types = HashSet::new();
	let mut type_worklist: VecDeque<TypeId> = VecDeque::new();

	// Step 3: seed live-types with the always-live floor.
	for id in module.type_ids() {
		let Some(def) = module.type_def(id) else { continue };
		let always_live = (def.flags.is_public() && !def.is_compiler_generated(module, &options.compiler_generated_attribute))
			|| def.is_enum(module)
			|| def.inherits_from(module, &options.reflected_root);
		if always_live {
			let full_name = def.full_name(module);
			if live_types.insert(full_name) {
				type_worklist.push_back(id);
			}
		}
	}

	// Step 4: alternately drain both worklists to a fixed point.
	while !method_worklist.is_empty() || !type_worklist.is_empty() {
		if let Some(id) = method_worklist.pop_front() {
			expand_method(module, id, &mut live_methods, &mut method_worklist, &mut live_types, &mut type_worklist);
		}
		if let Some(id) = type_worklist.pop_front() {
			expand_type(module, id, &mut live_types, &mut type_worklist);
		}
	}

	(live_methods, live_types)
}

fn expand_method(
	module: &Module,
	id: MethodId,
	live_methods: &mut HashSet<String>,
	method_worklist: &mut VecDeque<MethodId>,
	live_types: &mut HashSet<String>,
	type_worklist: &mut VecDeque<TypeId>,
) {
	let Some(def) = module.method_def(id) else { return };

	mark(module, Some(&TypeRef::Def(def.declaring_type)), live_types, type_worklist);
	mark(module, Some(&def.return_type), live_types, type_worklist);
	for param in &def.params {
		mark(module, Some(&param.ty), live_types, type_worklist);
	}
	for generic_param in &def.generic_params {
		for constraint in &generic_param.constraints {
			mark(module, Some(constraint), live_types, type_worklist);
		}
	}

	let Some(body) = &def.body else { return };
	for instruction in &body.instructions {
		match &instruction.operand {
			Some(Operand::Method(method_ref)) => mark_method_ref(module, method_ref, live_methods, method_worklist),
			Some(Operand::Type(type_ref)) => mark(module, Some(type_ref), live_types, type_worklist),
			Some(Operand::Field(field_ref)) => mark(module, field_ref.field_type(module), live_types, type_worklist),
			_ => {}
		}
	}
}

fn expand_type(module: &Module, id: TypeId, live_types: &mut HashSet<String>, type_worklist: &mut VecDeque<TypeId>) {
	let Some(def) = module.type_def(id) else { return };

	mark(module, def.base_type.as_ref(), live_types, type_worklist);
	for interface in &def.interfaces {
		mark(module, Some(interface), live_types, type_worklist);
	}
	for field_id in &def.fields {
		if let Some(field) = module.field_def(*field_id) {
			mark(module, Some(&field.ty), live_types, type_worklist);
		}
	}
	for property in &def.properties {
		mark(module, Some(&property.ty), live_types, type_worklist);
	}
	for event in &def.events {
		mark(module, Some(&event.ty), live_types, type_worklist);
	}
	for attribute in &def.custom_attributes {
		mark(module, Some(&attribute.attribute_type), live_types, type_worklist);
	}
	for generic_param in &def.generic_params {
		for constraint in &generic_param.constraints {
			mark(module, Some(constraint), live_types, type_worklist);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::builder::*;
	use crate::model::*;

	/// `spec.md` §8 scenario 5: roots `{A.Main}` where `A.Main` calls `B.Helper`
	/// and `B.Helper` references a field of type `C`.
	#[test]
	fn reachability_from_root() {
		let mut module = Module::new();
		let c = module.add_type(TypeDef::new("", "C", TypeAttributes::PUBLIC));
		let b = module.add_type(TypeDef::new("", "B", TypeAttributes::PUBLIC));
		let a = module.add_type(TypeDef::new("", "A", TypeAttributes::empty()));

		let field = module.add_field(b, FieldDef::new("item", TypeRef::def(c), FieldAttributes::STATIC));

		let helper = add_void_method(&mut module, b, "Helper", MethodAttributes::PUBLIC | MethodAttributes::STATIC);
		{
			let def = module.method_def_mut(helper).unwrap();
			def.body = Some(body_with(vec![
				Instruction { opcode: Opcode::ldsfld, operand: Some(Operand::Field(FieldRef::Def(field))) },
				Instruction { opcode: Opcode::ret, operand: None },
			]));
		}

		let main = add_void_method(&mut module, a, "Main", MethodAttributes::PUBLIC | MethodAttributes::STATIC);
		{
			let def = module.method_def_mut(main).unwrap();
			def.body = Some(body_with(vec![
				Instruction { opcode: Opcode::call, operand: Some(Operand::Method(MethodRef::Def(helper))) },
				Instruction { opcode: Opcode::ret, operand: None },
			]));
		}

		let roots: HashSet<String> = [module.method_def(main).unwrap().full_name(&module)].into_iter().collect();
		let (live_methods, live_types) = identify_live_code(&module, &roots, &CleanOptions::default());

		assert!(live_methods.contains(&module.method_def(main).unwrap().full_name(&module)));
		assert!(live_methods.contains(&module.method_def(helper).unwrap().full_name(&module)));
		assert!(live_types.contains(&module.type_def(c).unwrap().full_name(&module)));
		assert!(live_types.contains(&module.type_def(b).unwrap().full_name(&module)));
	}

	#[test]
	fn always_live_floor_includes_public_enum_and_reflected_root() {
		let mut module = Module::new();
		let mut enum_ty = TypeDef::new("", "Color", TypeAttributes::empty());
		enum_ty.base_type = Some(TypeRef::unresolved(SYSTEM_ENUM));
		let enum_id = module.add_type(enum_ty);

		let public_ty = module.add_type(TypeDef::new("", "Public", TypeAttributes::PUBLIC));

		let mut mono_behaviour = TypeDef::new("UnityEngine", "MonoBehaviour", TypeAttributes::PUBLIC);
		mono_behaviour.base_type = Some(TypeRef::unresolved("UnityEngine.Object"));
		let mono_behaviour_id = module.add_type(mono_behaviour);

		let mut behaviour = TypeDef::new("", "PlayerController", TypeAttributes::empty());
		behaviour.base_type = Some(TypeRef::def(mono_behaviour_id));
		let behaviour_id = module.add_type(behaviour);

		let roots = HashSet::new();
		let (_, live_types) = identify_live_code(&module, &roots, &CleanOptions::default());

		assert!(live_types.contains(&module.type_def(enum_id).unwrap().full_name(&module)));
		assert!(live_types.contains(&module.type_def(public_ty).unwrap().full_name(&module)));
		assert!(live_types.contains(&module.type_def(behaviour_id).unwrap().full_name(&module)));
	}
}
