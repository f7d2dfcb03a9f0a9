//! C6: the string-decryption folder. `spec.md` §4.3.1/§4.3.2/§4.3.4: find the
//! decryption helpers, collect every call site (in discovery order), then patch
//! each site in *reverse* so removing a site's setup instructions never
//! perturbs the indices of a site still waiting to be processed.

use std::collections::HashSet;

use crate::decrypt::pattern::extract_setup;
use crate::model::{Instruction, MethodDef, MethodId, MethodRef, Module, Opcode, Operand, Primitive, TypeRef};
use crate::options::CleanOptions;

fn is_decryption_helper_candidate(def: &MethodDef) -> bool {
	if !def.flags.is_static() || !def.flags.is_public() {
		return false;
	}
	if def.return_type != TypeRef::Primitive(Primitive::String) {
		return false;
	}
	if def.params.len() != 2 {
		return false;
	}
	if !def.params.iter().all(|p| p.ty == TypeRef::Primitive(Primitive::ByteArray)) {
		return false;
	}
	let Some(body) = &def.body else { return false };
	body.contains_opcode(Opcode::xor)
}

/// `spec.md` §4.3.1: "Scan only top-level types of the module (not nested)."
fn discover_helpers(module: &Module) -> HashSet<MethodId> {
	let mut candidates = HashSet::new();
	for &type_id in module.top_level_types() {
		let Some(ty) = module.type_def(type_id) else { continue };
		for &method_id in &ty.methods {
			let Some(def) = module.method_def(method_id) else { continue };
			if is_decryption_helper_candidate(def) {
				candidates.insert(method_id);
			}
		}
	}
	candidates
}

/// `spec.md` §4.3.2: "Walk all methods of all types (including nested)." Uses
/// `Module::method_ids`, so call sites come back in the same depth-first,
/// per-type order C2's lookup-table build and C7's enumeration share.
fn collect_call_sites(module: &Module, candidates: &HashSet<MethodId>) -> Vec<(MethodId, usize)> {
	let mut sites = Vec::new();
	for method_id in module.method_ids() {
		let Some(def) = module.method_def(method_id) else { continue };
		let Some(body) = &def.body else { continue };
		for (index, instruction) in body.instructions.iter().enumerate() {
			if instruction.opcode != Opcode::call {
				continue;
			}
			let Some(Operand::Method(MethodRef::Def(callee))) = &instruction.operand else { continue };
			if candidates.contains(callee) {
				sites.push((method_id, index));
			}
		}
	}
	sites
}

/// Patches one call site. Returns `false` (site left unchanged, not counted)
/// for any of the edge cases in `spec.md` §4.3.3/§4.3.4: idiom mismatch, null
/// initial-value blob, non-UTF-8 plaintext, or empty key.
fn patch_call_site(module: &mut Module, method_id: MethodId, call_index: usize, terminator: char) -> bool {
	let extraction = {
		let Some(def) = module.method_def(method_id) else { return false };
		let Some(body) = &def.body else { return false };
		extract_setup(body, module, call_index)
	};
	let Some((key, data, mut indices)) = extraction else { return false };
	if key.is_empty() {
		return false;
	}

	let plaintext_bytes: Vec<u8> = data.iter().enumerate().map(|(i, byte)| byte ^ key[i % key.len()]).collect();
	let Ok(mut plaintext) = String::from_utf8(plaintext_bytes) else { return false };
	if let Some(pos) = plaintext.find(terminator) {
		plaintext.truncate(pos);
	}

	let Some(def) = module.method_def_mut(method_id) else { return false };
	let Some(body) = &mut def.body else { return false };
	body.instructions[call_index] = Instruction::with_operand(Opcode::ldstr, Operand::String(plaintext));

	// Descending order: each removal only shifts indices still to come, never
	// the ones already handled, so a plain index-based `Vec` behaves like the
	// source's linked-list removal regardless of visitation order.
	indices.sort_unstable_by(|a, b| b.cmp(a));
	for index in indices {
		body.remove_if_present(index);
	}
	true
}

/// Runs the full fold over `module`, returning the number of call sites
/// successfully patched.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn fold_decryption_calls(module: &mut Module, options: &CleanOptions) -> usize {
	let candidates = discover_helpers(module);
	if candidates.is_empty() {
		return 0;
	}
	let call_sites = collect_call_sites(module, &candidates);

	call_sites
		.into_iter()
		.rev()
		.filter(|&(method_id, call_index)| patch_call_site(module, method_id, call_index, options.plaintext_terminator))
		.count()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::builder::*;
	use crate::model::*;

	fn push_array_idiom(instructions: &mut Vec<Instruction>, field: FieldId, len: i32) {
		instructions.push(Instruction::with_operand(Opcode::ldc_i4_s, Operand::Int32(len)));
		instructions.push(Instruction::new(Opcode::newarr));
		instructions.push(Instruction::new(Opcode::dup));
		instructions.push(Instruction::with_operand(Opcode::ldtoken, Operand::Field(FieldRef::Def(field))));
		instructions.push(Instruction::with_operand(
			Opcode::call,
			Operand::Method(MethodRef::Unresolved {
				full_name: "System.Runtime.CompilerServices.RuntimeHelpers::InitializeArray(System.Array, System.RuntimeFieldHandle) : void".to_string(),
			}),
		));
	}

	fn byte_array_param(name: &str) -> ParamDef {
		ParamDef { name: name.to_string(), ty: TypeRef::Primitive(Primitive::ByteArray) }
	}

	/// `spec.md` §8 scenario 1 (XOR round-trip) and scenario 3 (idiom mismatch),
	/// wired through the full fold rather than the extractor alone.
	#[test]
	fn xor_round_trip_replaces_call_with_ldstr() {
		let mut module = Module::new();
		let helpers = module.add_type(TypeDef::new("", "Helpers", TypeAttributes::PUBLIC));
		let key_field = module.add_field(
			helpers,
			FieldDef::new("k", TypeRef::Primitive(Primitive::ByteArray), FieldAttributes::STATIC).with_initial_value(vec![0x10, 0x20, 0x30]),
		);
		let data_field = module.add_field(
			helpers,
			FieldDef::new("d", TypeRef::Primitive(Primitive::ByteArray), FieldAttributes::STATIC)
				.with_initial_value(vec![0x58, 0x45, 0x6F, 0x6C, 0x51, 0x4F]),
		);
		let helper = add_method(
			&mut module,
			helpers,
			"Decrypt",
			TypeRef::Primitive(Primitive::String),
			vec![byte_array_param("key"), byte_array_param("data")],
			MethodAttributes::PUBLIC | MethodAttributes::STATIC,
		);
		module.method_def_mut(helper).unwrap().body = Some(body_with(vec![
			Instruction::new(Opcode::ldarg_0),
			Instruction::new(Opcode::ldarg_1),
			Instruction::new(Opcode::xor),
			Instruction::new(Opcode::ret),
		]));

		let caller = add_void_method(&mut module, helpers, "Caller", MethodAttributes::PUBLIC | MethodAttributes::STATIC);
		let mut instructions = Vec::new();
		push_array_idiom(&mut instructions, key_field, 3);
		push_array_idiom(&mut instructions, data_field, 6);
		let call_index = instructions.len();
		instructions.push(Instruction::with_operand(Opcode::call, Operand::Method(MethodRef::Def(helper))));
		instructions.push(Instruction::new(Opcode::pop));
		instructions.push(Instruction::new(Opcode::ret));
		module.method_def_mut(caller).unwrap().body = Some(body_with(instructions));

		let patched = fold_decryption_calls(&mut module, &CleanOptions::default());
		assert_eq!(patched, 1);

		let body = module.method_def(caller).unwrap().body.as_ref().unwrap();
		assert_eq!(body.instructions.len(), 3);
		let key = [0x10u8, 0x20, 0x30];
		let data = [0x58u8, 0x45, 0x6F, 0x6C, 0x51, 0x4F];
		let expected: String = String::from_utf8(data.iter().enumerate().map(|(i, b)| b ^ key[i % key.len()]).collect()).unwrap();
		match &body.instructions[0].operand {
			Some(Operand::String(s)) => assert_eq!(s, &expected),
			other => panic!("expected a string literal, got {other:?}"),
		}
		assert_eq!(body.instructions[0].opcode, Opcode::ldstr);
	}

	/// `spec.md` §8 scenario 2: a terminator in the middle of the plaintext
	/// truncates everything after it.
	#[test]
	fn terminator_truncates_plaintext() {
		let mut module = Module::new();
		let helpers = module.add_type(TypeDef::new("", "Helpers", TypeAttributes::PUBLIC));
		let key_bytes = vec![0u8];
		let plaintext = "Player\u{E44F}garbage";
		let data_bytes: Vec<u8> = plaintext.bytes().map(|b| b ^ key_bytes[0]).collect();

		let key_field =
			module.add_field(helpers, FieldDef::new("k", TypeRef::Primitive(Primitive::ByteArray), FieldAttributes::STATIC).with_initial_value(key_bytes));
		let data_field =
			module.add_field(helpers, FieldDef::new("d", TypeRef::Primitive(Primitive::ByteArray), FieldAttributes::STATIC).with_initial_value(data_bytes));
		let helper = add_method(
			&mut module,
			helpers,
			"Decrypt",
			TypeRef::Primitive(Primitive::String),
			vec![byte_array_param("key"), byte_array_param("data")],
			MethodAttributes::PUBLIC | MethodAttributes::STATIC,
		);
		module.method_def_mut(helper).unwrap().body = Some(body_with(vec![Instruction::new(Opcode::xor), Instruction::new(Opcode::ret)]));

		let caller = add_void_method(&mut module, helpers, "Caller", MethodAttributes::PUBLIC | MethodAttributes::STATIC);
		let mut instructions = Vec::new();
		push_array_idiom(&mut instructions, key_field, 1);
		push_array_idiom(&mut instructions, data_field, plaintext.len() as i32);
		instructions.push(Instruction::with_operand(Opcode::call, Operand::Method(MethodRef::Def(helper))));
		instructions.push(Instruction::new(Opcode::ret));
		module.method_def_mut(caller).unwrap().body = Some(body_with(instructions));

		fold_decryption_calls(&mut module, &CleanOptions::default());

		let body = module.method_def(caller).unwrap().body.as_ref().unwrap();
		match &body.instructions[0].operand {
			Some(Operand::String(s)) => assert_eq!(s, "Player"),
			other => panic!("expected a string literal, got {other:?}"),
		}
	}

	/// `spec.md` §8 scenario 3: if the instruction before the helper call is not
	/// `call InitializeArray`, the site is left unchanged and not counted.
	#[test]
	fn idiom_mismatch_leaves_call_site_unchanged() {
		let mut module = Module::new();
		let helpers = module.add_type(TypeDef::new("", "Helpers", TypeAttributes::PUBLIC));
		let helper = add_method(
			&mut module,
			helpers,
			"Decrypt",
			TypeRef::Primitive(Primitive::String),
			vec![byte_array_param("key"), byte_array_param("data")],
			MethodAttributes::PUBLIC | MethodAttributes::STATIC,
		);
		module.method_def_mut(helper).unwrap().body = Some(body_with(vec![Instruction::new(Opcode::xor), Instruction::new(Opcode::ret)]));

		let caller = add_void_method(&mut module, helpers, "Caller", MethodAttributes::PUBLIC | MethodAttributes::STATIC);
		let instructions = vec![
			Instruction::new(Opcode::nop),
			Instruction::new(Opcode::nop),
			Instruction::with_operand(Opcode::call, Operand::Method(MethodRef::Def(helper))),
			Instruction::new(Opcode::ret),
		];
		module.method_def_mut(caller).unwrap().body = Some(body_with(instructions.clone()));

		let patched = fold_decryption_calls(&mut module, &CleanOptions::default());
		assert_eq!(patched, 0);
		assert_eq!(module.method_def(caller).unwrap().body.as_ref().unwrap().instructions, instructions);
	}
}
