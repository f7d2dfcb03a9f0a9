//! C5: the IL pattern extractor. `spec.md` §4.3.3 — recognizes the 5-instruction
//! byte-array setup idiom backwards from a decryption call site, twice in a row
//! (once for the "data" array, once for the "key" array, since the key was
//! pushed onto the stack first and therefore sits earlier in the stream).

use crate::model::{Body, MethodRef, Module, Opcode, Operand};

/// One successfully recognized setup idiom: the reconstructed byte array and
/// the five instruction indices (in ascending order) it occupied.
struct Idiom {
	bytes: Vec<u8>,
	indices: [usize; 5],
}

fn method_ref_short_name<'m>(module: &'m Module, method_ref: &'m MethodRef) -> Option<&'m str> {
	match method_ref {
		MethodRef::Def(id) => module.method_def(*id).map(|m| m.name.as_str()),
		MethodRef::Unresolved { full_name } => {
			// `Namespace.Type::Method(params) : ret` -- take the segment between
			// `::` and the parameter list's opening paren.
			let after_scope = full_name.rsplit("::").next().unwrap_or(full_name);
			Some(after_scope.split('(').next().unwrap_or(after_scope))
		}
	}
}

/// Matches the 5-step idiom ending at `step5_index` (expected to be `call
/// InitializeArray`), walking backwards to `step5_index - 4`. Returns `None` on
/// any mismatch, including running off the start of the instruction list.
fn match_idiom(body: &Body, module: &Module, step5_index: usize) -> Option<Idiom> {
	let step1_index = step5_index.checked_sub(4)?;
	let [step1, step2, step3, step4, step5] = [step1_index, step1_index + 1, step1_index + 2, step1_index + 3, step5_index];

	let i1 = body.instructions.get(step1)?;
	let i2 = body.instructions.get(step2)?;
	let i3 = body.instructions.get(step3)?;
	let i4 = body.instructions.get(step4)?;
	let i5 = body.instructions.get(step5)?;

	if !i1.opcode.mnemonic().starts_with("ldc.i4") {
		return None;
	}
	if i2.opcode != Opcode::newarr {
		return None;
	}
	if i3.opcode != Opcode::dup {
		return None;
	}
	if i4.opcode != Opcode::ldtoken {
		return None;
	}
	let Some(Operand::Field(field_ref)) = &i4.operand else { return None };
	let field_def = field_ref.resolve(module)?;
	let bytes = field_def.initial_value.clone()?;

	if i5.opcode != Opcode::call {
		return None;
	}
	let Some(Operand::Method(method_ref)) = &i5.operand else { return None };
	if method_ref_short_name(module, method_ref) != Some("InitializeArray") {
		return None;
	}

	Some(Idiom { bytes, indices: [step1, step2, step3, step4, step5] })
}

/// Extracts the (key, data) byte arrays preceding a decryption-helper call at
/// `call_index`, plus the ten setup-instruction indices to remove afterward.
/// Returns `None` if either idiom fails to match, per `spec.md` §4.3.3/§4.3.4's
/// edge cases ("if either array fails to match, skip").
pub fn extract_setup(body: &Body, module: &Module, call_index: usize) -> Option<(Vec<u8>, Vec<u8>, Vec<usize>)> {
	// "If the call's own index is less than 2, skip (not enough preceding
	// instructions)" -- `match_idiom`'s checked arithmetic makes this redundant
	// for correctness, but the explicit check keeps the documented edge case
	// visible as its own guard.
	if call_index < 2 {
		return None;
	}

	let data_idiom = match_idiom(body, module, call_index.checked_sub(1)?)?;
	let key_idiom = match_idiom(body, module, data_idiom.indices[0].checked_sub(1)?)?;

	let mut indices: Vec<usize> = key_idiom.indices.into_iter().chain(data_idiom.indices).collect();
	indices.sort_unstable();

	Some((key_idiom.bytes, data_idiom.bytes, indices))
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
		instructions.push(Instruction::with_operand(Opcode::call, Operand::Method(MethodRef::Unresolved {
			full_name: "System.Runtime.CompilerServices.RuntimeHelpers::InitializeArray(System.Array, System.RuntimeFieldHandle) : void".to_string(),
		})));
	}

	#[test]
	fn matches_well_formed_idiom() {
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
		let helper = add_void_method(&mut module, helpers, "Decrypt", MethodAttributes::PUBLIC | MethodAttributes::STATIC);

		let mut instructions = Vec::new();
		push_array_idiom(&mut instructions, key_field, 3);
		push_array_idiom(&mut instructions, data_field, 6);
		let call_index = instructions.len();
		instructions.push(Instruction::with_operand(Opcode::call, Operand::Method(MethodRef::Def(helper))));

		let body = body_with(instructions);
		let (key, data, removed) = extract_setup(&body, &module, call_index).expect("idiom should match");
		assert_eq!(key, vec![0x10, 0x20, 0x30]);
		assert_eq!(data, vec![0x58, 0x45, 0x6F, 0x6C, 0x51, 0x4F]);
		assert_eq!(removed.len(), 10);
	}

	#[test]
	fn mismatched_predecessor_yields_none() {
		let module = Module::new();
		let body = body_with(vec![Instruction::new(Opcode::nop), Instruction::new(Opcode::nop), Instruction::new(Opcode::call)]);
		assert!(extract_setup(&body, &module, 2).is_none());
	}
}
