//! C7's rename half. `spec.md` §4.5: dead methods get `Method_<N>` (monotonic
//! across types, no re-rename guard); dead types get `Type_<N>` (sorted
//! ascending by full-name length, skipped if already renamed).

use std::collections::HashSet;

use crate::model::{Module, TypeId};
use crate::options::CleanOptions;

/// `spec.md` §4.5: "walks all types in type-enumeration order. For each method
/// not in live-methods and that is neither a constructor nor a special-name
/// method, rename to `Method_<N>`..." **Not** guarded against renaming an
/// already-`Method_N`-named method — `spec.md` §9's documented open question,
/// resolved here by leaving the asymmetry with the type renamer in place.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn rename_dead_methods(module: &mut Module, live_methods: &HashSet<String>, options: &CleanOptions) -> usize {
	let mut counter = 0u32;
	let mut renamed = 0usize;

	for type_id in module.type_ids() {
		let Some(methods) = module.type_def(type_id).map(|t| t.methods.clone()) else { continue };
		for method_id in methods {
			let Some(def) = module.method_def(method_id) else { continue };
			if def.is_constructor() || def.flags.is_special_name() {
				continue;
			}
			if live_methods.contains(&def.full_name(module)) {
				continue;
			}

			let new_name = CleanOptions::render(&options.dead_method_template, counter);
			counter += 1;
			module.method_def_mut(method_id).unwrap().name = new_name;
			renamed += 1;
		}
	}
	renamed
}

/// `spec.md` §4.5: "collect all non-live types ordered by ascending length of
/// full-name (tie-break: stable on enumeration order). Skip any type whose
/// short name already starts with `Type_`."
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn rename_dead_types(module: &mut Module, live_types: &HashSet<String>, options: &CleanOptions) -> usize {
	let prefix = match options.dead_type_template.split_once("{n}") {
		Some((prefix, _)) => prefix.to_string(),
		None => options.dead_type_template.clone(),
	};

	let mut dead: Vec<TypeId> = module
		.type_ids()
		.into_iter()
		.filter(|&id| {
			let Some(def) = module.type_def(id) else { return false };
			!live_types.contains(&def.full_name(module))
		})
		.collect();
	// `sort_by_key` is a stable sort, so ties keep their enumeration order.
	dead.sort_by_key(|&id| module.type_def(id).map(|d| d.full_name(module).len()).unwrap_or(0));

	let mut counter = 0u32;
	let mut renamed = 0usize;
	for type_id in dead {
		let Some(def) = module.type_def(type_id) else { continue };
		if def.name.starts_with(&prefix) {
			continue;
		}

		let new_name = CleanOptions::render(&options.dead_type_template, counter);
		counter += 1;
		module.type_def_mut(type_id).unwrap().name = new_name;
		renamed += 1;
	}
	renamed
}
