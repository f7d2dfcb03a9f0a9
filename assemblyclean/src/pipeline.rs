//! C8: the pipeline orchestrator. `spec.md` §4.6: "invokes, in exactly this
//! order: (1) string-decryption folder, (2) reachability analyzer, (3) body
//! invalidator, (4) method reorderer, (5) dead-method renamer, (6) dead-type
//! renamer." The ordering matters: the analyzer must see un-invalidated bodies
//! to discover callees, and renames must post-date all analysis.

use crate::analysis::reach::identify_live_code;
use crate::codegen::invalidate::invalidate_unused;
use crate::decrypt::fold::fold_decryption_calls;
use crate::model::Module;
use crate::options::CleanOptions;
use crate::rewrite::{rename, reorder};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
	pub live_methods_count: usize,
	pub live_types_count: usize,
	pub decrypted_count: usize,
	pub invalidated_count: usize,
	pub renamed_methods_count: usize,
	pub renamed_types_count: usize,
}

/// The single entry point `spec.md` §6 describes as
/// `clean(assembly, log-roots) -> summary{...}`. Infallible — every failure
/// mode the three core subsystems can hit is either silently skipped (band 1)
/// or a caller-side I/O failure that happens before this is ever called
/// (band 3); see `spec.md` §7.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn clean(module: &mut Module, roots: &HashSet<String>, options: &CleanOptions) -> Summary {
	let decrypted_count = fold_decryption_calls(module, options);
	#[cfg(feature = "tracing")]
	tracing::debug!(decrypted_count, "folded string-decryption call sites");

	let (live_methods, live_types) = identify_live_code(module, roots, options);
	#[cfg(feature = "tracing")]
	tracing::debug!(live_methods = live_methods.len(), live_types = live_types.len(), "computed reachability");

	let invalidated_count = invalidate_unused(module, &live_methods);
	reorder::reorder(module, &live_methods);
	let renamed_methods_count = rename::rename_dead_methods(module, &live_methods, options);
	let renamed_types_count = rename::rename_dead_types(module, &live_types, options);

	Summary {
		live_methods_count: live_methods.len(),
		live_types_count: live_types.len(),
		decrypted_count,
		invalidated_count,
		renamed_methods_count,
		renamed_types_count,
	}
}
