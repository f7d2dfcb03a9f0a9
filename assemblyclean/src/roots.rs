//! C9: the execution-log reader. `spec.md` §6: "Text, newline-delimited, UTF-8.
//! Each line is a single method full-name ... Order is not significant,
//! duplicates are collapsed."

use std::collections::HashSet;
use std::io::BufRead;

use crate::error::Result;

/// Reads every line of `reader` into a deduplicated set of root full-names.
/// Empty lines become empty-string entries, per `spec.md` §6 — they simply never
/// match a method-table key, so no special-casing is needed here.
pub fn load_roots(reader: impl BufRead) -> Result<HashSet<String>> {
	let mut roots = HashSet::new();
	for line in reader.lines() {
		roots.insert(line?);
	}
	Ok(roots)
}
