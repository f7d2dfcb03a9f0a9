//! A post-processing deobfuscator core for CLI assemblies mangled by a
//! name/string obfuscator. Given an in-memory assembly object graph (`model`)
//! and a set of method full-names observed during execution, [`pipeline::clean`]
//! folds away an inlined XOR string-decryption idiom, classifies methods and
//! types as live or dead, blanks dead bodies, reorders each type's method list,
//! and renames dead methods and types to short synthetic identifiers.

pub mod analysis;
pub mod codegen;
pub mod decrypt;
pub mod error;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod rewrite;
pub mod roots;

pub use error::{Error, Result};
pub use options::CleanOptions;
pub use pipeline::{clean, Summary};
