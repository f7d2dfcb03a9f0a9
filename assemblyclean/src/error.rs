//! Crate error type. Grounded on the teacher library's `schema/errors.rs`
//! `ReadError` — a plain enum with a `From<std::io::Error>` impl, no derive-macro
//! error crate.

#[derive(Debug)]
pub enum Error {
	/// Reading the execution log failed. The only genuinely fatal condition the
	/// core can observe on its own (`spec.md` §7 band 3).
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(value: std::io::Error) -> Self {
		Self::Io(value)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Io(e) => write!(f, "failed to read execution log: {e}"),
		}
	}
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
