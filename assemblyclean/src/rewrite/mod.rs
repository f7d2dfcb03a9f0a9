pub mod rename;
pub mod reorder;
