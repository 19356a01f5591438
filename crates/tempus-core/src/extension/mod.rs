//! Extension traits for configuration tables.

mod toml_table;

pub use toml_table::TomlTableExt;
