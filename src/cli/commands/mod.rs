//! Pipeline commands behind the `--export` and `--import` modes.

pub mod export;
pub mod import;
