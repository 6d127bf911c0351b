//! Configuration source implementations.

mod env;
mod file;
mod flags;
mod source;

pub use env::EnvSource;
pub use file::FileSource;
pub use flags::FlagSource;
pub use source::{RawSourceMap, Source};
