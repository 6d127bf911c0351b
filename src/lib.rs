//! # confstack
//!
//! Layered configuration resolution: declare a typed schema once, and let the
//! resolver merge values from command-line flags, environment variables, and
//! an INI-style config file into one typed configuration object.
//!
//! ## Overview
//!
//! Three independent source extractors each turn one raw input into a map of
//! field name → coerced scalar, all using the same scalar parsers — so a
//! value means the same thing no matter where it came from. The merge step
//! then applies precedence per field: the first source that supplies a field
//! wins, required fields must be supplied by someone, and every value must
//! match its declared kind. Resolution is all-or-nothing.
//!
//! ## Quick Start
//!
//! ```rust
//! use confstack::prelude::*;
//!
//! #[derive(Debug, serde::Deserialize)]
//! struct AppConfig {
//!     host: String,
//!     port: i64,
//!     verbose: bool,
//! }
//!
//! # fn main() -> confstack::error::Result<()> {
//! let schema = Schema::builder()
//!     .required("host", FieldKind::String)
//!     .optional("port", FieldKind::Integer, 8080)
//!     .optional("verbose", FieldKind::Boolean, false)
//!     .build();
//!
//! let resolver = Resolver::builder()
//!     .with_flags(FlagSource::new(["--host", "db.internal", "--verbose"]))
//!     .with_env(EnvSource::with_vars([("port", "0x1f90")]))
//!     .build();
//!
//! let config: AppConfig = resolver.load(&schema)?;
//! assert_eq!(config.host, "db.internal");
//! assert_eq!(config.port, 8080);
//! assert!(config.verbose);
//! # Ok(())
//! # }
//! ```
//!
//! For the conventional stack — process arguments, then the process
//! environment, then `config.ini` in the working directory — use
//! [`Resolver::standard`](resolve::Resolver::standard).
//!
//! ## Sources
//!
//! - **Flags**: `--name=VALUE`, `--name VALUE`, bare `--name` for booleans,
//!   and `--no-name` to force a boolean off. Unknown options are skipped, so
//!   the extractor coexists with other argument consumers.
//! - **Environment**: case-insensitive variable matching with an optional
//!   prefix, exact-case entries preferred.
//! - **File**: one named `[section]` of an INI-style file; a missing file
//!   contributes nothing.
//!
//! Custom sources implement [`sources::Source`] and layer in anywhere in the
//! precedence order.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

mod de;
pub mod error;
pub mod parse;
pub mod resolve;
pub mod schema;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::error::{ConfigError, Result};
    pub use crate::resolve::{Resolved, Resolver, ResolverBuilder};
    pub use crate::schema::{FieldKind, FieldSpec, Schema, Value};
    pub use crate::sources::{EnvSource, FileSource, FlagSource, Source};
}
