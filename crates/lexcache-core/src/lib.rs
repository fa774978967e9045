pub mod config;
pub mod decode;
pub mod sanitize;
pub mod source;
pub mod version;

pub use config::Config;
pub use decode::{DecodeError, decode_legacy};
pub use sanitize::{PLANALTO_ORIGIN, Sanitizer};
pub use source::{DocumentSource, SourcesError, catalogue, load_sources};
pub use version::{DocumentVersion, VersionSummary};
