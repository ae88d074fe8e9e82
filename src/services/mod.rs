//! Analysis pipeline services.

pub mod analyzer;
pub mod documents;
pub mod fingerprint;
pub mod linter;
pub mod output;
pub mod paramcheck;
pub mod params;
pub mod process;
pub mod publisher;
pub mod resolver;
pub mod severity;
pub mod suppression;
pub mod watch;
