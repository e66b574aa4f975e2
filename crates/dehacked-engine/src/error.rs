use std::path::PathBuf;

use dehacked_data::SupportParseError;

/// Why the DEHSUPP lookup descriptor could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum SupportError {
    #[error("no DEHSUPP resource available")]
    Missing,
    #[error("DEHSUPP outside the base resources is not supported")]
    NotBase,
    #[error(transparent)]
    Parse(#[from] SupportParseError),
    #[error("{what} '{name}' does not resolve")]
    Unresolved { what: &'static str, name: String },
    #[error("invalid state range {span} for {class}.{label}")]
    BadStateRange {
        class: String,
        label: String,
        span: u32,
    },
}

/// Conditions that abort a patch load. Edits applied before the failure
/// stay in place.
#[derive(Debug, thiserror::Error)]
pub enum DehError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{name} is an old and unsupported DeHackEd patch")]
    OldPatch { name: String },
    #[error("{name} is not a DeHackEd patch file")]
    NotAPatch { name: String },
    #[error("DeHackEd support tables unavailable: {0}")]
    Support(#[from] SupportError),
}
