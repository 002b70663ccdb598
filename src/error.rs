use std::io;
use std::path::PathBuf;

use goaster_syntax::Diag;
use thiserror::Error;

use crate::kind::Kind;

#[derive(Debug, Error)]
pub enum AsterError {
    /// A method of this name is already attached to the type. The first
    /// attachment stays.
    #[error("aster: method {type_name}.{method} already declared")]
    DuplicateMethod { type_name: String, method: String },

    #[error("aster: cannot attach method {method} to receiver {receiver}: {reason}")]
    ReceiverMismatch {
        method: String,
        receiver: String,
        reason: &'static str,
    },

    /// An interface query was given a node that is not an interface.
    #[error("aster: expected an interface, got {kind}")]
    KindMismatch { kind: Kind },

    #[error("aster: package {package} already has a file named {filename}")]
    DuplicateFile { package: String, filename: String },

    #[error("aster: {}: {}", .path.display(), first_diag(.diags))]
    Parse { path: PathBuf, diags: Vec<Diag> },

    #[error("aster: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn first_diag(diags: &[Diag]) -> String {
    match diags {
        [] => String::from("syntax error"),
        [d] => d.to_string(),
        [d, rest @ ..] => format!("{d} (and {} more)", rest.len()),
    }
}

impl AsterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AsterError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = AsterError> = std::result::Result<T, E>;
