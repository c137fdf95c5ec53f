//! Expansion of command-line input arguments into PDF paths

use std::path::PathBuf;
use glob::glob;
use tracing::warn;
use crate::error::{Error, Result};

fn is_pattern(arg: &str) -> bool {
    arg.contains('*') || arg.contains('?') || arg.contains('[')
}

/// Expand glob patterns in input arguments
///
/// Literal paths pass through untouched. Each pattern expands in the glob
/// crate's sorted order, and the argument order is kept across patterns
/// since it is the merge order.
pub fn expand_inputs<I, S>(args: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut paths = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        if !is_pattern(arg) {
            paths.push(PathBuf::from(arg));
            continue;
        }

        let entries = glob(arg).map_err(|e| Error::InvalidGlob(format!("{}: {}", arg, e)))?;
        let before = paths.len();
        for entry in entries {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => warn!(pattern = arg, error = %e, "glob error"),
            }
        }
        if paths.len() == before {
            return Err(Error::NoFilesMatched(arg.to_string()));
        }
    }

    Ok(paths)
}
