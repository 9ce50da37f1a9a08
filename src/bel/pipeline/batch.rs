//! Batch validation
//!
//!     Documents share nothing, so a batch is a parallel map over input
//!     files with rayon: one worker per document, each running the whole
//!     pipeline on its own. Results come back in input order.
//!
//!     Directories are walked for `*.bel` files. A valid document can be
//!     exported next to its input as `<file>.json`.

use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{parse_bytes, ParseOptions};
use crate::bel::ast::ParseResult;
use crate::bel::formats::json::{export, ExportError, ExportOptions};

const EXTENSION: &str = "bel";

#[derive(Debug)]
pub enum BatchError {
    Io { path: PathBuf, source: std::io::Error },
    Walk(walkdir::Error),
    Export { path: PathBuf, source: ExportError },
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            BatchError::Walk(e) => write!(f, "Failed to walk directory: {}", e),
            BatchError::Export { path, source } => write!(f, "{}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Io { source, .. } => Some(source),
            BatchError::Walk(e) => Some(e),
            BatchError::Export { source, .. } => Some(source),
        }
    }
}

impl From<walkdir::Error> for BatchError {
    fn from(err: walkdir::Error) -> Self {
        BatchError::Walk(err)
    }
}

/// The result of validating one file
#[derive(Debug)]
pub struct DocumentOutcome {
    pub path: PathBuf,
    pub result: ParseResult,
}

impl DocumentOutcome {
    /// `<file>.json`, next to the input
    pub fn export_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".json");
        PathBuf::from(name)
    }

    /// Write the JSON export next to the input, returning where it went
    pub fn export(&self, options: &ExportOptions) -> Result<PathBuf, BatchError> {
        let json = export(&self.result, options).map_err(|source| BatchError::Export {
            path: self.path.clone(),
            source,
        })?;
        let target = self.export_path();
        fs::write(&target, json).map_err(|source| BatchError::Io {
            path: target.clone(),
            source,
        })?;
        tracing::debug!(path = %target.display(), "exported");
        Ok(target)
    }
}

fn is_script(path: &Path) -> bool {
    path.extension().map(|ext| ext == EXTENSION).unwrap_or(false)
}

/// Expand `paths` into script files. Files are kept as given whatever their
/// extension; directories contribute their `*.bel` files, sorted.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, BatchError> {
    let mut inputs = Vec::new();
    for path in paths {
        if !path.is_dir() {
            inputs.push(path.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry?;
            if entry.file_type().is_file() && is_script(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        inputs.extend(found);
    }
    Ok(inputs)
}

/// Validate one file
pub fn validate_file(path: &Path, options: &ParseOptions) -> Result<DocumentOutcome, BatchError> {
    let bytes = fs::read(path).map_err(|source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let result = parse_bytes(&bytes, options);
    tracing::debug!(
        path = %path.display(),
        errors = result.error_count(),
        warnings = result.warning_count(),
        "validated"
    );
    Ok(DocumentOutcome {
        path: path.to_path_buf(),
        result,
    })
}

/// Validate every file in parallel, in input order
pub fn validate_paths(
    paths: &[PathBuf],
    options: &ParseOptions,
) -> Vec<Result<DocumentOutcome, BatchError>> {
    paths
        .par_iter()
        .map(|path| validate_file(path, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bel-batch-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("nested")).unwrap();
        dir
    }

    const VALID: &str = "DEFINE NAMESPACE HGNC AS URL \"x\"\np(HGNC:A) -> p(HGNC:B)\n";

    #[test]
    fn test_collect_inputs_walks_directories() {
        let dir = scratch("collect");
        fs::write(dir.join("b.bel"), VALID).unwrap();
        fs::write(dir.join("nested").join("a.bel"), VALID).unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let inputs = collect_inputs(&[dir.clone()]).unwrap();
        assert_eq!(inputs, vec![dir.join("b.bel"), dir.join("nested").join("a.bel")]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_documents_validate_independently() {
        let dir = scratch("independent");
        let good = dir.join("good.bel");
        let bad = dir.join("bad.bel");
        fs::write(&good, VALID).unwrap();
        fs::write(&bad, "p(HGNC:A) -> p(HGNC:B)\n").unwrap();
        let missing = dir.join("missing.bel");

        let outcomes = validate_paths(
            &[good.clone(), bad, missing],
            &ParseOptions::default(),
        );
        assert_eq!(outcomes.len(), 3);
        let good_outcome = outcomes[0].as_ref().unwrap();
        assert!(good_outcome.result.is_valid());
        assert!(!outcomes[1].as_ref().unwrap().result.is_valid());
        assert!(matches!(outcomes[2], Err(BatchError::Io { .. })));

        let written = good_outcome.export(&ExportOptions::default()).unwrap();
        assert_eq!(written, dir.join("good.bel.json"));
        assert!(fs::read_to_string(&written).unwrap().contains("\"statements\""));
        fs::remove_dir_all(&dir).unwrap();
    }
}
