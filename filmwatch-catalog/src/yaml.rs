//! YAML loading for user-maintained brand tables.
//!
//! A lexicon file is a YAML sequence of brand names in priority order:
//! ```yaml
//! - Jaeger-LeCoultre
//! - Rolex
//! - Omega
//! ```
//! A directory of such files is also accepted; the files are read in
//! file-name order and their lists concatenated.

use crate::lexicon::BrandLexicon;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YamlError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
    #[error("Lexicon not found: {0}")]
    NotFound(String),
}

/// Load a brand lexicon from a YAML file or a directory of YAML files.
pub fn load_lexicon(path: &Path) -> Result<BrandLexicon, YamlError> {
    if !path.exists() {
        return Err(YamlError::NotFound(path.display().to_string()));
    }

    if !path.is_dir() {
        return Ok(BrandLexicon::new(load_name_list(path)?));
    }

    let mut entries: Vec<_> = std::fs::read_dir(path)
        .map_err(|e| YamlError::Io {
            path: path.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
        })
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut names = Vec::new();
    for entry in entries {
        names.extend(load_name_list(&entry.path())?);
    }
    Ok(BrandLexicon::new(names))
}

/// Write a lexicon as a YAML sequence, creating parent directories as needed.
pub fn save_lexicon(path: &Path, lexicon: &BrandLexicon) -> Result<(), YamlError> {
    let io_err = |e: std::io::Error| YamlError::Io {
        path: path.display().to_string(),
        source: e,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let contents = serde_yml::to_string(lexicon.brands()).map_err(|e| YamlError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;
    std::fs::write(path, contents).map_err(io_err)
}

fn load_name_list(path: &Path) -> Result<Vec<String>, YamlError> {
    let contents = std::fs::read_to_string(path).map_err(|e| YamlError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yml::from_str(&contents).map_err(|e| YamlError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}
