//! Keyed text substitution over solver dictionary files.
//!
//! Dictionaries are small `key value;` documents. The control loop never
//! parses them as a whole; it locates a fixed set of keys by pattern and
//! replaces only the matched span, so every other byte survives verbatim.
//!
//! Protocol version 1:
//!
//! | file                | key         | accepted value       | written as            |
//! |---------------------|-------------|----------------------|-----------------------|
//! | `system/controlDict`| `startFrom` | word                 | `startFrom\tstartTime;` |
//! | `system/controlDict`| `startTime` | unsigned decimal     | `startTime\t<int>;`   |
//! | `system/controlDict`| `endTime`   | unsigned decimal     | `endTime\t<int>;`     |
//! | `system/fvSolution` | `U`         | unsigned decimal     | `U<ws><x.xxx>`        |
//! | `system/fvSolution` | `p`         | unsigned decimal     | `p<ws><x.xxx>`        |
//!
//! Keys are whole words followed by whitespace. Every occurrence is rewritten.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{CaseError, CaseResult};

pub const DICT_PROTOCOL_VERSION: u32 = 1;

/// Result of rewriting one dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictRewrite {
    pub content: String,
    /// Keys that did not occur; the file is left unchanged for those.
    pub missing: Vec<&'static str>,
}

impl DictRewrite {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Apply one keyed substitution, recording the key when it does not occur.
pub(crate) fn substitute(
    content: String,
    key: &'static str,
    pattern: &Regex,
    replacement: &str,
    missing: &mut Vec<&'static str>,
) -> String {
    if pattern.is_match(&content) {
        pattern.replace_all(&content, replacement).into_owned()
    } else {
        missing.push(key);
        content
    }
}

/// Read the whole file, rewrite it, write the whole file back.
pub(crate) fn rewrite_file(
    path: &Path,
    rewrite: impl FnOnce(&str) -> DictRewrite,
) -> CaseResult<DictRewrite> {
    let content = fs::read_to_string(path).map_err(CaseError::io(path))?;
    let result = rewrite(&content);
    fs::write(path, &result.content).map_err(CaseError::io(path))?;

    for key in result.missing.iter().copied() {
        tracing::warn!(path = %path.display(), key, "dictionary key not found, left unchanged");
    }
    tracing::debug!(path = %path.display(), "dictionary rewritten");
    Ok(result)
}
