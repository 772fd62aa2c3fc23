//! Header path → output artifact paths and `Bind<Symbol>` name.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Where the two artifact kinds land under the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub output_root: PathBuf,
    /// Sub-directory for registration sources.
    pub bindings_dir: String,
    /// Sub-directory for type stubs.
    pub stubs_dir: String,
    pub source_extension: String,
    pub stub_extension: String,
}

impl OutputLayout {
    /// Default layout: `bindings/**.cpp` and `stubs/**.pyi`.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            bindings_dir: "bindings".to_string(),
            stubs_dir: "stubs".to_string(),
            source_extension: "cpp".to_string(),
            stub_extension: "pyi".to_string(),
        }
    }
}

/// Everything derived for one header. Built fresh per header and consumed
/// by the scaffolder and the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTask {
    pub header: PathBuf,
    /// `header` with the include base stripped.
    pub relative: PathBuf,
    /// File stem with its first character upper-cased.
    pub symbol: String,
    pub registration: PathBuf,
    pub stub: PathBuf,
}

impl HeaderTask {
    /// Name of the registration function, e.g. `BindSoAction`.
    pub fn bind_fn(&self) -> String {
        format!("Bind{}", self.symbol)
    }

    /// Relative header path with `/` separators, as used in `#include <...>`.
    pub fn include_path(&self) -> String {
        self.relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Compute the [`HeaderTask`] for `header`, which must lie under
/// `include_base`. Pure path arithmetic, no filesystem access.
pub fn derive(header: &Path, include_base: &Path, layout: &OutputLayout) -> Result<HeaderTask> {
    let relative = header
        .strip_prefix(include_base)
        .map_err(|_| Error::Path {
            header: header.to_path_buf(),
            include_base: include_base.to_path_buf(),
        })?
        .to_path_buf();

    let stem = header
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let registration = layout
        .output_root
        .join(&layout.bindings_dir)
        .join(relative.with_extension(&layout.source_extension));
    let stub = layout
        .output_root
        .join(&layout.stubs_dir)
        .join(relative.with_extension(&layout.stub_extension));

    Ok(HeaderTask {
        header: header.to_path_buf(),
        relative,
        symbol: capitalize(&stem),
        registration,
        stub,
    })
}

/// Upper-case the first character, leave the rest alone.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}
