//! Recursive header discovery and the per-header pipeline.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::engine::GenerationEngine;
use crate::error::{Error, Result};
use crate::options::GenerationOptions;
use crate::paths::{HeaderTask, OutputLayout, derive};
use crate::scaffold::scaffold;

/// What to do when two headers derive the same symbol name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolCollision {
    /// Abort the walk.
    #[default]
    Error,
    /// Log and keep going.
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkSettings {
    /// File extensions (without the dot) treated as headers.
    pub header_extensions: Vec<String>,
    pub symbol_collision: SymbolCollision,
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            header_extensions: vec!["h".to_string()],
            symbol_collision: SymbolCollision::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Headers scaffolded and handed to the engine.
    pub headers: usize,
    /// Collisions tolerated under [`SymbolCollision::Warn`].
    pub collisions: usize,
}

/// Lazy sequence of [`HeaderTask`]s below a directory.
///
/// Yields in directory-listing order, which is not guaranteed to be sorted.
/// It can be consumed once; walk again to start over.
pub struct HeaderTasks<'a> {
    entries: walkdir::IntoIter,
    root: PathBuf,
    include_base: &'a Path,
    layout: &'a OutputLayout,
    extensions: &'a [String],
}

impl<'a> HeaderTasks<'a> {
    pub fn new(
        directory: &Path,
        include_base: &'a Path,
        layout: &'a OutputLayout,
        extensions: &'a [String],
    ) -> Self {
        Self {
            entries: WalkDir::new(directory).follow_links(true).into_iter(),
            root: directory.to_path_buf(),
            include_base,
            layout,
            extensions,
        }
    }

    fn is_header(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|h| h == ext))
    }
}

impl Iterator for HeaderTasks<'_> {
    type Item = Result<HeaderTask>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                    return Some(Err(Error::io(path, source)));
                }
            };
            if !entry.file_type().is_file() || !self.is_header(entry.path()) {
                continue;
            }
            return Some(derive(entry.path(), self.include_base, self.layout));
        }
    }
}

/// Scaffold every header below `directory` and run `engine` on each.
///
/// Stops at the first error: headers not yet reached are neither scaffolded
/// nor generated.
pub fn walk(
    directory: &Path,
    include_base: &Path,
    layout: &OutputLayout,
    settings: &WalkSettings,
    options: &GenerationOptions,
    engine: &mut dyn GenerationEngine,
) -> Result<WalkSummary> {
    let mut summary = WalkSummary::default();
    let mut symbols: HashMap<String, PathBuf> = HashMap::new();

    for task in HeaderTasks::new(directory, include_base, layout, &settings.header_extensions) {
        let task = task?;

        match symbols.entry(task.symbol.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(task.header.clone());
            }
            Entry::Occupied(first) => match settings.symbol_collision {
                SymbolCollision::Error => {
                    return Err(Error::SymbolCollision {
                        symbol: task.symbol,
                        first: first.get().clone(),
                        second: task.header,
                    });
                }
                SymbolCollision::Warn => {
                    warn!(
                        symbol = %task.symbol,
                        first = %first.get().display(),
                        second = %task.header.display(),
                        "duplicate binding symbol"
                    );
                    summary.collisions += 1;
                }
            },
        }

        scaffold(&task)?;
        engine.generate(
            options,
            std::slice::from_ref(&task.header),
            &task.registration,
            &task.stub,
        )?;

        info!(header = %task.relative.display(), symbol = %task.bind_fn(), "generated bindings");
        summary.headers += 1;
    }

    Ok(summary)
}
