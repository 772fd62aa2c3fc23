//! Core generation logic for scaffolding the `PyInventor` bindings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hdrbind::WalkSummary;

/// Path to the `pyinventor.toml` driving this generator.
pub fn config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("pyinventor.toml")
}

/// Generate the PyInventor binding tree.
///
/// 1. Loads `pyinventor.toml`, whose roots are anchored at the repository.
/// 2. Walks `Inventor/actions` under the vcpkg include tree.
/// 3. Scaffolds `_pydef_pybind11/**.cpp` and `_stubs/**.pyi`, then runs the
///    litgen shim on every header.
///
/// `output_dir` overrides the configured `PyInventor` directory.
pub fn generate(output_dir: Option<&Path>) -> Result<WalkSummary> {
    let config = config_path();
    hdrbind::run(&config, output_dir)
        .with_context(|| format!("generating bindings from {}", config.display()))
}
