//! hdrbind — C++ header tree → pybind11 registration sources and Python stubs.
//!
//! Walks a directory of headers and, for each one, writes a `Bind<Name>`
//! registration source and a `.pyi` stub containing marker regions, then
//! hands the header to a generation engine that fills those regions in.
//!
//! # Quick start
//!
//! Scaffold and generate from a config (suitable for a driver binary):
//!
//! ```no_run
//! use std::path::Path;
//!
//! // Reads config TOML, walks the include dir, writes both artifact trees.
//! hdrbind::run(Path::new("hdrbind.toml"), None).unwrap();
//! ```
//!
//! Or drive the pieces directly:
//!
//! ```no_run
//! use std::path::Path;
//! use hdrbind::{OutputLayout, ScaffoldOnly, WalkSettings, build_options, walk};
//!
//! let options = build_options();
//! let layout = OutputLayout::new("PyInventor");
//! walk(
//!     Path::new("/inc/Inventor/actions"),
//!     Path::new("/inc"),
//!     &layout,
//!     &WalkSettings::default(),
//!     &options,
//!     &mut ScaffoldOnly,
//! )
//! .unwrap();
//! ```

use std::path::Path;

use tracing::info;

pub mod config;
pub mod engine;
pub mod error;
pub mod options;
pub mod paths;
pub mod scaffold;
pub mod walk;

pub use engine::{CommandEngine, GenerationEngine, ScaffoldOnly};
pub use error::{EngineError, Error, Result};
pub use options::{GenerationOptions, GenerationOptionsBuilder, build_options};
pub use paths::{HeaderTask, OutputLayout, derive};
pub use scaffold::{ArtifactKind, ArtifactWriteMode, scaffold};
pub use walk::{HeaderTasks, SymbolCollision, WalkSettings, WalkSummary, walk};

/// Run the full pipeline: load config, build options, walk the include
/// directory with the configured engine.
///
/// `config_path` is the path to a `hdrbind.toml` configuration file.
/// `output` optionally overrides the output directory from the config.
pub fn run(config_path: &Path, output: Option<&Path>) -> Result<WalkSummary> {
    let cfg = config::load_config(config_path)?;
    let base_dir = config::base_dir(config_path);
    let mut engine = cfg.engine(base_dir);
    generate_from_config(&cfg, base_dir, output, engine.as_mut())
}

/// Like [`run`], but ignores any configured engine and only writes the
/// marker scaffolding.
pub fn run_scaffold_only(config_path: &Path, output: Option<&Path>) -> Result<WalkSummary> {
    let cfg = config::load_config(config_path)?;
    generate_from_config(&cfg, config::base_dir(config_path), output, &mut ScaffoldOnly)
}

/// Walk with an already-loaded [`config::Config`] and a caller-chosen engine.
///
/// `base_dir` is the directory relative to which paths in the config are
/// resolved (typically the parent directory of the TOML file).
pub fn generate_from_config(
    cfg: &config::Config,
    base_dir: &Path,
    output: Option<&Path>,
    engine: &mut dyn GenerationEngine,
) -> Result<WalkSummary> {
    let options = cfg.options.to_options()?;
    let include_base = cfg.include_base(base_dir);
    let include_dir = cfg.include_dir(base_dir);
    let layout = cfg.layout(base_dir, output);

    info!(
        include_dir = %include_dir.display(),
        output = %layout.output_root.display(),
        "walking headers"
    );

    let summary = walk(
        &include_dir,
        &include_base,
        &layout,
        &cfg.walk_settings(),
        &options,
        engine,
    )?;

    info!(
        headers = summary.headers,
        collisions = summary.collisions,
        "generation complete"
    );
    Ok(summary)
}
