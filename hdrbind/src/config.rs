//! Configuration types for `hdrbind.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::{CommandEngine, GenerationEngine, ScaffoldOnly};
use crate::error::{Error, Result};
use crate::options::{GenerationOptions, GenerationOptionsBuilder};
use crate::paths::OutputLayout;
use crate::walk::{SymbolCollision, WalkSettings};

/// Root configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub walk: WalkConfig,
    #[serde(default)]
    pub engine: Option<EngineConfig>,
    #[serde(default)]
    pub options: OptionsConfig,
}

/// The three roots of a run. Relative paths resolve against the directory
/// holding the config file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Base that `#include <...>` paths are relative to.
    pub include_base: PathBuf,
    /// Directory to walk, relative to `include_base`.
    pub include_dir: PathBuf,
    /// Root for the `bindings/` and `stubs/` trees.
    pub output_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub bindings_dir: String,
    pub stubs_dir: String,
    pub source_extension: String,
    pub stub_extension: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let layout = OutputLayout::new(PathBuf::new());
        Self {
            bindings_dir: layout.bindings_dir,
            stubs_dir: layout.stubs_dir,
            source_extension: layout.source_extension,
            stub_extension: layout.stub_extension,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkConfig {
    pub header_extensions: Vec<String>,
    pub symbol_collision: SymbolCollision,
}

impl Default for WalkConfig {
    fn default() -> Self {
        let settings = WalkSettings::default();
        Self {
            header_extensions: settings.header_extensions,
            symbol_collision: settings.symbol_collision,
        }
    }
}

/// External program that fills in the marker regions.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

/// A `pattern -> replacement` rule in TOML form.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeReplacementConfig {
    pub pattern: String,
    pub replacement: String,
}

/// Per-knob overrides of the built-in generation options. Absent keys keep
/// their defaults; `type_replacements`, when present, replaces the default
/// list entirely.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsConfig {
    pub namespaces_root: Option<Vec<String>>,
    pub type_replacements: Option<Vec<TypeReplacementConfig>>,
    pub fn_exclude_by_name: Option<String>,
    pub fn_params_exclude_names: Option<String>,
    pub fn_params_boxed: Option<String>,
    pub fn_return_force_policy_reference: Option<String>,
    pub original_location_show: Option<bool>,
    pub original_location_parent_folders: Option<usize>,
    pub original_signature_show: Option<bool>,
    pub convert_to_snake_case: Option<bool>,
    pub run_formatter: Option<bool>,
}

impl OptionsConfig {
    /// Apply the overrides on top of the defaults and compile the result.
    pub fn to_options(&self) -> Result<GenerationOptions> {
        let mut b = GenerationOptionsBuilder::new();
        if let Some(ns) = &self.namespaces_root {
            b = b.namespaces_root(ns.clone());
        }
        if let Some(rules) = &self.type_replacements {
            b = b.clear_type_replacements();
            for rule in rules {
                b = b.add_last_replacement(&rule.pattern, &rule.replacement);
            }
        }
        if let Some(p) = &self.fn_exclude_by_name {
            b = b.fn_exclude_by_name(p);
        }
        if let Some(p) = &self.fn_params_exclude_names {
            b = b.fn_params_exclude_names(p);
        }
        if let Some(p) = &self.fn_params_boxed {
            b = b.fn_params_boxed(p);
        }
        if self.fn_return_force_policy_reference.is_some() {
            b = b.fn_return_force_policy_reference(self.fn_return_force_policy_reference.clone());
        }
        if let Some(v) = self.original_location_show {
            b = b.original_location_show(v);
        }
        if let Some(v) = self.original_location_parent_folders {
            b = b.original_location_parent_folders(v);
        }
        if let Some(v) = self.original_signature_show {
            b = b.original_signature_show(v);
        }
        if let Some(v) = self.convert_to_snake_case {
            b = b.convert_to_snake_case(v);
        }
        if let Some(v) = self.run_formatter {
            b = b.run_formatter(v);
        }
        b.build()
    }
}

impl Config {
    /// Absolute include base.
    pub fn include_base(&self, base_dir: &Path) -> PathBuf {
        resolve(base_dir, &self.paths.include_base)
    }

    /// Absolute directory to walk.
    pub fn include_dir(&self, base_dir: &Path) -> PathBuf {
        self.include_base(base_dir).join(&self.paths.include_dir)
    }

    /// Output layout rooted at `output` if given, else at the configured
    /// output directory.
    pub fn layout(&self, base_dir: &Path, output: Option<&Path>) -> OutputLayout {
        let output_root = match output {
            Some(p) => p.to_path_buf(),
            None => resolve(base_dir, &self.paths.output_dir),
        };
        OutputLayout {
            output_root,
            bindings_dir: self.layout.bindings_dir.clone(),
            stubs_dir: self.layout.stubs_dir.clone(),
            source_extension: self.layout.source_extension.clone(),
            stub_extension: self.layout.stub_extension.clone(),
        }
    }

    pub fn walk_settings(&self) -> WalkSettings {
        WalkSettings {
            header_extensions: self.walk.header_extensions.clone(),
            symbol_collision: self.walk.symbol_collision,
        }
    }

    /// The configured engine, or [`ScaffoldOnly`] when none is set.
    /// Commands run from `base_dir` so relative script paths work.
    pub fn engine(&self, base_dir: &Path) -> Box<dyn GenerationEngine> {
        match &self.engine {
            Some(e) => Box::new(
                CommandEngine::new(&e.program)
                    .args(e.args.iter().cloned())
                    .current_dir(base_dir),
            ),
            None => Box::new(ScaffoldOnly),
        }
    }
}

fn resolve(base_dir: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Directory that relative paths in the config at `config_path` resolve
/// against. A bare file name resolves against the working directory.
pub fn base_dir(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Load and parse a `hdrbind.toml` configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_config(&content, path)
}

/// Parse config text; `path` is only used in error messages.
pub fn parse_config(content: &str, path: &Path) -> Result<Config> {
    toml::from_str(content).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[paths]
include_base = "build/include"
include_dir = "Inventor/actions"
output_dir = "PyInventor"
"#;

    fn parse(s: &str) -> Config {
        parse_config(s, Path::new("hdrbind.toml")).unwrap()
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse(MINIMAL);
        let base = Path::new("/repo");
        assert_eq!(cfg.include_base(base), Path::new("/repo/build/include"));
        assert_eq!(
            cfg.include_dir(base),
            Path::new("/repo/build/include/Inventor/actions")
        );
        assert_eq!(cfg.layout(base, None), OutputLayout::new("/repo/PyInventor"));
        assert_eq!(cfg.walk_settings(), WalkSettings::default());
        assert!(cfg.engine.is_none());

        let opts = cfg.options.to_options().unwrap();
        assert_eq!(opts.namespaces_root(), ["PyInventor"]);
    }

    #[test]
    fn output_override_wins() {
        let cfg = parse(MINIMAL);
        let layout = cfg.layout(Path::new("/repo"), Some(Path::new("/tmp/out")));
        assert_eq!(layout.output_root, Path::new("/tmp/out"));
    }

    #[test]
    fn absolute_paths_are_kept() {
        let cfg = parse(
            r#"
[paths]
include_base = "/usr/include"
include_dir = "Inventor"
output_dir = "/srv/out"
"#,
        );
        assert_eq!(cfg.include_dir(Path::new("/repo")), Path::new("/usr/include/Inventor"));
        assert_eq!(cfg.layout(Path::new("/repo"), None).output_root, Path::new("/srv/out"));
    }

    #[test]
    fn full_config() {
        let cfg = parse(
            r#"
[paths]
include_base = "inc"
include_dir = "."
output_dir = "out"

[layout]
bindings_dir = "_pydef_pybind11"
stubs_dir = "_stubs"

[walk]
header_extensions = ["h", "hpp"]
symbol_collision = "warn"

[engine]
program = "python"
args = ["tools/litgen_shim.py"]

[options]
namespaces_root = ["Demo"]
type_replacements = [
    { pattern = 'std::string', replacement = "str" },
    { pattern = 'float', replacement = "double" },
]
fn_exclude_by_name = "^priv"
fn_return_force_policy_reference = "Singleton$"
convert_to_snake_case = true
run_formatter = false
"#,
        );

        let layout = cfg.layout(Path::new("/r"), None);
        assert_eq!(layout.bindings_dir, "_pydef_pybind11");
        assert_eq!(layout.stubs_dir, "_stubs");
        assert_eq!(layout.source_extension, "cpp");

        let walk = cfg.walk_settings();
        assert_eq!(walk.header_extensions, ["h", "hpp"]);
        assert_eq!(walk.symbol_collision, SymbolCollision::Warn);

        let engine = cfg.engine.as_ref().unwrap();
        assert_eq!(engine.program, Path::new("python"));
        assert_eq!(engine.args, ["tools/litgen_shim.py"]);

        let opts = cfg.options.to_options().unwrap();
        assert_eq!(opts.namespaces_root(), ["Demo"]);
        assert_eq!(opts.type_replacements().rules().len(), 2);
        assert_eq!(opts.type_replacements().apply("unsigned char"), "unsigned char");
        assert_eq!(opts.type_replacements().apply("std::string"), "str");
        assert!(opts.excludes_function("priv"));
        assert_eq!(
            opts.fn_return_force_policy_reference().map(|p| p.as_str()),
            Some("Singleton$")
        );
        assert!(opts.convert_to_snake_case());
        assert!(!opts.run_formatter());
        // untouched knobs keep their defaults
        assert!(opts.original_signature_show());
    }

    #[test]
    fn base_dir_of_bare_file_name_is_cwd() {
        assert_eq!(base_dir(Path::new("hdrbind.toml")), Path::new("."));
        assert_eq!(base_dir(Path::new("cfg/hdrbind.toml")), Path::new("cfg"));
        assert_eq!(base_dir(Path::new("/repo/hdrbind.toml")), Path::new("/repo"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_config(
            &format!("{MINIMAL}\n[options]\nbogus = true\n"),
            Path::new("hdrbind.toml"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn bad_regex_in_options_fails_to_build() {
        let cfg = parse(&format!("{MINIMAL}\n[options]\nfn_params_boxed = \"[\"\n"));
        assert!(matches!(
            cfg.options.to_options(),
            Err(Error::InvalidPattern { option: "fn_params_boxed", .. })
        ));
    }
}
