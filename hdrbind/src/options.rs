//! Generation policy handed to the engine for every header.
//!
//! [`build_options`] encodes the project defaults. A
//! [`GenerationOptionsBuilder`] starts from the same values and lets the
//! config file override individual knobs; its [`build`](GenerationOptionsBuilder::build)
//! compiles every pattern up front so a bad regex fails the run before any
//! file is touched.

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// A regex option, kept together with its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    anchored: Regex,
}

impl Pattern {
    fn new(option: &'static str, source: &str) -> Result<Self> {
        let compile = |re: &str| {
            Regex::new(re).map_err(|source| Error::InvalidPattern { option, source })
        };
        Ok(Self {
            regex: compile(source)?,
            anchored: compile(&format!("^(?:{source})$"))?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Search semantics: the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern matches all of `text`.
    pub fn matches_fully(&self, text: &str) -> bool {
        self.anchored.is_match(text)
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One `pattern -> replacement` rule applied to declared C++ types.
#[derive(Debug, Clone, Serialize)]
pub struct TypeReplacement {
    #[serde(serialize_with = "serialize_regex")]
    pattern: Regex,
    replacement: String,
}

impl TypeReplacement {
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

fn serialize_regex<S: Serializer>(re: &Regex, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(re.as_str())
}

/// Ordered type substitutions. Rules run front to back, each one seeing the
/// output of the previous.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TypeReplacements(Vec<TypeReplacement>);

impl TypeReplacements {
    pub fn rules(&self) -> &[TypeReplacement] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rewrite a C++ type spelling through every rule in order.
    pub fn apply(&self, ty: &str) -> String {
        self.0.iter().fold(ty.to_string(), |acc, rule| {
            rule.pattern
                .replace_all(&acc, rule.replacement.as_str())
                .into_owned()
        })
    }
}

/// Immutable generation policy shared by reference across a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOptions {
    namespaces_root: Vec<String>,
    type_replacements: TypeReplacements,
    fn_exclude_by_name: Pattern,
    fn_params_exclude_names: Pattern,
    fn_params_boxed: Pattern,
    fn_return_force_policy_reference: Option<Pattern>,
    original_location_show: bool,
    original_location_parent_folders: usize,
    original_signature_show: bool,
    convert_to_snake_case: bool,
    run_formatter: bool,
}

impl GenerationOptions {
    /// Namespaces emitted without a nested submodule.
    pub fn namespaces_root(&self) -> &[String] {
        &self.namespaces_root
    }

    pub fn type_replacements(&self) -> &TypeReplacements {
        &self.type_replacements
    }

    pub fn fn_exclude_by_name(&self) -> &Pattern {
        &self.fn_exclude_by_name
    }

    /// Only consulted by the engine for parameters that carry a default value.
    pub fn fn_params_exclude_names(&self) -> &Pattern {
        &self.fn_params_exclude_names
    }

    pub fn fn_params_boxed(&self) -> &Pattern {
        &self.fn_params_boxed
    }

    pub fn fn_return_force_policy_reference(&self) -> Option<&Pattern> {
        self.fn_return_force_policy_reference.as_ref()
    }

    pub fn original_location_show(&self) -> bool {
        self.original_location_show
    }

    pub fn original_location_parent_folders(&self) -> usize {
        self.original_location_parent_folders
    }

    pub fn original_signature_show(&self) -> bool {
        self.original_signature_show
    }

    pub fn convert_to_snake_case(&self) -> bool {
        self.convert_to_snake_case
    }

    pub fn run_formatter(&self) -> bool {
        self.run_formatter
    }

    /// Whether a function with this name is dropped from the bindings.
    pub fn excludes_function(&self, name: &str) -> bool {
        self.fn_exclude_by_name.matches_fully(name)
    }

    /// Whether a parameter is hidden from the emitted signature. Parameters
    /// without a default value are always kept.
    pub fn excludes_param(&self, name: &str, has_default: bool) -> bool {
        has_default && self.fn_params_exclude_names.is_match(name)
    }

    /// Serialized form passed to out-of-process engines.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Project defaults for the Inventor bindings.
///
/// `unsigned char` maps to a plain Python `int`, a handful of accessors
/// that leak raw handles are dropped, `priv_` parameters with defaults are
/// hidden, and every modifiable primitive parameter is boxed.
pub fn build_options() -> GenerationOptions {
    GenerationOptionsBuilder::default()
        .build()
        .expect("built-in option patterns are valid regexes")
}

/// Overrides on top of [`build_options`] values.
#[derive(Debug, Clone)]
pub struct GenerationOptionsBuilder {
    namespaces_root: Vec<String>,
    type_replacements: Vec<(String, String)>,
    fn_exclude_by_name: String,
    fn_params_exclude_names: String,
    fn_params_boxed: String,
    fn_return_force_policy_reference: Option<String>,
    original_location_show: bool,
    original_location_parent_folders: usize,
    original_signature_show: bool,
    convert_to_snake_case: bool,
    run_formatter: bool,
}

impl Default for GenerationOptionsBuilder {
    fn default() -> Self {
        Self {
            namespaces_root: vec!["PyInventor".to_string()],
            type_replacements: vec![(r"\bunsigned \s*char\b".to_string(), "int".to_string())],
            fn_exclude_by_name: "^getDC$|^getPathCode$|^usePathCode$|^getAbortCallback$"
                .to_string(),
            fn_params_exclude_names: "^priv_".to_string(),
            fn_params_boxed: ".*".to_string(),
            fn_return_force_policy_reference: None,
            original_location_show: false,
            original_location_parent_folders: 2,
            original_signature_show: true,
            convert_to_snake_case: false,
            run_formatter: true,
        }
    }
}

impl GenerationOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespaces_root(mut self, namespaces: Vec<String>) -> Self {
        self.namespaces_root = namespaces;
        self
    }

    /// Drop every type replacement, including the defaults.
    pub fn clear_type_replacements(mut self) -> Self {
        self.type_replacements.clear();
        self
    }

    /// Insert a rule that runs before all existing ones.
    pub fn add_first_replacement(
        mut self,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.type_replacements
            .insert(0, (pattern.into(), replacement.into()));
        self
    }

    /// Append a rule that runs after all existing ones.
    pub fn add_last_replacement(
        mut self,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.type_replacements
            .push((pattern.into(), replacement.into()));
        self
    }

    pub fn fn_exclude_by_name(mut self, pattern: impl Into<String>) -> Self {
        self.fn_exclude_by_name = pattern.into();
        self
    }

    pub fn fn_params_exclude_names(mut self, pattern: impl Into<String>) -> Self {
        self.fn_params_exclude_names = pattern.into();
        self
    }

    pub fn fn_params_boxed(mut self, pattern: impl Into<String>) -> Self {
        self.fn_params_boxed = pattern.into();
        self
    }

    pub fn fn_return_force_policy_reference(mut self, pattern: Option<String>) -> Self {
        self.fn_return_force_policy_reference = pattern;
        self
    }

    pub fn original_location_show(mut self, show: bool) -> Self {
        self.original_location_show = show;
        self
    }

    pub fn original_location_parent_folders(mut self, count: usize) -> Self {
        self.original_location_parent_folders = count;
        self
    }

    pub fn original_signature_show(mut self, show: bool) -> Self {
        self.original_signature_show = show;
        self
    }

    pub fn convert_to_snake_case(mut self, convert: bool) -> Self {
        self.convert_to_snake_case = convert;
        self
    }

    pub fn run_formatter(mut self, run: bool) -> Self {
        self.run_formatter = run;
        self
    }

    /// Compile every pattern and freeze the result.
    pub fn build(self) -> Result<GenerationOptions> {
        let type_replacements = self
            .type_replacements
            .into_iter()
            .map(|(pattern, replacement)| {
                let pattern = Regex::new(&pattern).map_err(|source| Error::InvalidPattern {
                    option: "type_replacements",
                    source,
                })?;
                Ok(TypeReplacement {
                    pattern,
                    replacement,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let fn_return_force_policy_reference = self
            .fn_return_force_policy_reference
            .as_deref()
            .map(|p| Pattern::new("fn_return_force_policy_reference", p))
            .transpose()?;

        Ok(GenerationOptions {
            namespaces_root: self.namespaces_root,
            type_replacements: TypeReplacements(type_replacements),
            fn_exclude_by_name: Pattern::new("fn_exclude_by_name", &self.fn_exclude_by_name)?,
            fn_params_exclude_names: Pattern::new(
                "fn_params_exclude_names",
                &self.fn_params_exclude_names,
            )?,
            fn_params_boxed: Pattern::new("fn_params_boxed", &self.fn_params_boxed)?,
            fn_return_force_policy_reference,
            original_location_show: self.original_location_show,
            original_location_parent_folders: self.original_location_parent_folders,
            original_signature_show: self.original_signature_show,
            convert_to_snake_case: self.convert_to_snake_case,
            run_formatter: self.run_formatter,
        })
    }
}
