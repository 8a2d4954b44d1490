use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Root configuration structure for a codemod JSON file.
///
/// Every field falls back to the built-in value, so a config file only needs
/// to name what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodemodConfig {
    #[serde(default = "default_shared_module")]
    pub shared_module: SharedModule,

    /// Function names and exported symbols qualified as `<module>.<ident>`.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Task constants, qualified the same way as `symbols`.
    #[serde(default = "default_task_constants")]
    pub task_constants: Vec<String>,

    /// Explicit `identifier -> new name` pairs. A bare new name is qualified
    /// with the shared module like `symbols`.
    #[serde(default = "default_renames")]
    pub renames: BTreeMap<String, String>,

    #[serde(default = "default_roots")]
    pub roots: Vec<String>,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Globs matched against root-relative paths.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub missing_import_site: MissingImportSite,
}

impl Default for CodemodConfig {
    fn default() -> Self {
        Self {
            shared_module: default_shared_module(),
            symbols: default_symbols(),
            task_constants: default_task_constants(),
            renames: default_renames(),
            roots: default_roots(),
            extensions: default_extensions(),
            exclude: Vec::new(),
            missing_import_site: MissingImportSite::default(),
        }
    }
}

/// The module that symbols are being relocated into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SharedModule {
    /// Name used in the package clause and as the qualifier.
    pub name: String,
    /// Import path written into import declarations.
    pub import_path: String,
}

/// What to do when a file needs the shared import but declares no imports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingImportSite {
    /// Rewrite symbols only and report a warning.
    #[default]
    Skip,
    /// Add a single-line import after the package clause.
    Synthesize,
}

// =============================================================================
// Built-in values (the forum -> forumcommon relocation)
// =============================================================================

fn default_shared_module() -> SharedModule {
    SharedModule {
        name: "forumcommon".to_string(),
        import_path: "github.com/arran4/goa4web/handlers/forumcommon".to_string(),
    }
}

fn default_symbols() -> Vec<String> {
    vec!["RequireThreadAndTopic".to_string()]
}

fn default_task_constants() -> Vec<String> {
    [
        "TaskReply",
        "TaskEditReply",
        "TaskCancel",
        "TaskCreateThread",
        "TaskMarkThreadRead",
        "TaskMarkTopicRead",
        "TaskSetLabels",
        "TaskAddPublicLabel",
        "TaskRemovePublicLabel",
        "TaskAddPrivateLabel",
        "TaskRemovePrivateLabel",
        "TaskAddAuthorLabel",
        "TaskRemoveAuthorLabel",
        "TaskTopicGrantUpdate",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_renames() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "CustomForumIndex".to_string(),
            "CustomIndex".to_string(),
        ),
        (
            "ForumCustomIndexItems".to_string(),
            "GetCustomIndexItems".to_string(),
        ),
    ])
}

fn default_roots() -> Vec<String> {
    vec!["handlers".to_string()]
}

fn default_extensions() -> Vec<String> {
    vec!["go".to_string()]
}

// =============================================================================
// Loading
// =============================================================================

/// Load a config file, merging it over the built-in defaults.
///
/// `~` in the path is expanded. Unlike the built-ins, an explicit file that
/// is missing or malformed is an error.
pub fn load_config(path: &str) -> crate::Result<CodemodConfig> {
    let expanded = shellexpand::tilde(path).to_string();
    let path = Path::new(&expanded);

    let content = fs::read_to_string(path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
            .with_hint("Check the --config path")
    })?;

    parse_config(&content, &path.display().to_string())
}

/// Parse config JSON; `origin` names the source in error details.
pub fn parse_config(content: &str, origin: &str) -> crate::Result<CodemodConfig> {
    serde_json::from_str(content).map_err(|e| crate::Error::config_invalid_json(origin, e))
}

/// Load from `path` when given, otherwise return the built-in defaults.
pub fn resolve_config(path: Option<&str>) -> crate::Result<CodemodConfig> {
    match path {
        Some(p) => load_config(p),
        None => Ok(builtin_config()),
    }
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_config() -> CodemodConfig {
    CodemodConfig::default()
}
