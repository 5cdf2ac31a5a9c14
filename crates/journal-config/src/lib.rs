//! Configuration primitives and loader for the journal server.
//!
//! Settings are resolved with the precedence
//! override file → working directory `journal.toml` → built-in defaults.
//! Every value remembers the layer that supplied it so relative paths resolve
//! against that layer's directory and validation errors can name their origin.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "journal.toml";

const DEFAULT_SITE_TITLE: &str = "Journal";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CONTENT_ROOT: &str = "content";
const DEFAULT_STATIC_DIR: &str = "static";
/// Characters kept in a listing summary before it is cut with `...`.
pub const DEFAULT_SUMMARY_LENGTH: usize = 220;

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub site: SiteSettings,
    pub server: ServerSettings,
    pub content: ContentSettings,
    pub templates: TemplateSettings,
    pub static_files: StaticSettings,
    pub sources: ConfigSources,
}

/// Values shown on every page.
#[derive(Clone, Debug)]
pub struct SiteSettings {
    pub title: String,
}

/// Listener settings.
#[derive(Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    /// `host:port` string suitable for binding a listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where content lives and how listings summarise it.
#[derive(Clone, Debug)]
pub struct ContentSettings {
    pub root: PathBuf,
    pub exclude: PatternList,
    pub summary_length: usize,
}

/// Directory holding template overrides; `None` uses the built-in set only.
#[derive(Clone, Debug)]
pub struct TemplateSettings {
    pub dir: Option<PathBuf>,
}

/// Directory served under `/static`.
#[derive(Clone, Debug)]
pub struct StaticSettings {
    pub dir: PathBuf,
}

/// Pattern plus compiled matcher.
#[derive(Clone, Debug)]
pub struct Pattern {
    original: String,
    matcher: GlobMatcher,
}

impl Pattern {
    fn new(source: &ConfigSource, value: String) -> Result<Self, ConfigValidationError> {
        match Glob::new(&value) {
            Ok(glob) => Ok(Pattern {
                original: value,
                matcher: glob.compile_matcher(),
            }),
            Err(err) => Err(ConfigValidationError::new(
                Some(source.clone()),
                format!("invalid glob pattern '{value}': {err}"),
            )),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn is_match(&self, path: &Path) -> bool {
        self.matcher.is_match(path)
    }
}

/// Ordered list of glob patterns.
#[derive(Clone, Debug, Default)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    fn new(patterns: Vec<Pattern>) -> Self {
        PatternList { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// True when any pattern matches `path`.
    pub fn matches(&self, path: &Path) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(path))
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = defaults_layer(&default_source);
        let mut source_layers = vec![default_source];

        let local_config_path = working_dir.join(CONFIG_FILE_NAME);
        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, &source)?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, &source)?);
            source_layers.push(source);
        }

        let resolved = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            site: resolved.site,
            server: resolved.server,
            content: resolved.content,
            templates: resolved.templates,
            static_files: resolved.static_files,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }

    /// Configuration made only of built-in defaults rooted at `working_dir`.
    pub fn defaults_in(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        let source = ConfigSource::default(working_dir.clone());
        let resolved = defaults_layer(&source)
            .finalize()
            .unwrap_or_else(|err| panic!("built-in journal defaults are invalid: {err}"));
        Config {
            site: resolved.site,
            server: resolved.server,
            content: resolved.content,
            templates: resolved.templates,
            static_files: resolved.static_files,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: vec![source],
            },
        }
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: &ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io {
        path: path.into(),
        source: err,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|err| ConfigError::Parse {
        path: path.into(),
        source: err,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: &ConfigSource) -> PartialConfig {
    PartialConfig {
        site_title: Some(Located::new(DEFAULT_SITE_TITLE.to_string(), source)),
        host: Some(Located::new(DEFAULT_HOST.to_string(), source)),
        port: Some(Located::new(DEFAULT_PORT, source)),
        content_root: Some(Located::new(PathBuf::from(DEFAULT_CONTENT_ROOT), source)),
        content_exclude: Some(Located::new(Vec::new(), source)),
        summary_length: Some(Located::new(DEFAULT_SUMMARY_LENGTH, source)),
        templates_dir: None,
        static_dir: Some(Located::new(PathBuf::from(DEFAULT_STATIC_DIR), source)),
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: &ConfigSource) -> Self {
        Located {
            value,
            source: source.clone(),
        }
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    site_title: Option<Located<String>>,
    host: Option<Located<String>>,
    port: Option<Located<u16>>,
    content_root: Option<Located<PathBuf>>,
    content_exclude: Option<Located<Vec<String>>>,
    summary_length: Option<Located<usize>>,
    templates_dir: Option<Located<PathBuf>>,
    static_dir: Option<Located<PathBuf>>,
}

struct ResolvedConfig {
    site: SiteSettings,
    server: ServerSettings,
    content: ContentSettings,
    templates: TemplateSettings,
    static_files: StaticSettings,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        if other.site_title.is_some() {
            self.site_title = other.site_title;
        }
        if other.host.is_some() {
            self.host = other.host;
        }
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.content_root.is_some() {
            self.content_root = other.content_root;
        }
        if other.content_exclude.is_some() {
            self.content_exclude = other.content_exclude;
        }
        if other.summary_length.is_some() {
            self.summary_length = other.summary_length;
        }
        if other.templates_dir.is_some() {
            self.templates_dir = other.templates_dir;
        }
        if other.static_dir.is_some() {
            self.static_dir = other.static_dir;
        }
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();
        let fallback = ConfigSource::default(PathBuf::from("."));

        let site_title = self
            .site_title
            .unwrap_or_else(|| Located::new(DEFAULT_SITE_TITLE.to_string(), &fallback));
        if site_title.value.trim().is_empty() {
            errors.push(ConfigValidationError::new(
                Some(site_title.source.clone()),
                "site.title cannot be empty".into(),
            ));
        }

        let host = self
            .host
            .unwrap_or_else(|| Located::new(DEFAULT_HOST.to_string(), &fallback));
        if host.value.trim().is_empty() {
            errors.push(ConfigValidationError::new(
                Some(host.source.clone()),
                "server.host cannot be empty".into(),
            ));
        }

        let port = self
            .port
            .unwrap_or_else(|| Located::new(DEFAULT_PORT, &fallback));
        if port.value == 0 {
            errors.push(ConfigValidationError::new(
                Some(port.source.clone()),
                "server.port must be between 1 and 65535".into(),
            ));
        }

        let summary_length = self
            .summary_length
            .unwrap_or_else(|| Located::new(DEFAULT_SUMMARY_LENGTH, &fallback));
        if summary_length.value == 0 {
            errors.push(ConfigValidationError::new(
                Some(summary_length.source.clone()),
                "content.summary_length must be greater than 0".into(),
            ));
        }

        let content_root = self
            .content_root
            .unwrap_or_else(|| Located::new(PathBuf::from(DEFAULT_CONTENT_ROOT), &fallback));
        let exclude = self
            .content_exclude
            .unwrap_or_else(|| Located::new(Vec::new(), &fallback));
        let exclude = compile_patterns(exclude, "content.exclude", &mut errors);

        let static_dir = self
            .static_dir
            .unwrap_or_else(|| Located::new(PathBuf::from(DEFAULT_STATIC_DIR), &fallback));

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            site: SiteSettings {
                title: site_title.value,
            },
            server: ServerSettings {
                host: host.value,
                port: port.value,
            },
            content: ContentSettings {
                root: resolve_path(&content_root),
                exclude: PatternList::new(exclude),
                summary_length: summary_length.value,
            },
            templates: TemplateSettings {
                dir: self.templates_dir.as_ref().map(resolve_path),
            },
            static_files: StaticSettings {
                dir: resolve_path(&static_dir),
            },
        })
    }
}

fn compile_patterns(
    located: Located<Vec<String>>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    for pattern in located.value {
        match Pattern::new(&located.source, pattern) {
            Ok(compiled) => patterns.push(compiled),
            Err(err) => errors.push(err.with_context(context)),
        }
    }
    patterns
}

/// Aggregated validation failures.
#[derive(Clone, Debug)]
pub struct ConfigValidationErrors(Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    site: Option<RawSite>,
    #[serde(default)]
    server: Option<RawServer>,
    #[serde(default)]
    content: Option<RawContent>,
    #[serde(default)]
    templates: Option<RawDir>,
    #[serde(default, rename = "static")]
    static_files: Option<RawDir>,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct RawContent {
    #[serde(default)]
    root: Option<PathBuf>,
    #[serde(default)]
    exclude: Option<Vec<String>>,
    #[serde(default)]
    summary_length: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawDir {
    #[serde(default)]
    dir: Option<PathBuf>,
}

impl RawConfig {
    fn into_partial(self, source: &ConfigSource) -> PartialConfig {
        let locate = |value| Located::new(value, source);
        let mut partial = PartialConfig::default();

        if let Some(site) = self.site {
            partial.site_title = site.title.map(|value| Located::new(value, source));
        }
        if let Some(server) = self.server {
            partial.host = server.host.map(|value| Located::new(value, source));
            partial.port = server.port.map(|value| Located::new(value, source));
        }
        if let Some(content) = self.content {
            partial.content_root = content.root.map(locate);
            partial.content_exclude = content.exclude.map(|value| Located::new(value, source));
            partial.summary_length = content
                .summary_length
                .map(|value| Located::new(value, source));
        }
        if let Some(templates) = self.templates {
            partial.templates_dir = templates.dir.map(locate);
        }
        if let Some(static_files) = self.static_files {
            partial.static_dir = static_files.dir.map(locate);
        }

        partial
    }
}
