//! Configuration types deserialized from `tsload.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// The top-level loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoaderConfig {
    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,
    /// Settings the compiler session is created with.
    pub compiler: CompilerSettings,
    /// Snapshot and registration cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl LoaderConfig {
    /// Creates a configuration with defaults for everything except the
    /// standard-library definition file.
    pub fn new(default_lib: impl Into<PathBuf>) -> Self {
        Self {
            build: BuildConfig::default(),
            compiler: CompilerSettings::new(default_lib),
            cache: CacheConfig::default(),
        }
    }
}

/// Build-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildConfig {
    /// Directory that source-map `sources` entries are made relative to.
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// Code generation settings and the standard-library location.
///
/// `target` and `module` are read only by the host, which constructs its
/// compiler engine with them; the loader itself never inspects generated code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompilerSettings {
    /// Language level of the emitted code. Host-only.
    #[serde(default)]
    pub target: LanguageVersion,
    /// Module system of the emitted code. Host-only.
    #[serde(default)]
    pub module: ModuleTarget,
    /// Whether source maps are produced. The host should configure its engine
    /// to match; the loader drops any map emitted while this is off.
    #[serde(default = "default_true")]
    pub source_maps: bool,
    /// The compiler's standard-library definition file.
    pub default_lib: PathBuf,
}

impl CompilerSettings {
    /// Creates settings with the default target, module system, and source maps on.
    pub fn new(default_lib: impl Into<PathBuf>) -> Self {
        Self {
            target: LanguageVersion::default(),
            module: ModuleTarget::default(),
            source_maps: true,
            default_lib: default_lib.into(),
        }
    }
}

/// Language level of emitted code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageVersion {
    /// ECMAScript 3.
    Es3,
    /// ECMAScript 5.
    #[default]
    Es5,
}

/// Module system of emitted code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleTarget {
    /// CommonJS-style synchronous `require`.
    #[default]
    Synchronous,
    /// AMD-style asynchronous modules.
    Asynchronous,
}

/// Cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Master switch. When `false`, every invocation behaves as if the query
    /// said `cache=false`.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How a cached snapshot or registration is judged stale.
    #[serde(default)]
    pub invalidation: InvalidationStrategy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            invalidation: InvalidationStrategy::default(),
        }
    }
}

/// Which invalidation policy the cache uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidationStrategy {
    /// Re-read and re-register a file when its modification time changes.
    #[default]
    ModificationTime,
    /// Trust any cached entry for the lifetime of the process.
    TrustCache,
}

fn default_true() -> bool {
    true
}
