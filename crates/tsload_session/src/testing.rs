//! A scripted, in-memory compiler engine for tests.
//!
//! [`ScriptedEngine`] resolves `/// <reference path="..." />` directives
//! through the [`ResolverHost`] it is given, keeps registered files in memory,
//! returns whatever diagnostics a test scripted for a path, and emits the
//! registered text as "code" with a trailing source-map reference. Every call
//! is recorded so tests can assert exactly what the loader asked for.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tsload_diagnostics::Diagnostic;

use crate::engine::{
    ArtifactKind, CompilerEngine, EmitArtifact, EmitFailure, Resolution, ResolvedFile,
    ResolverHost,
};

/// A call made against a [`ScriptedEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    /// `resolve_references` with these entries.
    Resolve(Vec<PathBuf>),
    /// `register_file` for this path.
    Register(PathBuf),
    /// `syntactic_diagnostics` for this path.
    Syntactic(PathBuf),
    /// `semantic_diagnostics` for this path.
    Semantic(PathBuf),
    /// `emit` for this entry.
    Emit(PathBuf),
}

#[derive(Debug, Clone)]
struct RegisteredFile {
    content: Arc<str>,
    references: Vec<PathBuf>,
}

/// An engine whose behaviour is scripted per path.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    files: HashMap<PathBuf, RegisteredFile>,
    syntax: HashMap<PathBuf, Vec<Diagnostic>>,
    semantic: HashMap<PathBuf, Vec<Diagnostic>>,
    emit_failures: HashMap<PathBuf, PathBuf>,
    omit_source_map: bool,
    calls: Vec<EngineCall>,
}

impl ScriptedEngine {
    /// Creates an engine with no scripted diagnostics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the syntax diagnostics returned for `path`.
    pub fn with_syntax_diagnostics(mut self, path: impl Into<PathBuf>, diags: Vec<Diagnostic>) -> Self {
        self.syntax.insert(path.into(), diags);
        self
    }

    /// Scripts the semantic diagnostics returned for `path`.
    pub fn with_semantic_diagnostics(mut self, path: impl Into<PathBuf>, diags: Vec<Diagnostic>) -> Self {
        self.semantic.insert(path.into(), diags);
        self
    }

    /// Makes `emit(entry)` fail as if `unresolvable` could not be found.
    pub fn with_emit_failure(mut self, entry: impl Into<PathBuf>, unresolvable: impl Into<PathBuf>) -> Self {
        self.emit_failures.insert(entry.into(), unresolvable.into());
        self
    }

    /// Emits code only, as an engine with source maps turned off would.
    pub fn without_source_maps(mut self) -> Self {
        self.omit_source_map = true;
        self
    }

    /// Replaces the scripted syntax diagnostics for `path` after construction.
    pub fn set_syntax_diagnostics(&mut self, path: impl Into<PathBuf>, diags: Vec<Diagnostic>) {
        self.syntax.insert(path.into(), diags);
    }

    /// Replaces the scripted semantic diagnostics for `path` after construction.
    pub fn set_semantic_diagnostics(&mut self, path: impl Into<PathBuf>, diags: Vec<Diagnostic>) {
        self.semantic.insert(path.into(), diags);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Paths passed to `register_file` since the last [`clear_calls`](Self::clear_calls).
    pub fn registered_paths(&self) -> Vec<PathBuf> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                EngineCall::Register(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    /// How many recorded `register_file` calls named `path`.
    pub fn registration_count(&self, path: &Path) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, EngineCall::Register(p) if p == path))
            .count()
    }

    /// Whether any recorded call asked for semantic diagnostics.
    pub fn semantic_checked(&self, path: &Path) -> bool {
        self.calls
            .iter()
            .any(|c| matches!(c, EngineCall::Semantic(p) if p == path))
    }

    /// The content the engine currently holds for `path`.
    pub fn registered_content(&self, path: &Path) -> Option<Arc<str>> {
        self.files.get(path).map(|f| Arc::clone(&f.content))
    }

    /// The reference list the engine currently holds for `path`.
    pub fn registered_references(&self, path: &Path) -> Option<&[PathBuf]> {
        self.files.get(path).map(|f| f.references.as_slice())
    }
}

impl CompilerEngine for ScriptedEngine {
    fn resolve_references(&mut self, entries: &[PathBuf], host: &mut dyn ResolverHost) -> Resolution {
        self.calls.push(EngineCall::Resolve(entries.to_vec()));

        let mut resolution = Resolution::default();
        let mut seen = HashSet::new();
        let mut queue: VecDeque<(PathBuf, Option<(PathBuf, u32)>)> =
            entries.iter().map(|e| (e.clone(), None)).collect();

        while let Some((path, origin)) = queue.pop_front() {
            if !seen.insert(path.clone()) {
                continue;
            }
            if !host.file_exists(&path) || host.directory_exists(&path) {
                let (file, line) = origin.unwrap_or_else(|| (path.clone(), 0));
                resolution.diagnostics.push(Diagnostic::error(
                    file,
                    line,
                    0,
                    format!("Cannot resolve referenced file: '{}'.", path.display()),
                ));
                continue;
            }
            let snapshot = match host.snapshot(&path) {
                Ok(s) => s,
                Err(e) => {
                    resolution
                        .diagnostics
                        .push(Diagnostic::error(&path, 0, 0, e.to_string()));
                    continue;
                }
            };
            let dir = host.parent_directory(&path).unwrap_or_default();
            let mut referenced_files = Vec::new();
            for (line, reference) in reference_directives(snapshot.content()) {
                let target = host.resolve_relative_path(&reference, &dir);
                referenced_files.push(target.clone());
                queue.push_back((target, Some((path.clone(), line))));
            }
            resolution.resolved_files.push(ResolvedFile {
                path,
                referenced_files,
            });
        }
        resolution
    }

    fn register_file(&mut self, path: &Path, content: Arc<str>, references: &[PathBuf]) {
        self.calls.push(EngineCall::Register(path.to_path_buf()));
        self.files.insert(
            path.to_path_buf(),
            RegisteredFile {
                content,
                references: references.to_vec(),
            },
        );
    }

    fn syntactic_diagnostics(&mut self, path: &Path) -> Vec<Diagnostic> {
        self.calls.push(EngineCall::Syntactic(path.to_path_buf()));
        self.syntax.get(path).cloned().unwrap_or_default()
    }

    fn semantic_diagnostics(&mut self, path: &Path) -> Vec<Diagnostic> {
        self.calls.push(EngineCall::Semantic(path.to_path_buf()));
        self.semantic.get(path).cloned().unwrap_or_default()
    }

    fn emit(&mut self, entry: &Path) -> Result<Vec<EmitArtifact>, EmitFailure> {
        self.calls.push(EngineCall::Emit(entry.to_path_buf()));
        if let Some(missing) = self.emit_failures.get(entry) {
            return Err(EmitFailure {
                path: missing.clone(),
            });
        }
        let file = self.files.get(entry).ok_or_else(|| EmitFailure {
            path: entry.to_path_buf(),
        })?;

        let stem = entry
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let js_name = format!("{stem}.js");
        let map_name = format!("{js_name}.map");

        let mut artifacts = vec![EmitArtifact::new(
            js_name.clone(),
            ArtifactKind::Code,
            format!("{}\n//# sourceMappingURL={map_name}\n", file.content),
        )];
        if !self.omit_source_map {
            let map = serde_json::json!({
                "version": 3,
                "file": js_name,
                "sourceRoot": "",
                "sources": [entry.to_string_lossy()],
                "names": [],
                "mappings": "AAAA",
            });
            artifacts.push(EmitArtifact::new(
                map_name,
                ArtifactKind::SourceMap,
                map.to_string(),
            ));
        }
        Ok(artifacts)
    }
}

/// Extracts `/// <reference path="..." />` targets with their zero-based lines.
pub fn reference_directives(content: &str) -> Vec<(u32, String)> {
    let mut found = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim_start();
        if !line.starts_with("///") || !line.contains("<reference") {
            continue;
        }
        let Some(start) = line.find("path=") else {
            continue;
        };
        let rest = &line[start + "path=".len()..];
        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let rest = &rest[1..];
        if let Some(end) = rest.find(quote) {
            found.push((u32::try_from(index).unwrap_or(u32::MAX), rest[..end].to_string()));
        }
    }
    found
}
