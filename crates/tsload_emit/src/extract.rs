//! Packaging emit artifacts into a single code + source map result.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tsload_session::{ArtifactKind, EmitArtifact};
use tsload_source::{relative_to, to_slash};

use crate::error::OutputError;
use crate::source_map::SourceMap;

const SOURCE_MAP_REFERENCE: &str = "//# sourceMappingURL=";

/// The output of one successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationResult {
    /// Generated code, without a source map reference comment.
    pub code: String,
    /// The normalized source map, if the compiler produced one.
    pub source_map: Option<SourceMap>,
}

/// Reshapes emit artifacts for the bundler.
///
/// The source map's `file` is dropped, `sources` becomes the single resource
/// path relative to the build root, and `sourcesContent` becomes the original
/// text exactly as the host passed it in.
#[derive(Debug, Clone)]
pub struct OutputExtractor {
    build_root: PathBuf,
    source_maps: bool,
}

impl OutputExtractor {
    /// Creates an extractor that relativizes paths against `build_root`.
    pub fn new(build_root: impl Into<PathBuf>) -> Self {
        Self {
            build_root: build_root.into(),
            source_maps: true,
        }
    }

    /// Sets whether source maps are passed on. When off, any source-map
    /// artifact is dropped and results carry no map.
    pub fn with_source_maps(mut self, enabled: bool) -> Self {
        self.source_maps = enabled;
        self
    }

    /// The directory `sources` entries are made relative to.
    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// Converts an emit result into a [`CompilationResult`].
    pub fn extract(
        &self,
        artifacts: Vec<EmitArtifact>,
        resource_path: &Path,
        original_source: &str,
    ) -> Result<CompilationResult, OutputError> {
        let mut code = None;
        let mut map_text = None;
        for artifact in artifacts {
            let slot = match artifact.kind {
                ArtifactKind::Code => &mut code,
                ArtifactKind::SourceMap => &mut map_text,
                ArtifactKind::Other => {
                    tracing::trace!(name = %artifact.name, "ignoring emitted artifact");
                    continue;
                }
            };
            if slot.is_some() {
                return Err(OutputError::DuplicateArtifact {
                    kind: artifact.kind,
                });
            }
            *slot = Some(artifact.text);
        }

        let code = code.ok_or(OutputError::MissingCode)?;
        let code = strip_source_map_reference(&code).into_owned();

        let source_map = match map_text {
            Some(_) if !self.source_maps => {
                tracing::trace!("source maps disabled, dropping emitted map");
                None
            }
            Some(text) => {
                let mut map = SourceMap::from_json(&text).map_err(|e| {
                    OutputError::MalformedSourceMap {
                        reason: e.to_string(),
                    }
                })?;
                self.normalize_map(&mut map, resource_path, original_source);
                Some(map)
            }
            None => None,
        };

        Ok(CompilationResult { code, source_map })
    }

    fn normalize_map(&self, map: &mut SourceMap, resource_path: &Path, original_source: &str) {
        map.file = None;
        map.sources = vec![to_slash(&relative_to(&self.build_root, resource_path))];
        map.sources_content = Some(vec![Some(original_source.to_string())]);
    }
}

/// Removes the first `//# sourceMappingURL=<url>` comment from `code`.
///
/// Only the comment itself, up to the end of its line, is removed; the line
/// break stays. A reference with an empty URL is left alone.
pub fn strip_source_map_reference(code: &str) -> Cow<'_, str> {
    let mut search_from = 0;
    while let Some(offset) = code[search_from..].find(SOURCE_MAP_REFERENCE) {
        let start = search_from + offset;
        let url_start = start + SOURCE_MAP_REFERENCE.len();
        let end = code[url_start..]
            .find(is_line_terminator)
            .map_or(code.len(), |i| url_start + i);
        if end > url_start {
            let mut stripped = String::with_capacity(code.len() - (end - start));
            stripped.push_str(&code[..start]);
            stripped.push_str(&code[end..]);
            return Cow::Owned(stripped);
        }
        search_from = url_start;
    }
    Cow::Borrowed(code)
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
