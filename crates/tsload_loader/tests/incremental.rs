//! End-to-end behaviour of the loader across repeated invocations: cache
//! reuse, invalidation, fail-fast phase ordering, and output shape.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tsload_cache::RegistrationSummary;
use tsload_config::InvalidationStrategy;
use tsload_diagnostics::Diagnostic;
use tsload_loader::{
    CompilationResult, Loader, LoaderConfig, LoaderError, LoaderOptions, LoaderRequest,
    RecordingHost, FAILURE_MESSAGE,
};
use tsload_session::testing::{EngineCall, ScriptedEngine};
use tsload_session::EmitFailure;
use tsload_source::MemoryFileSystem;

const LIB: &str = "/project/lib.d.ts";
const A: &str = "/project/a.ts";
const B: &str = "/project/b.ts";

const A_SOURCE: &str = "/// <reference path=\"lib.d.ts\" />\nvar a: number = 1;";

type TestLoader = Loader<Arc<MemoryFileSystem>, ScriptedEngine>;

fn project(files: &[(&str, &str)]) -> Arc<MemoryFileSystem> {
    let fs = Arc::new(MemoryFileSystem::new());
    fs.write(LIB, "interface Object {}");
    for (path, text) in files {
        fs.write(*path, *text);
    }
    fs
}

fn loader_with(fs: &Arc<MemoryFileSystem>, engine: ScriptedEngine) -> TestLoader {
    let mut config = LoaderConfig::new(LIB);
    config.build.root = PathBuf::from("/project");
    Loader::new(config, Arc::clone(fs), engine)
}

fn loader(fs: &Arc<MemoryFileSystem>) -> TestLoader {
    loader_with(fs, ScriptedEngine::new())
}

fn p(s: &str) -> PathBuf {
    PathBuf::from(s)
}

/// Runs one invocation and returns what the callback received.
fn invoke(
    loader: &mut TestLoader,
    request: &LoaderRequest,
    host: &mut RecordingHost,
) -> Result<CompilationResult, String> {
    let delivered = RefCell::new(None);
    loader
        .run(request, host, |outcome| *delivered.borrow_mut() = Some(outcome))
        .expect("invocation should not fault");
    delivered.into_inner().expect("callback was not invoked")
}

#[test]
fn scenario_second_invocation_is_a_no_op() {
    let fs = project(&[(A, A_SOURCE)]);
    let mut loader = loader(&fs);
    let request = LoaderRequest::new(A, A_SOURCE);

    let first = invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();
    let summary = loader.last_registration_summary();
    assert_eq!(summary.new_files, vec![p(LIB), p(A)]);
    assert_eq!(loader.session().engine().registration_count(Path::new(LIB)), 1);
    assert_eq!(loader.session().engine().registration_count(Path::new(A)), 1);

    loader.session_mut().engine_mut().clear_calls();
    let second = invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();

    let summary = loader.last_registration_summary();
    assert!(summary.nothing_registered());
    assert!(summary.unchanged_files.contains(&p(LIB)));
    assert!(summary.unchanged_files.contains(&p(A)));
    assert!(loader.session().engine().registered_paths().is_empty());
    assert_eq!(first, second);
}

#[test]
fn unchanged_files_are_not_read_again() {
    let fs = project(&[(A, A_SOURCE)]);
    let mut loader = loader(&fs);
    let request = LoaderRequest::new(A, A_SOURCE);

    invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();
    let reads = fs.total_reads();
    invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();
    assert_eq!(fs.total_reads(), reads);
    assert!(loader.store().stats().hits > 0);
}

#[test]
fn modified_file_is_re_registered() {
    let fs = project(&[(A, "/// <reference path=\"b.ts\" />\nvar a = b;"), (B, "var b = 1;")]);
    let mut loader = loader(&fs);
    let request = LoaderRequest::new(A, "/// <reference path=\"b.ts\" />\nvar a = b;");
    invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();

    fs.write(B, "var b = 2;");
    loader.session_mut().engine_mut().clear_calls();
    invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();

    let summary = loader.last_registration_summary();
    assert_eq!(summary.modified_files, vec![p(B)]);
    assert!(summary.new_files.is_empty());
    assert_eq!(loader.session().engine().registered_paths(), vec![p(B)]);
    assert_eq!(
        loader
            .session()
            .engine()
            .registered_content(Path::new(B))
            .as_deref(),
        Some("var b = 2;")
    );
}

#[test]
fn touched_file_is_re_registered_even_with_same_content() {
    let fs = project(&[(A, "var a;")]);
    let mut loader = loader(&fs);
    let request = LoaderRequest::new(A, "var a;");
    invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();

    assert!(fs.touch(Path::new(A)));
    invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();
    assert_eq!(loader.last_registration_summary().modified_files, vec![p(A)]);
}

#[test]
fn standard_library_is_registered_once() {
    let fs = project(&[(A, "var a;")]);
    let mut loader = loader(&fs);
    let request = LoaderRequest::new(A, "var a;");
    invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();

    fs.write(LIB, "interface Object { changed: any }");
    invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();
    assert_eq!(loader.session().engine().registration_count(Path::new(LIB)), 1);
}

#[test]
fn syntax_error_skips_semantic_phase() {
    let fs = project(&[(A, "/// <reference path=\"b.ts\" />\nvar a = ;"), (B, "var b;")]);
    let engine = ScriptedEngine::new()
        .with_syntax_diagnostics(A, vec![Diagnostic::error(A, 1, 8, "Expression expected.")])
        .with_semantic_diagnostics(B, vec![Diagnostic::error(B, 0, 0, "never reported")]);
    let mut loader = loader_with(&fs, engine);
    let mut host = RecordingHost::new();

    let outcome = invoke(&mut loader, &LoaderRequest::new(A, "var a = ;"), &mut host);

    assert_eq!(outcome.unwrap_err(), FAILURE_MESSAGE);
    assert_eq!(host.errors(), ["/project/a.ts(2,9) Expression expected."]);
    let engine = loader.session().engine();
    assert!(!engine.semantic_checked(Path::new(A)));
    assert!(!engine.semantic_checked(Path::new(B)));
    assert!(engine.calls().contains(&EngineCall::Syntactic(p(B))));
}

#[test]
fn semantic_errors_from_every_file_are_reported() {
    let fs = project(&[(A, "/// <reference path=\"b.ts\" />\nvar a = b;"), (B, "var b;")]);
    let engine = ScriptedEngine::new()
        .with_semantic_diagnostics(A, vec![Diagnostic::error(A, 1, 8, "Cannot find name 'b'.")])
        .with_semantic_diagnostics(B, vec![Diagnostic::warning(B, 0, 4, "Implicit any.")]);
    let mut loader = loader_with(&fs, engine);
    let mut host = RecordingHost::new();

    let outcome = invoke(&mut loader, &LoaderRequest::new(A, ""), &mut host);

    assert_eq!(outcome.unwrap_err(), "Failed during compilation");
    assert_eq!(host.errors(), ["/project/a.ts(2,9) Cannot find name 'b'."]);
    assert_eq!(host.warnings(), ["/project/b.ts(1,5) Implicit any."]);
}

#[test]
fn info_diagnostics_never_reach_the_host() {
    let fs = project(&[(A, "var a;")]);
    let engine = ScriptedEngine::new()
        .with_semantic_diagnostics(A, vec![Diagnostic::info(A, 0, 0, "Checked 1 file.")]);
    let mut loader = loader_with(&fs, engine);
    let mut host = RecordingHost::new();

    invoke(&mut loader, &LoaderRequest::new(A, "var a;"), &mut host).unwrap();
    assert!(host.warnings().is_empty());
    assert!(host.errors().is_empty());
}

#[test]
fn resolution_error_fails_before_registration() {
    let fs = project(&[(A, "/// <reference path=\"missing.ts\" />\nvar a;")]);
    let mut loader = loader(&fs);
    let mut host = RecordingHost::new();

    let outcome = invoke(&mut loader, &LoaderRequest::new(A, ""), &mut host);

    assert_eq!(outcome.unwrap_err(), FAILURE_MESSAGE);
    assert_eq!(host.errors().len(), 1);
    assert!(host.errors()[0].starts_with("/project/a.ts(1,1) "));
    assert!(host.errors()[0].contains("missing.ts"));
    assert!(host.dependencies.is_empty());
    assert!(loader.session().engine().registered_paths().is_empty());
}

#[test]
fn source_map_is_normalized() {
    let source = "var answer = 42;";
    let fs = project(&[("/project/src/app.ts", source)]);
    let mut loader = loader(&fs);
    let host_text = "var answer = 42; // as the bundler saw it";

    let result = invoke(
        &mut loader,
        &LoaderRequest::new("/project/src/app.ts", host_text),
        &mut RecordingHost::new(),
    )
    .unwrap();

    assert_eq!(result.code, "var answer = 42;\n\n");
    let map = result.source_map.expect("source map");
    assert_eq!(map.sources, vec!["src/app.ts"]);
    assert_eq!(map.sources_content, Some(vec![Some(host_text.to_string())]));
    assert_eq!(map.file, None);
    assert_eq!(map.mappings, "AAAA");

    let json = map.to_value().unwrap();
    assert!(json.get("file").is_none());
    assert_eq!(json["version"], 3);
    assert_eq!(json["sourceRoot"], "");
}

#[test]
fn missing_source_map_is_absent() {
    let fs = project(&[(A, "var a;")]);
    let mut loader = loader_with(&fs, ScriptedEngine::new().without_source_maps());
    let result = invoke(&mut loader, &LoaderRequest::new(A, "var a;"), &mut RecordingHost::new())
        .unwrap();
    assert!(result.source_map.is_none());
    assert_eq!(result.code, "var a;\n\n");
}

#[test]
fn cache_false_re_reads_and_re_registers_everything() {
    let fs = project(&[(A, "/// <reference path=\"b.ts\" />\nvar a = b;"), (B, "var b;")]);
    let mut loader = loader(&fs);
    let cached = LoaderRequest::new(A, "");
    invoke(&mut loader, &cached, &mut RecordingHost::new()).unwrap();

    let reads_before: Vec<usize> = [LIB, A, B].iter().map(|f| fs.read_count(Path::new(f))).collect();
    loader.session_mut().engine_mut().clear_calls();

    let uncached = LoaderRequest::from_query(A, "", "?cache=false").unwrap();
    invoke(&mut loader, &uncached, &mut RecordingHost::new()).unwrap();

    for (file, before) in [LIB, A, B].iter().zip(reads_before) {
        assert!(fs.read_count(Path::new(file)) > before, "{file} was not re-read");
        assert_eq!(
            loader.session().engine().registration_count(Path::new(file)),
            1,
            "{file} was not re-registered"
        );
    }
    let summary = loader.last_registration_summary();
    assert_eq!(summary.new_files, vec![p(LIB), p(A), p(B)]);
    assert!(summary.unchanged_files.is_empty());

    // Caching resumes once the override is gone.
    loader.session_mut().engine_mut().clear_calls();
    invoke(&mut loader, &cached, &mut RecordingHost::new()).unwrap();
    assert!(loader.session().engine().registered_paths().is_empty());
}

#[test]
fn disabled_in_config_behaves_like_cache_false() {
    let fs = project(&[(A, "var a;")]);
    let mut config = LoaderConfig::new(LIB);
    config.build.root = p("/project");
    config.cache.enabled = false;
    let mut loader = Loader::new(config, Arc::clone(&fs), ScriptedEngine::new());
    let request = LoaderRequest::new(A, "var a;").with_options(LoaderOptions { cache: true });

    invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();
    invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();
    assert_eq!(loader.session().engine().registration_count(Path::new(A)), 2);
}

#[test]
fn trust_cache_ignores_modification_times() {
    let fs = project(&[(A, "var a = 1;")]);
    let mut config = LoaderConfig::new(LIB);
    config.build.root = p("/project");
    config.cache.invalidation = InvalidationStrategy::TrustCache;
    let mut loader = Loader::new(config, Arc::clone(&fs), ScriptedEngine::new());
    let request = LoaderRequest::new(A, "var a = 1;");
    let first = invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();

    fs.write(A, "var a = 2;");
    let second = invoke(&mut loader, &request, &mut RecordingHost::new()).unwrap();
    assert_eq!(loader.session().engine().registration_count(Path::new(A)), 1);
    assert_eq!(first.code, second.code);
}

#[test]
fn emit_failure_is_a_fault_not_a_callback() {
    let fs = project(&[(A, "var a;")]);
    let engine = ScriptedEngine::new().with_emit_failure(A, "/project/ghost.ts");
    let mut loader = loader_with(&fs, engine);
    let mut called = false;

    let err = loader
        .run(&LoaderRequest::new(A, "var a;"), &mut RecordingHost::new(), |_| called = true)
        .unwrap_err();

    assert!(!called);
    match err {
        LoaderError::Emit(EmitFailure { path }) => assert_eq!(path, p("/project/ghost.ts")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn host_is_told_about_every_dependency() {
    let fs = project(&[(A, "/// <reference path=\"b.ts\" />\nvar a = b;"), (B, "var b;")]);
    let mut loader = loader(&fs);
    let mut host = RecordingHost::new();
    invoke(&mut loader, &LoaderRequest::new(A, ""), &mut host).unwrap();

    assert_eq!(host.cacheable, Some(true));
    assert_eq!(host.dependencies, vec![p(LIB), p(A), p(B)]);
}

#[test]
fn source_maps_off_in_config_drops_the_map() {
    let fs = project(&[(A, "var a;")]);
    let mut config = LoaderConfig::new(LIB);
    config.build.root = p("/project");
    config.compiler.source_maps = false;
    let mut loader = Loader::new(config, Arc::clone(&fs), ScriptedEngine::new());

    let result = invoke(&mut loader, &LoaderRequest::new(A, "var a;"), &mut RecordingHost::new())
        .unwrap();
    assert!(result.source_map.is_none());
    assert_eq!(result.code, "var a;\n\n");
}

#[test]
fn failed_registration_pass_leaves_no_stale_summary() {
    let fs = project(&[(A, "var a;")]);
    let mut loader = loader(&fs);
    invoke(&mut loader, &LoaderRequest::new(A, "var a;"), &mut RecordingHost::new()).unwrap();
    assert!(!loader.last_registration_summary().nothing_registered());

    assert!(fs.remove(Path::new(LIB)));
    let uncached = LoaderRequest::from_query(A, "var a;", "cache=false").unwrap();
    let err = loader
        .run(&uncached, &mut RecordingHost::new(), |_| panic!("callback on fault"))
        .unwrap_err();

    assert!(matches!(err, LoaderError::Source(_)));
    assert_eq!(loader.last_registration_summary(), &RegistrationSummary::default());
}
