//! # Descriptor Pipeline
//!
//! End-to-end compiles over real application directories: rendering,
//! conditional writes, vars precedence, `registered` handling, validation
//! failures, version commands, and clean-up.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use appc_compiler::clean::clean;
use appc_compiler::{
    loader, AppError, AppInfo, BuildState, CodePathRegistry, CommandRunner, Compiler,
    WriteOutcome,
};
use appc_core::{Atom, Term};
use proptest::prelude::*;

fn write(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// Create `<root>/<name>` with a template and compiled modules.
fn app_dir(root: &Path, name: &str, template: &str, beams: &[&str]) -> PathBuf {
    let dir = root.join(name);
    write(&dir.join(format!("src/{name}.app.src")), template);
    std::fs::create_dir_all(dir.join("ebin")).unwrap();
    for beam in beams {
        write(&dir.join(format!("ebin/{beam}.beam")), "");
    }
    dir
}

fn keys(path: &Path) -> Vec<String> {
    loader::load(path)
        .unwrap()
        .properties
        .keys()
        .map(Atom::to_string)
        .collect()
}

const FOO: &str = "{application, foo, [{description, \"x\"}, {vsn, \"0.1.0\"}]}.\n";

#[test]
fn scenario_renders_expected_descriptor() {
    let root = tempfile::tempdir().unwrap();
    let dir = app_dir(root.path(), "foo", FOO, &["foo_a", "foo_b"]);
    let app = AppInfo::discover(&dir).unwrap();

    let compiled = Compiler::new().compile(BuildState::new(), &app).unwrap();
    assert_eq!(compiled.app.vsn(), Some("0.1.0"));

    let text = std::fs::read_to_string(dir.join("ebin/foo.app")).unwrap();
    let expected = "{application,foo,\n\
                    \x20            [{registered,[]},\n\
                    \x20             {description,\"x\"},\n\
                    \x20             {vsn,\"0.1.0\"},\n\
                    \x20             {modules,[foo_a,foo_b]}]}.\n";
    assert_eq!(text, expected);
}

#[test]
fn second_compile_is_a_no_op_write() {
    let root = tempfile::tempdir().unwrap();
    let dir = app_dir(root.path(), "foo", FOO, &["foo_a"]);
    let app = AppInfo::discover(&dir).unwrap();
    let compiler = Compiler::new();

    let first = compiler.compile(BuildState::new(), &app).unwrap();
    let before = std::fs::metadata(dir.join("ebin/foo.app"))
        .unwrap()
        .modified()
        .unwrap();
    let second = compiler.compile(first.state.clone(), &app).unwrap();
    let after = std::fs::metadata(dir.join("ebin/foo.app"))
        .unwrap()
        .modified()
        .unwrap();

    assert_eq!(first.outcome, Some(WriteOutcome::Written));
    assert_eq!(second.outcome, Some(WriteOutcome::Unchanged));
    assert_eq!(before, after);
    assert_eq!(first.app, second.app);
}

#[test]
fn compiled_modules_override_vars_file() {
    let root = tempfile::tempdir().unwrap();
    let dir = app_dir(root.path(), "foo", FOO, &["c", "d"]);
    let vars = root.path().join("app.vars");
    write(&vars, "{modules, [a, b]}.\n{description, \"from vars\"}.\n");

    let state = BuildState::new().with_app_vars_file(&vars);
    let app = AppInfo::discover(&dir).unwrap();
    Compiler::new().compile(state, &app).unwrap();

    let desc = loader::load(&dir.join("ebin/foo.app")).unwrap();
    assert_eq!(desc.properties.get("modules"), Some(&Term::atom_list(["c", "d"])));
    assert_eq!(
        desc.properties.get("description"),
        Some(&Term::string("from vars"))
    );
}

#[test]
fn unreadable_vars_file_aborts_before_writing() {
    let root = tempfile::tempdir().unwrap();
    let dir = app_dir(root.path(), "foo", FOO, &[]);
    let state = BuildState::new().with_app_vars_file(root.path().join("missing.vars"));
    let app = AppInfo::discover(&dir).unwrap();

    let err = Compiler::new().compile(state, &app).unwrap_err();
    assert!(matches!(err, AppError::FileRead { .. }));
    assert!(err.to_string().starts_with("Failed to read "));
    assert!(!dir.join("ebin/foo.app").exists());
}

#[test]
fn registered_is_injected_or_preserved() {
    let root = tempfile::tempdir().unwrap();
    let bare = app_dir(root.path(), "foo", FOO, &[]);
    let declared = app_dir(
        root.path(),
        "bar",
        "{application, bar, [{vsn, \"1\"}, {registered, [bar_server]}]}.\n",
        &[],
    );
    let compiler = Compiler::new();

    for dir in [&bare, &declared] {
        let app = AppInfo::discover(dir).unwrap();
        compiler.compile(BuildState::new(), &app).unwrap();
    }

    let foo = loader::load(&bare.join("ebin/foo.app")).unwrap();
    assert_eq!(foo.properties.get("registered"), Some(&Term::List(vec![])));
    assert_eq!(keys(&bare.join("ebin/foo.app"))[0], "registered");

    let bar = loader::load(&declared.join("ebin/bar.app")).unwrap();
    assert_eq!(
        bar.properties.get("registered"),
        Some(&Term::atom_list(["bar_server"]))
    );
    assert_eq!(
        keys(&declared.join("ebin/bar.app")),
        vec!["vsn", "registered", "modules"]
    );
}

#[test]
fn mismatched_name_is_reported_with_declared_name() {
    let root = tempfile::tempdir().unwrap();
    let dir = app_dir(
        root.path(),
        "foo",
        "{application, bar, [{vsn, \"1\"}]}.\n",
        &[],
    );
    let app = AppInfo::discover(&dir).unwrap();
    let err = Compiler::new()
        .compile(BuildState::new(), &app)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "Invalid {}: name of application (bar) must match filename.",
            dir.join("ebin/foo.app").display()
        )
    );
}

#[test]
fn module_validation_can_be_disabled() {
    let root = tempfile::tempdir().unwrap();
    let dir = app_dir(root.path(), "foo", FOO, &["foo"]);
    let vars = root.path().join("app.vars");
    write(&vars, "{modules, [foo, ghost]}.\n");
    let app = AppInfo::discover(&dir).unwrap();
    let compiler = Compiler::new();

    // Compiled modules win, so the descriptor is compliant either way.
    let state = BuildState::new().with_app_vars_file(&vars);
    assert!(compiler.compile(state.clone(), &app).is_ok());

    // A hand-edited descriptor without a template is only caught when enabled.
    std::fs::remove_file(dir.join("src/foo.app.src")).unwrap();
    write(
        &dir.join("ebin/foo.app"),
        "{application, foo, [{vsn, \"1\"}, {modules, [foo, ghost]}]}.\n",
    );
    let app = AppInfo::discover(&dir).unwrap();
    assert!(matches!(
        compiler.compile(state.clone(), &app),
        Err(AppError::ModuleValidation(_))
    ));
    let lenient = state.with_validate_app_modules(false);
    let compiled = compiler.compile(lenient, &app).unwrap();
    assert_eq!(compiled.app.vsn(), Some("1"));
    assert_eq!(compiled.outcome, None);
}

/// Answers every command with a fixed version and counts calls.
struct FixedVersion {
    vsn: &'static str,
    calls: AtomicUsize,
}

impl CommandRunner for FixedVersion {
    fn run(&self, program: &str, _args: &[&str], cwd: &Path) -> std::io::Result<String> {
        assert_eq!(program, "git");
        assert!(cwd.ends_with("foo"));
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}\n", self.vsn))
    }
}

#[test]
fn git_version_is_resolved_once_per_state() {
    let root = tempfile::tempdir().unwrap();
    let dir = app_dir(
        root.path(),
        "foo",
        "{application, foo, [{vsn, git}]}.\n",
        &[],
    );
    let runner = Arc::new(FixedVersion {
        vsn: "v2.3.1",
        calls: AtomicUsize::new(0),
    });
    let registry = Arc::new(CodePathRegistry::new());
    let compiler = Compiler::new()
        .with_runner(runner.clone())
        .with_runtime(registry.clone());
    let app = AppInfo::discover(&dir).unwrap();

    let first = compiler.compile(BuildState::new(), &app).unwrap();
    let second = compiler.compile(first.state, &app).unwrap();

    assert_eq!(second.app.vsn(), Some("v2.3.1"));
    assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.outcome, Some(WriteOutcome::Unchanged));
    assert_eq!(registry.paths(), vec![dir.join("ebin")]);
}

#[test]
fn clean_removes_descriptor_and_is_idempotent() {
    let root = tempfile::tempdir().unwrap();
    let dir = app_dir(root.path(), "foo", FOO, &[]);
    let app = AppInfo::discover(&dir).unwrap();
    Compiler::new().compile(BuildState::new(), &app).unwrap();
    assert!(dir.join("ebin/foo.app").exists());

    let template = dir.join("src/foo.app.src");
    clean(&template).unwrap();
    assert!(!dir.join("ebin/foo.app").exists());
    clean(&template).unwrap();
    assert!(template.exists());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn any_module_set_compiles_sorted_and_stably(
        modules in proptest::collection::btree_set("[a-z][a-z0-9_]{0,8}", 0..12)
    ) {
        let root = tempfile::tempdir().unwrap();
        let beams: Vec<&str> = modules.iter().map(String::as_str).collect();
        let dir = app_dir(root.path(), "foo", FOO, &beams);
        let app = AppInfo::discover(&dir).unwrap();
        let compiler = Compiler::new();

        let first = compiler.compile(BuildState::new(), &app).unwrap();
        let second = compiler.compile(first.state, &app).unwrap();
        prop_assert_eq!(second.outcome, Some(WriteOutcome::Unchanged));

        let desc = loader::load(&dir.join("ebin/foo.app")).unwrap();
        let expected = Term::atom_list(modules.iter().cloned());
        prop_assert_eq!(desc.properties.get("modules"), Some(&expected));
    }
}
