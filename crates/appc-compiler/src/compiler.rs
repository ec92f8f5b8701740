//! # Compiler
//!
//! Sequences the pipeline for one application:
//!
//! ```text
//! NoTemplate ───────────────────────────────┐
//!                                           ▼
//! Preprocessing (load, vars, vsn, write) ─▶ Validating (name, modules) ─▶ Done
//!        │                                          │
//!        └──────────────────▶ Failed ◀──────────────┘
//! ```
//!
//! The first error aborts the application and is returned as-is. Anything
//! already flushed to disk stays there; nothing is rolled back.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use appc_core::{Atom, Descriptor, Term};

use crate::app::AppInfo;
use crate::compliance::{ComplianceChecker, OtpModuleChecker};
use crate::error::AppResult;
use crate::loader;
use crate::modules::compiled_modules;
use crate::registered::ensure_registered;
use crate::runtime::{CodePathRegistry, RuntimeEnv};
use crate::state::BuildState;
use crate::validate::{validate_modules, validate_name};
use crate::vars::{apply_vars, load_vars};
use crate::version::{resolve_version, CommandRunner, SystemCommandRunner};
use crate::writer::{self, WriteOutcome};

/// Pipeline stage of one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The application has no template; only validation runs.
    NoTemplate,
    /// Rendering and writing the descriptor.
    Preprocessing,
    /// Checking the written descriptor.
    Validating,
    /// Compiled and valid.
    Done,
    /// Aborted by the first error.
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::NoTemplate => "no_template",
            Stage::Preprocessing => "preprocessing",
            Stage::Validating => "validating",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A successfully compiled application.
#[derive(Debug, Clone)]
pub struct Compiled {
    /// The build state to pass to the next compile.
    pub state: BuildState,
    /// The application with its resolved version attached.
    pub app: AppInfo,
    /// What happened to the descriptor file; `None` without a template.
    pub outcome: Option<WriteOutcome>,
}

/// A rendered but unwritten descriptor.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub state: BuildState,
    pub app: AppInfo,
    pub descriptor: Descriptor,
    /// Exact file contents.
    pub text: String,
}

/// Runs the pipeline against injected collaborators.
pub struct Compiler {
    runtime: Arc<dyn RuntimeEnv>,
    checker: Arc<dyn ComplianceChecker>,
    runner: Arc<dyn CommandRunner>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// A compiler with a private code-path registry, the OTP module rules,
    /// and real command execution.
    pub fn new() -> Self {
        Self {
            runtime: Arc::new(CodePathRegistry::new()),
            checker: Arc::new(OtpModuleChecker),
            runner: Arc::new(SystemCommandRunner),
        }
    }

    pub fn with_runtime(mut self, runtime: Arc<dyn RuntimeEnv>) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn with_checker(mut self, checker: Arc<dyn ComplianceChecker>) -> Self {
        self.checker = checker;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Render (when a template exists), write if changed, then validate.
    pub fn compile(&self, state: BuildState, app: &AppInfo) -> AppResult<Compiled> {
        self.run_stages(state, app).map_err(|e| {
            tracing::debug!(
                app = %app.descriptor().display(),
                stage = %Stage::Failed,
                error = %e,
                "stage"
            );
            e
        })
    }

    /// Render the descriptor without writing it. `None` when the
    /// application has no template.
    pub fn render(&self, state: BuildState, app: &AppInfo) -> AppResult<Option<Rendered>> {
        match app.template() {
            Some(template) => self.preprocess(state, app, template).map(Some),
            None => Ok(None),
        }
    }

    /// The validating stage on its own: load the descriptor, check its
    /// name, then its modules.
    pub fn validate(&self, state: &BuildState, app: AppInfo) -> AppResult<AppInfo> {
        let descriptor = loader::load(app.descriptor())?;
        validate_name(&descriptor.name, app.descriptor())?;
        validate_modules(state, app, &descriptor.properties, self.checker.as_ref())
    }

    fn run_stages(&self, state: BuildState, app: &AppInfo) -> AppResult<Compiled> {
        let (state, app, outcome) = match app.template() {
            Some(template) => {
                enter(app, Stage::Preprocessing);
                let rendered = self.preprocess(state, app, template)?;
                let outcome = writer::write_if_differs(
                    rendered.app.descriptor(),
                    &rendered.text,
                    self.runtime.as_ref(),
                )?;
                (rendered.state, rendered.app, Some(outcome))
            }
            None => {
                enter(app, Stage::NoTemplate);
                (state, app.clone(), None)
            }
        };

        enter(&app, Stage::Validating);
        let app = self.validate(&state, app)?;
        enter(&app, Stage::Done);
        Ok(Compiled {
            state,
            app,
            outcome,
        })
    }

    fn preprocess(
        &self,
        state: BuildState,
        app: &AppInfo,
        template: &Path,
    ) -> AppResult<Rendered> {
        let Descriptor { name, properties } = loader::load(template)?;

        let modules = compiled_modules(app.dir())?;
        let mut vars = load_vars(&state)?;
        vars.push((
            Atom::new("modules"),
            Term::List(modules.into_iter().map(Term::Atom).collect()),
        ));
        let mut properties = apply_vars(vars, properties);

        let (state, vsn) = match app.vsn() {
            Some(vsn) => (state, vsn.to_string()),
            None => resolve_version(state, template, &properties, self.runner.as_ref())?,
        };
        properties.upsert("vsn", Term::string(vsn.clone()));
        let properties = ensure_registered(properties);

        let text = writer::serialize(&name, &properties);
        Ok(Rendered {
            state,
            app: app.clone().with_vsn(vsn),
            descriptor: Descriptor::new(name, properties),
            text,
        })
    }
}

fn enter(app: &AppInfo, stage: Stage) {
    tracing::debug!(app = %app.descriptor().display(), %stage, "stage");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::ComplianceFailure;
    use crate::error::AppError;
    use appc_core::PropertySet;
    use std::path::PathBuf;

    fn write(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    /// `<tmp>/foo` with `src/foo.app.src` and the given compiled modules.
    fn fixture(template: &str, beams: &[&str]) -> (tempfile::TempDir, PathBuf) {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("foo");
        write(&dir.join("src/foo.app.src"), template);
        for beam in beams {
            write(&dir.join("ebin").join(format!("{beam}.beam")), "");
        }
        (root, dir)
    }

    const TEMPLATE: &str = "{application, foo, [{description, \"x\"}, {vsn, \"0.1.0\"}]}.\n";

    #[test]
    fn compiles_template_into_descriptor() {
        let (_root, dir) = fixture(TEMPLATE, &["foo_a", "foo_b"]);
        let registry = Arc::new(CodePathRegistry::new());
        let compiler = Compiler::new().with_runtime(registry.clone());
        let app = AppInfo::from_template(dir.join("src/foo.app.src"));

        let compiled = compiler.compile(BuildState::new(), &app).unwrap();
        assert_eq!(compiled.outcome, Some(WriteOutcome::Written));
        assert_eq!(compiled.app.vsn(), Some("0.1.0"));
        assert!(registry.contains(&dir.join("ebin")));

        let written = loader::load(&dir.join("ebin/foo.app")).unwrap();
        let keys: Vec<&str> = written.properties.keys().map(Atom::as_str).collect();
        assert_eq!(keys, vec!["registered", "description", "vsn", "modules"]);
        assert_eq!(
            written.properties.get("modules"),
            Some(&Term::atom_list(["foo_a", "foo_b"]))
        );
    }

    #[test]
    fn second_compile_does_not_write() {
        let (_root, dir) = fixture(TEMPLATE, &["foo_a"]);
        let compiler = Compiler::new();
        let app = AppInfo::from_template(dir.join("src/foo.app.src"));

        let first = compiler.compile(BuildState::new(), &app).unwrap();
        let second = compiler.compile(first.state, &app).unwrap();
        assert_eq!(first.outcome, Some(WriteOutcome::Written));
        assert_eq!(second.outcome, Some(WriteOutcome::Unchanged));
        assert_eq!(first.app, second.app);
    }

    #[test]
    fn mismatched_name_fails_after_writing() {
        let (_root, dir) = fixture("{application, bar, [{vsn, \"1\"}]}.\n", &[]);
        let app = AppInfo::from_template(dir.join("src/foo.app.src"));
        let err = Compiler::new()
            .compile(BuildState::new(), &app)
            .unwrap_err();
        match err {
            AppError::InvalidName { name, .. } => assert_eq!(name, "bar"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(dir.join("ebin/foo.app").exists());
    }

    #[test]
    fn version_override_wins() {
        let (_root, dir) = fixture(TEMPLATE, &[]);
        let app = AppInfo::from_template(dir.join("src/foo.app.src")).with_vsn("2.0.0");
        let rendered = Compiler::new()
            .render(BuildState::new(), &app)
            .unwrap()
            .unwrap();
        assert_eq!(
            rendered.descriptor.properties.get("vsn"),
            Some(&Term::string("2.0.0"))
        );
        assert!(!dir.join("ebin/foo.app").exists());
    }

    #[test]
    fn without_template_only_validates() {
        let root = tempfile::tempdir().unwrap();
        let descriptor = root.path().join("ebin/foo.app");
        write(
            &descriptor,
            "{application, foo, [{vsn, \"3.1\"}, {modules, []}]}.\n",
        );
        let app = AppInfo::new(root.path(), &descriptor);
        let compiler = Compiler::new();

        assert!(compiler.render(BuildState::new(), &app).unwrap().is_none());
        let compiled = compiler.compile(BuildState::new(), &app).unwrap();
        assert_eq!(compiled.outcome, None);
        assert_eq!(compiled.app.vsn(), Some("3.1"));
    }

    #[test]
    fn checker_failure_aborts() {
        struct Reject;
        impl ComplianceChecker for Reject {
            fn check(&self, _: &AppInfo, _: &PropertySet) -> Result<(), ComplianceFailure> {
                Err(ComplianceFailure::new("foo", "nope"))
            }
        }

        let (_root, dir) = fixture(TEMPLATE, &[]);
        let app = AppInfo::from_template(dir.join("src/foo.app.src"));
        let compiler = Compiler::new().with_checker(Arc::new(Reject));
        assert!(matches!(
            compiler.compile(BuildState::new(), &app),
            Err(AppError::ModuleValidation(_))
        ));

        let skipping = BuildState::new().with_validate_app_modules(false);
        assert!(compiler.compile(skipping, &app).is_ok());
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::NoTemplate.to_string(), "no_template");
        assert_eq!(Stage::Failed.to_string(), "failed");
    }
}
