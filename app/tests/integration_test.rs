use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;

/// Compiler name that is guaranteed not to exist.
const MISSING_CODON: &str = "turbox-test-no-such-codon";

fn turbox_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("turbox");
    cmd.env("TURBOX_COLORIZE", "never").env_remove("TURBOX_CODON").env_remove("TURBOX_LOG_LEVEL");
    cmd
}

/// Copy a demo into a fresh directory so that generated files do not end up in the repository.
fn demo_copy(name: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join(name);
    std::fs::copy(Path::new("../demos").join(name), &target).unwrap();
    (dir, target)
}

fn stdout_of(cmd: &mut Command) -> (bool, String, String) {
    let output = cmd.output().unwrap();
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

/// Check that "turbox --version" works correctly
#[test]
fn version_command() {
    let assert = turbox_cmd().arg("--version").assert();
    assert.success().stdout("turbox 0.1.0\n");
}

/// Check that "turbox check" lists the routes of a valid application
#[test]
fn check_command() {
    let assert = turbox_cmd().args(["check", "../demos/hello.py"]).assert();
    assert.success().stdout(
        "Found 3 route(s):\n  [GET] / -> index (line 6)\n  [GET] /ping -> ping (line 11)\n  [POST] /echo -> echo (line 16)\n../demos/hello.py passed validation\n",
    );
}

#[test]
fn check_resolves_computed_routes() {
    let (ok, stdout, stderr) = stdout_of(turbox_cmd().args(["check", "../demos/computed_routes.py"]));
    assert!(ok, "{stderr}");
    assert!(stdout.contains("Found 5 route(s):"), "{stdout}");
    assert!(stdout.contains("[GET] /api/v1/posts -> list_posts"), "{stdout}");
    assert!(stdout.contains("[GET] /api/v1/comments -> list_comments"), "{stdout}");
    assert!(stdout.contains("[GET] /api/health -> api_health"), "{stdout}");
    assert!(!stdout.contains("skipped"), "{stdout}");
    assert!(stderr.contains("Route of handler 'skipped' has a path that cannot be resolved"), "{stderr}");
}

#[test]
fn check_reports_every_contract_violation() {
    let (ok, _, stderr) = stdout_of(turbox_cmd().args(["check", "../demos/invalid.py"]));
    assert!(!ok);
    for expected in [
        "Unsupported import: json",
        "Handler 'add' must accept exactly one parameter (request)",
        "Handler 'count' must return 'str', got 'int'",
        "Handler 'count' returns non-string value: int",
        "Handler 'nothing' has no return statement",
        "Async functions not supported: later",
    ] {
        assert!(stderr.contains(expected), "missing {expected:?} in\n{stderr}");
    }
}

#[test]
fn check_missing_file() {
    let (ok, _, stderr) = stdout_of(turbox_cmd().args(["check", "../demos/missing.py"]));
    assert!(!ok);
    assert!(stderr.contains("File ../demos/missing.py not found"), "{stderr}");
}

#[test]
fn build_emit_only_writes_program() {
    let (dir, app) = demo_copy("http_methods.py");
    let (ok, stdout, stderr) = stdout_of(
        turbox_cmd()
            .args(["build", "--emit-only", "--port", "9000", "--codon", MISSING_CODON])
            .arg(&app),
    );
    assert!(ok, "{stderr}");

    let generated = dir.path().join("http_methods_generated.codon");
    assert!(stdout.contains(&format!("Generated: {}", generated.display())), "{stdout}");
    let program = std::fs::read_to_string(&generated).unwrap();
    assert!(program.starts_with("# Generated by TurboX from http_methods.py"));
    assert!(program.contains("app = TurboX(\"127.0.0.1\", 9000)"));
    assert!(program.contains("app.routes[\"POST:/items\"] = items"));
    assert!(program.contains("app.routes[\"OPTIONS:/status\"] = status_options"));
    assert!(program.contains("app.routes[\"GET:/status\"] = status"));
    assert!(program.trim_end().ends_with("app.run()"));
    assert!(!dir.path().join("http_methods").exists());
}

#[test]
fn build_without_compiler_fails() {
    let (dir, app) = demo_copy("hello.py");
    let (ok, _, stderr) = stdout_of(turbox_cmd().env("TURBOX_CODON", MISSING_CODON).arg("build").arg(&app));
    assert!(!ok);
    assert!(stderr.contains(&format!("Codon compiler not found: {MISSING_CODON}")), "{stderr}");
    assert!(!dir.path().join("hello_generated.codon").exists());
}

#[test]
fn build_without_routes_fails() {
    let (dir, app) = demo_copy("no_routes.py");
    let (ok, _, stderr) = stdout_of(turbox_cmd().args(["build", "--emit-only"]).arg(&app));
    assert!(!ok);
    assert!(stderr.contains("No routes found"), "{stderr}");
    assert!(!dir.path().join("no_routes_generated.codon").exists());
}

#[test]
fn build_with_validation_errors_writes_nothing() {
    let (dir, app) = demo_copy("invalid.py");
    let (ok, _, _) = stdout_of(turbox_cmd().args(["build", "--emit-only"]).arg(&app));
    assert!(!ok);
    assert!(!dir.path().join("invalid_generated.codon").exists());
}

#[test]
fn completions() {
    let (ok, stdout, _) = stdout_of(turbox_cmd().args(["generate-completion", "bash"]));
    assert!(ok);
    assert!(stdout.contains("turbox"));
}
