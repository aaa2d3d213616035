//! E2E failure-path tests for the `bsync` binary.
//!
//! These run the binary in an isolated temp directory with no network:
//! every asserted failure happens before the first tracker call, so the
//! tests stay hermetic. Exit code is 1 and the message lands on stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the bsync binary, rooted in `dir`.
fn bsync_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bsync"));
    cmd.current_dir(dir);
    // Keep the host environment from leaking a real token into tests.
    cmd.env_remove("GITHUB_TOKEN");
    cmd.env("BOARDSYNC_LOG", "error");
    cmd
}

/// Lay out a complete project: config, dirs, manifest.
fn scaffold(dir: &Path) {
    fs::write(
        dir.join("boardsync.toml"),
        "owner = \"acme\"\nrepo = \"shop\"\n",
    )
    .expect("write config");
    fs::create_dir(dir.join("epics")).expect("mkdir epics");
    fs::create_dir(dir.join("stories")).expect("mkdir stories");
    fs::write(dir.join("priorities.txt"), "").expect("write manifest");
}

fn write_epic(dir: &Path, name: &str, title: &str, label: &str) {
    fs::write(
        dir.join("epics").join(name),
        format!("---\ntitle: {title}\nlabel: {label}\n---\nBody.\n"),
    )
    .expect("write epic");
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[test]
fn missing_owner_fails_with_configuration_error() {
    let dir = TempDir::new().expect("tempdir");

    bsync_cmd(dir.path())
        .env("GITHUB_TOKEN", "tok")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing required setting 'owner'"));
}

#[test]
fn missing_token_fails_with_configuration_error() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());

    bsync_cmd(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn missing_epics_dir_fails_before_any_network() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("boardsync.toml"),
        "owner = \"acme\"\nrepo = \"shop\"\n",
    )
    .expect("write config");

    bsync_cmd(dir.path())
        .env("GITHUB_TOKEN", "tok")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("epics directory not found"));
}

#[test]
fn malformed_config_file_fails() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("boardsync.toml"), "owner = [oops").expect("write config");

    bsync_cmd(dir.path())
        .env("GITHUB_TOKEN", "tok")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn flags_override_config_file() {
    let dir = TempDir::new().expect("tempdir");
    // Config names no owner; the flag supplies it, so the failure moves
    // past configuration to the missing data paths.
    fs::write(dir.path().join("boardsync.toml"), "repo = \"shop\"\n").expect("write config");

    bsync_cmd(dir.path())
        .env("GITHUB_TOKEN", "tok")
        .args(["--owner", "acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("epics directory not found"));
}

// ---------------------------------------------------------------------------
// Record errors
// ---------------------------------------------------------------------------

#[test]
fn story_referencing_unknown_epic_fails_with_its_filename() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    write_epic(dir.path(), "001-checkout.md", "Checkout", "backend");
    fs::write(
        dir.path().join("stories").join("009-001-ghost.md"),
        "---\ntitle: Ghost\n---\nOrphan story.\n",
    )
    .expect("write story");

    bsync_cmd(dir.path())
        .env("GITHUB_TOKEN", "tok")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("009-001-ghost.md"))
        .stderr(predicate::str::contains("unknown epic '009'"));
}

#[test]
fn epic_without_title_fails_with_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::write(
        dir.path().join("epics").join("001-checkout.md"),
        "---\nlabel: backend\n---\nNo title here.\n",
    )
    .expect("write epic");

    bsync_cmd(dir.path())
        .env("GITHUB_TOKEN", "tok")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("001-checkout.md"))
        .stderr(predicate::str::contains("'title'"));
}

#[test]
fn badly_named_markdown_file_fails_with_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::write(
        dir.path().join("epics").join("checkout.md"),
        "---\ntitle: Checkout\nlabel: backend\n---\n",
    )
    .expect("write epic");

    bsync_cmd(dir.path())
        .env("GITHUB_TOKEN", "tok")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("checkout.md"));
}

#[test]
fn help_documents_the_single_run_surface() {
    let dir = TempDir::new().expect("tempdir");

    bsync_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--epics-dir"))
        .stdout(predicate::str::contains("--priority-file"));
}
