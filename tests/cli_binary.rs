//! End-to-end checks of the `ionosctl` binary.

use assert_cmd::Command;
use predicates::prelude::*;

/// `ionosctl` isolated from the caller's credentials and config file
fn ionosctl(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ionosctl").unwrap();
    cmd.env_remove("IONOS_TOKEN")
        .env_remove("IONOS_USERNAME")
        .env_remove("IONOS_PASSWORD")
        .env_remove("IONOS_API_URL")
        .env("IONOS_CONFIG_FILE", dir.path().join("config.json"));
    cmd
}

#[test]
fn version_flag_works() {
    let dir = tempfile::tempdir().unwrap();
    ionosctl(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ionosctl"));
}

#[test]
fn missing_required_flag_fails_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    ionosctl(&dir)
        .args(["cdn", "distribution", "get"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "command 'cdn.distribution.get' requires flag(s): --distribution-id",
        ));
}

#[test]
fn unauthenticated_list_explains_how_to_log_in() {
    let dir = tempfile::tempdir().unwrap();
    ionosctl(&dir)
        .args(["datacenter", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ionosctl config login"));
}

#[test]
fn config_path_follows_environment() {
    let dir = tempfile::tempdir().unwrap();
    let expected = dir.path().join("config.json");
    ionosctl(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
}

#[test]
fn completion_script_for_bash() {
    let dir = tempfile::tempdir().unwrap();
    ionosctl(&dir)
        .args(["completion", "script", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_ionosctl()"));
}

#[test]
fn completion_ids_print_nothing_without_credentials() {
    let dir = tempfile::tempdir().unwrap();
    ionosctl(&dir)
        .args(["completion", "ids", "datacenters"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    ionosctl(&dir)
        .args(["cdn", "nonsense"])
        .assert()
        .failure()
        .code(2);
}
