//! End to end runs of the dfagen binary

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const TEMPLATE: &str = include_str!("../../template/tests/fixtures/template.json");

/// Isolated directory with a template and a config
struct TestContext {
    dir: TempDir,
}

impl TestContext {
    fn new(config_name: &str, config: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory for tests");
        fs::write(dir.path().join("template.json"), TEMPLATE).expect("Failed to write template");
        fs::write(dir.path().join(config_name), config).expect("Failed to write config");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn cli(&self, config_name: &str) -> Command {
        let mut cmd = Command::cargo_bin("dfagen").expect("Failed to locate dfagen binary");
        cmd.arg("-t")
            .arg(self.path("template.json"))
            .arg("-c")
            .arg(self.path(config_name))
            .env_remove("RUST_LOG");
        cmd
    }
}

fn parse(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("Output must be JSON")
}

#[test]
fn test_generate_from_json_config() {
    let ctx = TestContext::new(
        "config.json",
        r#"{
            "Manager": {"CustomTags": {"team": "core"}},
            "Workers": [
                {"Name": "Infra", "Labels": ["role=infra"]},
                {"Name": "Apps", "AfterDaemonStarted": ["echo ready\n"]}
            ]
        }"#,
    );

    let output = ctx
        .cli("config.json")
        .assert()
        .success()
        .stderr(predicate::str::contains("InfraWorkerAsg"))
        .stderr(predicate::str::contains("AppsWorkerAsg"))
        .get_output()
        .stdout
        .clone();

    let document = parse(&output);

    assert_eq!(document["Parameters"]["InfraWorkerSize"]["Default"], "5");
    assert_eq!(
        document["Resources"]["AppsWorkerAsg"]["Properties"]["DesiredCapacity"]["Ref"],
        "AppsWorkerSize"
    );
    assert_eq!(
        document["Resources"]["ManagerAsg"]["Properties"]["Tags"][0]["Key"],
        "team"
    );
}

#[test]
fn test_output_keeps_key_order_and_indent() {
    let ctx = TestContext::new("config.json", r#"{"Workers": []}"#);

    let output = ctx.cli("config.json").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();

    assert!(text.starts_with("{\n  \"AWSTemplateFormatVersion\": \"2010-09-09\",\n  \"Description\""));
    assert_eq!(parse(text.as_bytes()), serde_json::from_str::<Value>(TEMPLATE).unwrap());
}

#[test]
fn test_generate_from_toml_config() {
    let ctx = TestContext::new(
        "config.toml",
        r#"
            [[Workers]]
            Name = "Gpu"
            Labels = ["gpu=true"]

            [Workers.CustomTags]
            team = "ml"
        "#,
    );

    let output = ctx.cli("config.toml").assert().success().get_output().stdout.clone();
    let document = parse(&output);

    assert_eq!(
        document["Resources"]["GpuWorkerAsg"]["Properties"]["Tags"][0]["Value"],
        "ml"
    );
    assert!(document["Resources"]["GpuWorkerLaunchConfig17050ceaws1"].is_object());
}

#[test]
fn test_output_file() {
    let ctx = TestContext::new("config.json", r#"{"Workers": [{"Name": "Infra"}]}"#);
    let out = ctx.path("out.json");

    ctx.cli("config.json")
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let document: Value = serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
    assert!(document["Resources"]["InfraWorkerAsg"].is_object());
}

#[test]
fn test_worker_without_name_fails() {
    let ctx = TestContext::new("config.json", r#"{"Workers": [{"Labels": ["a=b"]}]}"#);

    ctx.cli("config.json")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("A Name must be provided"));
}

#[test]
fn test_missing_template_file_fails() {
    let ctx = TestContext::new("config.json", "{}");

    Command::cargo_bin("dfagen")
        .unwrap()
        .arg("-t")
        .arg(ctx.path("missing.json"))
        .arg("-c")
        .arg(ctx.path("config.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read template"));
}

#[test]
fn test_invalid_config_fails() {
    let ctx = TestContext::new("config.json", "{\"Workers\": ");

    ctx.cli("config.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Couldn't parse config file"));
}

#[test]
fn test_missing_arguments() {
    Command::cargo_bin("dfagen")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--template"));
}
