use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;
use serde_json::json;
use tempfile::TempDir;

const APPS: &str = r#"[
  {"name": "single", "spyName": "unknown"},
  {"name": "double.cpu", "spyName": "rbspy"},
  {"name": "double.space", "spyName": "gospy"},
  {"name": "triple.app.cpu", "spyName": "javaspy"},
  {"name": "triple.app.objects", "spyName": "javaspy"},
  {"name": "singlesingle", "spyName": "rbspy"}
]"#;

fn write_apps(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("apps.json");
    std::fs::write(&path, APPS)?;
    Ok(path)
}

fn appsel() -> Result<assert_cmd::Command> {
    let mut cmd = assert_cmd::Command::cargo_bin("appsel")?;
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

fn list_stdout(args: &[&str]) -> Result<String> {
    let dir = TempDir::new()?;
    let apps = write_apps(dir.path())?;

    let output = appsel()?
        .arg("list")
        .arg("--apps")
        .arg(&apps)
        .args(args)
        .output()?;
    assert!(output.status.success(), "{output:?}");
    Ok(String::from_utf8(output.stdout)?)
}

#[test]
fn list_groups_by_key() -> Result<()> {
    assert_eq!(
        list_stdout(&[])?,
        "single\n\
         double/ (2)\n  double.cpu\n  double.space\n\
         triple.app/ (2)\n  triple.app.cpu\n  triple.app.objects\n\
         singlesingle\n"
    );
    Ok(())
}

#[test]
fn query_keeps_matching_group() -> Result<()> {
    assert_eq!(
        list_stdout(&["--query", "triple.app"])?,
        "triple.app/ (2)\n  triple.app.cpu\n  triple.app.objects\n"
    );
    Ok(())
}

#[test]
fn spy_filter_flattens_partial_groups() -> Result<()> {
    assert_eq!(
        list_stdout(&["--spy", "rbspy"])?,
        "double.cpu\nsinglesingle\n"
    );
    Ok(())
}

#[test]
fn profile_type_filter_flattens_each_group() -> Result<()> {
    assert_eq!(
        list_stdout(&["--profile-type", "cpu"])?,
        "double.cpu\ntriple.app.cpu\n"
    );
    Ok(())
}

#[test]
fn spy_and_profile_type_combine() -> Result<()> {
    assert_eq!(
        list_stdout(&["--spy", "rbspy", "--profile-type", "cpu"])?,
        "double.cpu\n"
    );
    Ok(())
}

#[test]
fn case_sensitive_query_can_match_nothing() -> Result<()> {
    assert_eq!(list_stdout(&["--query", "TRIPLE"])?.lines().count(), 3);
    assert_eq!(
        list_stdout(&["--query", "TRIPLE", "--case-sensitive"])?,
        "No applications match.\n"
    );
    Ok(())
}

#[test]
fn json_output_nests_children() -> Result<()> {
    let stdout = list_stdout(&["--spy", "javaspy", "--json"])?;
    let parsed: JsonValue = serde_json::from_str(&stdout)?;

    assert_eq!(
        parsed,
        json!([
            {
                "kind": "group",
                "name": "triple.app",
                "children": [
                    {
                        "kind": "leaf",
                        "name": "triple.app.cpu",
                        "descriptor": {"name": "triple.app.cpu", "spyName": "javaspy", "units": "unknown"}
                    },
                    {
                        "kind": "leaf",
                        "name": "triple.app.objects",
                        "descriptor": {"name": "triple.app.objects", "spyName": "javaspy", "units": "unknown"}
                    }
                ]
            }
        ])
    );
    Ok(())
}

#[test]
fn config_file_seeds_the_selection() -> Result<()> {
    let dir = TempDir::new()?;
    let apps = write_apps(dir.path())?;
    let config = dir.path().join("appsel.toml");
    std::fs::write(&config, "source_kind = \"javaspy\"\n")?;

    appsel()?
        .args(["--config"])
        .arg(&config)
        .arg("list")
        .arg("--apps")
        .arg(&apps)
        .assert()
        .success()
        .stdout("triple.app/ (2)\n  triple.app.cpu\n  triple.app.objects\n");

    // The command line wins over the file.
    appsel()?
        .arg("--config")
        .arg(&config)
        .arg("list")
        .arg("--apps")
        .arg(&apps)
        .args(["--spy", "gospy"])
        .assert()
        .success()
        .stdout("double.space\n");
    Ok(())
}

#[test]
fn unknown_config_key_is_reported() -> Result<()> {
    let dir = TempDir::new()?;
    let apps = write_apps(dir.path())?;
    let config = dir.path().join("appsel.toml");
    std::fs::write(&config, "colour = \"blue\"\n")?;

    appsel()?
        .arg("--config")
        .arg(&config)
        .arg("list")
        .arg("--apps")
        .arg(&apps)
        .assert()
        .failure()
        .stderr(contains("failed to load config"));
    Ok(())
}

#[test]
fn missing_apps_file_fails_with_context() -> Result<()> {
    let dir = TempDir::new()?;

    appsel()?
        .arg("list")
        .arg("--apps")
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(contains("failed to read applications from").and(contains("missing.json")));
    Ok(())
}

#[test]
fn empty_name_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let apps = dir.path().join("apps.json");
    std::fs::write(&apps, r#"[{"name": "ok", "spyName": "rbspy"}, {"name": "", "spyName": "rbspy"}]"#)?;

    appsel()?
        .arg("list")
        .arg("--apps")
        .arg(&apps)
        .assert()
        .failure()
        .stderr(contains("empty name"));
    Ok(())
}

#[test]
fn absent_spy_is_warned_about() -> Result<()> {
    let dir = TempDir::new()?;
    let apps = write_apps(dir.path())?;

    appsel()?
        .arg("list")
        .arg("--apps")
        .arg(&apps)
        .args(["--spy", "pyspy", "--profile-type", "objects"])
        .assert()
        .success()
        .stdout("No applications match.\n")
        .stderr(
            contains("no application in the inventory uses source kind pyspy")
                .and(contains("has profile type objects").not()),
        );
    Ok(())
}
