//! End-to-end tests for `promptforge generate`.
//!
//! These run the real binary against temporary template trees and settings
//! files, covering the classification, resolution, collection, and
//! rendering stages together.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn promptforge() -> Command {
    Command::cargo_bin("promptforge").unwrap()
}

/// Creates a prompt tree with a flat fallback template for to/project.
fn flat_template_tree(content: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("to")).unwrap();
    fs::write(temp.path().join("to/project.md"), content).unwrap();
    temp
}

#[test]
fn test_generate_renders_flat_template_to_stdout() {
    let prompts = flat_template_tree("# Task\n\n{input_text}\n\nBy {uv-author}\n");

    promptforge()
        .args(["generate", "to", "project"])
        .arg("--prompt-dir")
        .arg(prompts.path())
        .arg("--schema-dir")
        .arg(prompts.path())
        .args(["--from", "-", "--uv", "uv-author=Jane"])
        .write_stdin("piped body")
        .assert()
        .success()
        .stdout("# Task\n\npiped body\n\nBy Jane\n");
}

#[test]
fn test_generate_writes_destination_file() {
    let prompts = flat_template_tree("Target: {destination_path}\n");
    let out_dir = TempDir::new().unwrap();
    let dest = out_dir.path().join("out.md");

    promptforge()
        .args(["generate", "to", "project"])
        .arg("--prompt-dir")
        .arg(prompts.path())
        .arg("--schema-dir")
        .arg(prompts.path())
        .arg("-o")
        .arg(&dest)
        .assert()
        .success();

    let written = fs::read_to_string(&dest).unwrap();
    assert_eq!(written, format!("Target: {}\n", dest.display()));
}

#[test]
fn test_layer_qualified_template_beats_flat_fallback() {
    let prompts = flat_template_tree("flat\n");
    fs::create_dir_all(prompts.path().join("to/project")).unwrap();
    fs::write(prompts.path().join("to/project/f_project.md"), "qualified\n").unwrap();

    promptforge()
        .args(["generate", "to", "project"])
        .arg("--prompt-dir")
        .arg(prompts.path())
        .arg("--schema-dir")
        .arg(prompts.path())
        .assert()
        .success()
        .stdout("qualified\n");
}

#[test]
fn test_adaptation_selects_variant_template() {
    let prompts = flat_template_tree("flat\n");
    fs::create_dir_all(prompts.path().join("to/project")).unwrap();
    fs::write(prompts.path().join("to/project/f_project_strict.md"), "strict variant\n").unwrap();

    promptforge()
        .args(["generate", "to", "project", "-a", "strict"])
        .arg("--prompt-dir")
        .arg(prompts.path())
        .arg("--schema-dir")
        .arg(prompts.path())
        .assert()
        .success()
        .stdout("strict variant\n");
}

#[test]
fn test_unknown_directive_fails_with_suggestion() {
    let prompts = flat_template_tree("unused\n");

    promptforge()
        .args(["generate", "summry", "project"])
        .arg("--prompt-dir")
        .arg(prompts.path())
        .arg("--schema-dir")
        .arg(prompts.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown directive value 'summry'"))
        .stderr(predicate::str::contains("summary"));
}

#[test]
fn test_empty_directive_reports_empty_input() {
    let prompts = flat_template_tree("unused\n");

    promptforge()
        .args(["generate", "  ", "project"])
        .arg("--prompt-dir")
        .arg(prompts.path())
        .arg("--schema-dir")
        .arg(prompts.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("directive input is empty"));
}

#[test]
fn test_missing_template_lists_candidates() {
    let empty = TempDir::new().unwrap();

    promptforge()
        .args(["generate", "to", "issue"])
        .arg("--prompt-dir")
        .arg(empty.path())
        .arg("--schema-dir")
        .arg(empty.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no template found for to/issue"))
        .stderr(predicate::str::contains("f_issue.md"))
        .stderr(predicate::str::contains("to/issue.md"));
}

#[test]
fn test_empty_prompt_dir_setting_is_configuration_error() {
    let config_dir = TempDir::new().unwrap();
    let config = config_dir.path().join("config.toml");
    fs::write(&config, "prompt_base_dir = \"\"\n").unwrap();

    promptforge()
        .arg("--config")
        .arg(&config)
        .args(["generate", "to", "project"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("template base directory is not configured"));
}

#[test]
fn test_invalid_user_variable_name_fails_collection() {
    let prompts = flat_template_tree("body\n");

    promptforge()
        .args(["generate", "to", "project"])
        .arg("--prompt-dir")
        .arg(prompts.path())
        .arg("--schema-dir")
        .arg(prompts.path())
        .args(["--uv", "author=Jane"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lacks the 'uv-' prefix"));
}

#[test]
fn test_all_variable_errors_surface_in_one_run() {
    let prompts = flat_template_tree("body\n");

    promptforge()
        .args(["generate", "to", "project"])
        .arg("--prompt-dir")
        .arg(prompts.path())
        .arg("--schema-dir")
        .arg(prompts.path())
        .args(["--uv", "author=Jane", "--uv", "uv-empty="])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lacks the 'uv-' prefix"))
        .stderr(predicate::str::contains("empty value for variable 'uv-empty'"));
}

#[test]
fn test_settings_file_controls_patterns_and_dirs() {
    let prompts = TempDir::new().unwrap();
    fs::create_dir_all(prompts.path().join("convert")).unwrap();
    fs::write(prompts.path().join("convert/module.md"), "from settings\n").unwrap();

    let config_dir = TempDir::new().unwrap();
    let config = config_dir.path().join("config.toml");
    fs::write(
        &config,
        format!(
            r#"
directive_pattern = "^(convert)$"
layer_pattern = "^(module)$"
prompt_base_dir = "{}"
schema_base_dir = "{}"
"#,
            prompts.path().display(),
            prompts.path().display()
        ),
    )
    .unwrap();

    promptforge()
        .arg("--config")
        .arg(&config)
        .args(["generate", "convert", "module"])
        .assert()
        .success()
        .stdout("from settings\n");

    // Default tokens no longer match the configured patterns.
    promptforge()
        .arg("--config")
        .arg(&config)
        .args(["generate", "to", "project"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown directive value 'to'"));
}

#[test]
fn test_cli_dir_override_beats_settings_file() {
    let good = flat_template_tree("override wins\n");
    let config_dir = TempDir::new().unwrap();
    let config = config_dir.path().join("config.toml");
    fs::write(&config, "prompt_base_dir = \"/nonexistent\"\n").unwrap();

    promptforge()
        .arg("--config")
        .arg(&config)
        .args(["generate", "to", "project"])
        .arg("--prompt-dir")
        .arg(good.path())
        .arg("--schema-dir")
        .arg(good.path())
        .assert()
        .success()
        .stdout("override wins\n");
}

#[test]
fn test_malformed_pattern_in_settings_is_config_error() {
    let prompts = flat_template_tree("body\n");
    let config_dir = TempDir::new().unwrap();
    let config = config_dir.path().join("config.toml");
    fs::write(&config, "directive_pattern = \"^(broken\"\n").unwrap();

    promptforge()
        .arg("--config")
        .arg(&config)
        .args(["generate", "to", "project"])
        .arg("--prompt-dir")
        .arg(prompts.path())
        .arg("--schema-dir")
        .arg(prompts.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid directive pattern is configured"));
}

#[test]
fn test_schema_file_variable_when_schema_exists() {
    let prompts = flat_template_tree("Schema: {schema_file}\n");
    let schemas = TempDir::new().unwrap();
    fs::create_dir_all(schemas.path().join("to")).unwrap();
    fs::write(schemas.path().join("to/project.json"), "{}").unwrap();

    promptforge()
        .args(["generate", "to", "project"])
        .arg("--prompt-dir")
        .arg(prompts.path())
        .arg("--schema-dir")
        .arg(schemas.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema: "))
        .stdout(predicate::str::contains("to/project.json"));
}

#[test]
fn test_empty_stdin_with_dash_from_fails() {
    let prompts = flat_template_tree("{input_text}\n");

    promptforge()
        .args(["generate", "to", "project", "--from", "-"])
        .arg("--prompt-dir")
        .arg(prompts.path())
        .arg("--schema-dir")
        .arg(prompts.path())
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("stdin"));
}
