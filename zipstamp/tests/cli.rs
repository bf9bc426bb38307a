//! Integration tests for the zipstamp binary.

use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("zipstamp"));
    cmd.env_remove("ZIPSTAMP_OUTPUT_DIR").env_remove("RUST_LOG");
    cmd
}

fn zip_names(path: &std::path::Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

#[test]
fn no_arguments_exits_with_one() {
    cli().assert().code(1).stderr(contains("Usage"));
}

#[test]
fn missing_input_exits_with_one() {
    cli()
        .args(["-o", "output_file"])
        .assert()
        .code(1)
        .stderr(contains("--input"));
}

#[test]
fn help_exits_cleanly() {
    cli().arg("--help").assert().success().stdout(contains("-i, --input"));
}

#[test]
fn backs_up_directory() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let input = tmp.path().join("test_dir");
    fs::create_dir_all(input.join("nested"))?;
    fs::write(input.join("top.txt"), "top")?;
    fs::write(input.join("nested").join("deep.txt"), "deep")?;
    let out_dir = tmp.path().join("out");
    fs::create_dir(&out_dir)?;

    let assert = cli()
        .args(["-i", input.to_str().unwrap(), "-o", out_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Backing up"))
        .stdout(contains("Complete."));

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let archive = PathBuf::from(stdout.lines().last().unwrap());
    assert!(archive.is_file());
    assert_eq!(archive.parent().unwrap(), out_dir);
    assert!(
        archive
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("test_dir_")
    );
    assert_eq!(zip_names(&archive), vec!["nested/deep.txt", "top.txt"]);

    Ok(())
}

#[test]
fn output_dir_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let input = tmp.path().join("single.txt");
    fs::write(&input, "one file")?;
    let out_dir = tmp.path().join("env_out");
    fs::create_dir(&out_dir)?;

    cli()
        .env("ZIPSTAMP_OUTPUT_DIR", &out_dir)
        .args(["-i", input.to_str().unwrap()])
        .assert()
        .success();

    let archives: Vec<_> = fs::read_dir(&out_dir)?.collect::<Result<_, _>>()?;
    assert_eq!(archives.len(), 1);
    assert_eq!(zip_names(&archives[0].path()), vec!["single.txt"]);

    Ok(())
}

#[test]
fn json_output() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let input = tmp.path().join("data");
    fs::create_dir(&input)?;
    fs::write(input.join("a"), "x")?;

    let assert = cli()
        .args(["-i", input.to_str().unwrap(), "--json"])
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(value["success"], true);
    assert_eq!(value["entries"], 1);
    let archive = PathBuf::from(value["archive"].as_str().unwrap());
    assert_eq!(archive.parent().unwrap(), tmp.path());
    assert!(archive.is_file());

    Ok(())
}

#[test]
fn missing_input_path_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;

    cli()
        .args(["-i", tmp.path().join("does_not_exist").to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(contains("does not exist"));

    Ok(())
}

#[test]
fn verbose_logs_resolved_target() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    let input = tmp.path().join("logged.txt");
    fs::write(&input, "x")?;

    cli()
        .args(["-v", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stderr(contains("resolved backup target"));

    Ok(())
}
