//! Integration tests for the BookCraft CLI

use assert_cmd::Command;
use bookcraft_core::BookProject;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn sample_project() -> BookProject {
    BookProject::new("The Arden Saga", 50, 5)
        .with_outline("<h2>Chapter 1: Dawn</h2>\n<h2>Chapter 2: Dusk</h2>")
        .with_chapter(
            1,
            format!(
                "Here is your chapter:\n# Chapter 1: Dawn\n\nThe sun rose over *Arden*.\n\n{}",
                "word ".repeat(290)
            ),
        )
}

/// Write a project file for testing
fn create_test_project(dir: &TempDir, name: &str, project: &BookProject) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(project).unwrap())
        .expect("Failed to write test project");
    path
}

fn cli() -> Command {
    Command::cargo_bin("bookcraft-cli").unwrap()
}

#[test]
fn test_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("toc"))
        .stdout(predicate::str::contains("normalize"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn test_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bookcraft"));
}

#[test]
fn test_export_help() {
    cli()
        .args(["export", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Export a project"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--entitled"));
}

#[test]
fn test_export_missing_format() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_project(&temp_dir, "book.json", &sample_project());

    cli()
        .args(["export", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--format"));
}

#[test]
fn test_export_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_project(&temp_dir, "book.json", &sample_project());

    cli()
        .args(["export", input.to_str().unwrap(), "--format", "epub"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported export format"));
}

#[test]
fn test_export_nonexistent_file() {
    cli()
        .args(["export", "/nonexistent/book.json", "--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load project"));
}

#[test]
fn test_export_malformed_project() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("broken.json");
    fs::write(&input, "{ not json").unwrap();

    cli()
        .args(["export", input.to_str().unwrap(), "--format", "html"])
        .assert()
        .failure();
}

#[test]
fn test_export_pdf() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_project(&temp_dir, "book.json", &sample_project());
    let output = temp_dir.path().join("book.pdf");

    cli()
        .args([
            "export",
            input.to_str().unwrap(),
            "--format",
            "pdf",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_export_docx_watermark_follows_entitlement() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_project(&temp_dir, "book.json", &sample_project());
    let free = temp_dir.path().join("free.docx");
    let paid = temp_dir.path().join("paid.docx");

    for (output, entitled) in [(&free, false), (&paid, true)] {
        let mut cmd = cli();
        cmd.args([
            "export",
            input.to_str().unwrap(),
            "--format",
            "docx",
            "--output",
            output.to_str().unwrap(),
            "--date",
            "2024-03-09",
        ]);
        if entitled {
            cmd.arg("--entitled");
        }
        cmd.assert().success();
    }

    let free = zip::ZipArchive::new(fs::File::open(&free).unwrap()).unwrap();
    assert!(free.file_names().any(|n| n == "word/footer1.xml"));
    let paid = zip::ZipArchive::new(fs::File::open(&paid).unwrap()).unwrap();
    assert!(!paid.file_names().any(|n| n.starts_with("word/footer")));
}

#[test]
fn test_export_bad_date() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_project(&temp_dir, "book.json", &sample_project());

    cli()
        .args([
            "export",
            input.to_str().unwrap(),
            "--format",
            "html",
            "--date",
            "March 9",
        ])
        .assert()
        .failure();
}

#[test]
fn test_toc_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_project(&temp_dir, "book.json", &sample_project());

    let output = cli()
        .args(["toc", input.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let toc: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let pages: Vec<u64> = toc
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["estimated_page"].as_u64().unwrap())
        .collect();
    assert_eq!(pages, vec![3, 4, 14, 24, 34]);
    assert_eq!(toc[0]["title"], "Dawn");
    assert_eq!(toc[1]["title"], "Dusk");
    assert_eq!(toc[2]["title"], "Chapter 3");
}

#[test]
fn test_toc_text() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_project(&temp_dir, "book.json", &sample_project());

    cli()
        .args(["toc", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dawn ....."))
        .stdout(predicate::str::contains("*Chapter 5"))
        .stdout(predicate::str::contains("not generated yet"));
}

#[test]
fn test_normalize_chapter() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_project(&temp_dir, "book.json", &sample_project());

    cli()
        .args(["normalize", input.to_str().unwrap(), "--chapter", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<h3>Chapter 1: Dawn</h3>"))
        .stdout(predicate::str::contains("<strong>Arden</strong>"))
        .stdout(predicate::str::contains("Here is your chapter").not())
        .stdout(predicate::str::contains("*").not());
}

#[test]
fn test_normalize_missing_chapter() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_project(&temp_dir, "book.json", &sample_project());

    cli()
        .args(["normalize", input.to_str().unwrap(), "--chapter", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not been generated"));

    cli()
        .args(["normalize", input.to_str().unwrap(), "--chapter", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_batch_missing_output_dir() {
    cli()
        .args(["batch", "/some/input/dir", "--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output-dir"));
}

#[test]
fn test_batch_invalid_jobs() {
    cli()
        .args([
            "batch",
            "/some/input/dir",
            "--output-dir",
            "/some/output/dir",
            "--format",
            "pdf",
            "--jobs",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_batch_export() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    create_test_project(&input_dir, "first.json", &sample_project());
    create_test_project(&input_dir, "second.json", &BookProject::new("Second", 20, 2));
    fs::write(input_dir.path().join("notes.txt"), "ignored").unwrap();

    cli()
        .args([
            "batch",
            input_dir.path().to_str().unwrap(),
            "--output-dir",
            output_dir.path().to_str().unwrap(),
            "--format",
            "html",
            "--jobs",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 projects"))
        .stdout(predicate::str::contains("Success: 2"));

    assert!(output_dir.path().join("first.html").exists());
    assert!(output_dir.path().join("second.html").exists());
}

#[test]
fn test_batch_reports_failures() {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    fs::write(input_dir.path().join("broken.json"), "[]").unwrap();

    cli()
        .args([
            "batch",
            input_dir.path().to_str().unwrap(),
            "--output-dir",
            output_dir.path().to_str().unwrap(),
            "--format",
            "docx",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Errors:  1"));
}
