//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("folio")
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

#[test]
fn test_cli_extract_file_input() {
    cmd()
        .args(["extract", &get_fixture_path("book_long_description.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: The Hitchhiker's Guide to the Galaxy"))
        .stdout(predicate::str::contains("Authors: Douglas Adams, Stephen Fry (Narrator)"));
}

#[test]
fn test_cli_extract_stdin_input() {
    let html = std::fs::read_to_string(get_fixture_path("book_short_description.html")).unwrap();
    cmd()
        .args(["extract", "-"])
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Nevermore"));
}

#[test]
fn test_cli_extract_json_format() {
    let output = cmd()
        .args(["extract", "-f", "json", &get_fixture_path("book_long_description.html")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "The Hitchhiker's Guide to the Galaxy");
    assert_eq!(json["num_ratings"], "1349402");
    assert_eq!(json["genres"], serde_json::json!(["Science Fiction", "Fiction", "Humor"]));
}

#[test]
fn test_cli_extract_missing_title_fails() {
    cmd()
        .args(["extract", &get_fixture_path("book_missing_title.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing book title"));
}

#[test]
fn test_cli_extract_nonexistent_file() {
    cmd()
        .args(["extract", "/nonexistent/book.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_cli_extract_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("book.json");

    cmd()
        .args(["extract", "-f", "json", "--pretty", "-o", output.to_str().unwrap()])
        .arg(get_fixture_path("book_short_description.html"))
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"title\": \"Nevermore\""));
}

#[test]
fn test_cli_invalid_format() {
    cmd()
        .args(["extract", "-f", "yaml", &get_fixture_path("book_short_description.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn test_cli_links() {
    cmd()
        .args(["links", &get_fixture_path("list_page.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://www.goodreads.com/book/show/2767052-the-hunger-games",
        ))
        .stdout(predicate::str::contains("https://www.goodreads.com/book/show/2657.To_Kill_a_Mockingbird"));
}

#[test]
fn test_cli_links_custom_site_root() {
    cmd()
        .args(["links", "--site-root", "https://books.example.org"])
        .arg(get_fixture_path("list_page.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("https://books.example.org/book/show/2657.To_Kill_a_Mockingbird"));
}

#[test]
fn test_cli_search_is_case_insensitive() {
    cmd()
        .args(["search", "--books", &get_fixture_path("books.tsv"), "HITCH"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The Hitchhiker's Guide to the Galaxy"))
        .stdout(predicate::str::contains("Hitch Hiking Tales"))
        .stdout(predicate::str::contains("Dune").not());
}

#[test]
fn test_cli_search_limit() {
    let output = cmd()
        .args(["search", "--books", &get_fixture_path("books.tsv"), "--limit", "1", "hitch"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["The Hitchhiker's Guide to the Galaxy"]);
}

#[test]
fn test_cli_recommend() {
    let output = cmd()
        .args([
            "recommend",
            "--books",
            &get_fixture_path("books.tsv"),
            "--similarity",
            &get_fixture_path("similarity.csv"),
            "The Hitchhiker's Guide to the Galaxy",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec![
            "The Restaurant at the End of the Universe",
            "Dune",
            "Hitch Hiking Tales",
            "Pride and Prejudice"
        ]
    );
}

#[test]
fn test_cli_recommend_count_and_json() {
    let output = cmd()
        .args([
            "recommend",
            "--books",
            &get_fixture_path("books.tsv"),
            "--similarity",
            &get_fixture_path("similarity.csv"),
            "-n",
            "2",
            "-f",
            "json",
            "Dune",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let titles: Vec<&str> = json.as_array().unwrap().iter().map(|b| b["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["The Hitchhiker's Guide to the Galaxy", "The Restaurant at the End of the Universe"]);
}

#[test]
fn test_cli_recommend_unknown_title_fails() {
    cmd()
        .args([
            "recommend",
            "--books",
            &get_fixture_path("books.tsv"),
            "--similarity",
            &get_fixture_path("similarity.csv"),
            "Not A Real Book",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title not found"));
}

#[test]
fn test_cli_crawl_rejects_inverted_range() {
    let tmp = TempDir::new().unwrap();

    cmd()
        .args(["crawl", "--start", "5", "--end", "2", "-o", tmp.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid crawl configuration"));
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-v", "extract", &get_fixture_path("book_short_description.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Folio"))
        .stderr(predicate::str::contains("Missing fields"));
}

#[test]
fn test_cli_completions() {
    cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"));
}

#[test]
fn test_cli_completions_use_kebab_case_flags() {
    cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--delay-ms"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--user-agent"))
        .stdout(predicate::str::contains("--delay_ms").not())
        .stdout(predicate::str::contains("--user_agent").not());
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("recommend"));
}

#[test]
fn test_cli_version() {
    cmd().arg("--version").assert().success().stdout(predicate::str::contains("folio"));
}
