use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A `ghstats` invocation isolated from the caller's token, config and log settings.
fn ghstats(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ghstats").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("GITHUB_TOKEN")
        .env_remove("GHSTATS_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

async fn mock_github() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "octo" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "app", "full_name": "octo/app", "private": false }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/app/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "sha": "aaa",
                "commit": {
                    "author": { "name": "Octo", "email": "octo@example.com", "date": "2024-01-01T09:00:00Z" },
                    "message": "first"
                }
            },
            {
                "sha": "bbb",
                "commit": {
                    "author": { "name": "Octo", "email": "octo@example.com", "date": "2024-01-03T18:00:00Z" },
                    "message": "second"
                }
            }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/app/commits/aaa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stats": { "additions": 100, "deletions": 20, "total": 120 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/app/commits/bbb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stats": { "additions": 5, "deletions": 15, "total": 20 }
        })))
        .mount(&server)
        .await;
    server
}

#[test]
fn missing_token_prints_guidance() {
    let dir = tempdir().unwrap();
    ghstats(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("GitHub authentication failed"))
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".ghstatsrc.json"),
        r#"{"defaultOutput": "xml"}"#,
    )
    .unwrap();

    ghstats(dir.path())
        .env("GITHUB_TOKEN", "abc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid output format: xml"));
}

#[test]
fn unknown_output_format_is_rejected() {
    let dir = tempdir().unwrap();
    ghstats(dir.path())
        .args(["--output", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("yaml"));
}

#[tokio::test(flavor = "multi_thread")]
async fn json_report_from_mocked_api() {
    let server = mock_github().await;
    let dir = tempdir().unwrap();

    let mut cmd = ghstats(dir.path());
    cmd.env("GITHUB_TOKEN", "abc")
        .args(["--api-url", &server.uri()])
        .args(["--since", "2024-01-01", "--until", "2024-01-03", "--output", "json"]);
    let out = run(cmd).await;
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let v: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["user"], "octo");
    assert_eq!(v["period"]["start"], "2024-01-01");
    assert_eq!(v["period"]["end"], "2024-01-03");
    assert_eq!(v["summary"]["total_additions"], 105);
    assert_eq!(v["summary"]["total_deletions"], 35);
    assert_eq!(v["summary"]["net_change"], 70);
    assert_eq!(v["summary"]["active_days"], 2);
    assert_eq!(v["summary"]["avg_lines_per_day"], 70);

    let days = v["daily_stats"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[1]["commits"], 0);
    assert_eq!(days[2]["net"], -10);
    assert_eq!(v["repositories"][0]["name"], "octo/app");
    assert_eq!(v["repositories"][0]["commits"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn report_written_to_file() {
    let server = mock_github().await;
    let dir = tempdir().unwrap();
    let target = dir.path().join("stats.csv");

    let mut cmd = ghstats(dir.path());
    cmd.env("GITHUB_TOKEN", "abc")
        .env("GHSTATS_API_URL", server.uri())
        .args(["--since", "2024-01-01", "--until", "2024-01-03", "-o", "csv", "-f"])
        .arg(&target);
    let out = run(cmd).await;
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Output written to"));

    let csv = fs::read_to_string(&target).unwrap();
    assert!(csv.starts_with("# Summary"));
    assert!(csv.contains("date,additions,deletions,net_change,commits"));
    assert!(csv.contains("2024-01-02,0,0,0,0"));
    assert!(!csv.contains('\u{1b}'));
}

#[tokio::test(flavor = "multi_thread")]
async fn unmatched_filter_exits_cleanly() {
    let server = mock_github().await;
    let dir = tempdir().unwrap();

    let mut cmd = ghstats(dir.path());
    cmd.env("GITHUB_TOKEN", "abc")
        .args(["--api-url", &server.uri(), "--repos", "nothing-here"]);
    let out = run(cmd).await;
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("No repositories match"));
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_token_exits_with_hint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();

    let mut cmd = ghstats(dir.path());
    cmd.env("GITHUB_TOKEN", "nope").args(["--api-url", &server.uri()]);
    let out = run(cmd).await;
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Please check your GITHUB_TOKEN"));
}

#[tokio::test(flavor = "multi_thread")]
async fn quiet_period_reports_no_commits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "octo" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "app", "full_name": "octo/app", "private": false }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/app/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();

    let mut cmd = ghstats(dir.path());
    cmd.env("GITHUB_TOKEN", "abc")
        .args(["--api-url", &server.uri()])
        .args(["--since", "2024-01-01", "--until", "2024-01-03"]);
    let out = run(cmd).await;
    assert_eq!(out.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("No commits found for the specified period"));
    assert!(stdout.contains("Period: 2024-01-01 to 2024-01-03"));
}

#[tokio::test(flavor = "multi_thread")]
async fn bad_date_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();

    let mut cmd = ghstats(dir.path());
    cmd.env("GITHUB_TOKEN", "nope")
        .args(["--api-url", &server.uri(), "--since", "01/02/2024"]);
    let out = run(cmd).await;
    assert_eq!(out.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Invalid date"), "{stderr}");
    assert!(!stderr.contains("Please check your GITHUB_TOKEN"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[test]
fn huge_day_count_exits_with_error() {
    let dir = tempdir().unwrap();
    ghstats(dir.path())
        .env("GITHUB_TOKEN", "abc")
        .args(["--days", "4294967295"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("out of range"));
}
