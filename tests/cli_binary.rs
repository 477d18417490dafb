//! End-to-end tests driving the `feedpush` binary.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! |  0   | Every document accepted and delivered     |
//! |  1   | Usage error or unreadable document file   |
//! |  2   | Some documents skipped                    |
//! |  3   | Feeds could not be delivered              |

use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

fn feedpush() -> Command {
    Command::cargo_bin("feedpush").unwrap()
}

#[test]
fn help_lists_destinations() {
    let output = feedpush().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for option in ["--appliance", "--output", "--discard", "--datasource"] {
        assert!(stdout.contains(option), "missing {option}");
    }
}

#[test]
fn usage_errors_exit_with_one() {
    let output = feedpush().args(["--discard", "docs.json"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("--datasource"),
        "stderr should name the missing option"
    );
}

#[test]
fn feeds_are_written_to_output_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("body.txt"), "report body").unwrap();
    let docs = dir.path().join("docs.json");
    fs::write(
        &docs,
        r#"[
            {"google:docid": "reports/q1", "google:content": {"file": "body.txt"},
             "google:lastmodified": {"date": "2009-02-13T23:31:30Z"}, "author": ["ann", "bob"]},
            {"google:docid": "reports/q0", "google:action": "delete"}
        ]"#,
    )
    .unwrap();
    let feeds = dir.path().join("feeds.xml");

    let output = feedpush()
        .args(["--datasource", "files", "--no-compress", "--output"])
        .arg(&feeds)
        .arg(&docs)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let xml = fs::read_to_string(&feeds).unwrap();
    assert!(xml.contains("<datasource>files</datasource>"));
    assert!(xml.contains("<feedtype>incremental</feedtype>"));
    assert!(xml.contains("docid=reports%2Fq1"));
    assert!(xml.contains(r#"name="author" content="ann""#));
    assert!(xml.contains(r#"action="delete""#));
    assert!(xml.contains(r#"encoding="base64binary""#));
}

#[test]
fn skipped_documents_exit_with_two() {
    let dir = TempDir::new().unwrap();
    let docs = dir.path().join("docs.json");
    fs::write(&docs, r#"[{"google:docid": "a"}, {"title": "no docid"}]"#).unwrap();

    let output = feedpush()
        .args(["--datasource", "files", "--discard"])
        .arg(&docs)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stdout).contains("skipped 1"));
}
