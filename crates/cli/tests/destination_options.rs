//! Tests for destination option validation.
//!
//! Exactly one destination may be chosen, and `--tee` only makes sense when
//! feeds are posted to an appliance.

use cli::test_utils::{Destination, parse_args};
use clap::error::ErrorKind;

#[test]
fn test_output_and_discard_conflict() {
    let result = parse_args(["feedpush", "--output", "feeds.xml", "--discard"]);
    assert!(
        result.is_err(),
        "--output and --discard should be mutually exclusive"
    );
    assert_eq!(result.unwrap_err().kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn test_appliance_and_output_conflict() {
    let result = parse_args([
        "feedpush",
        "--appliance",
        "http://gsa:19900/",
        "--output",
        "feeds.xml",
    ]);
    assert!(
        result.is_err(),
        "--appliance and --output should be mutually exclusive"
    );
    assert_eq!(result.unwrap_err().kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn test_tee_requires_appliance() {
    let result = parse_args(["feedpush", "--tee", "copy.xml"]);
    assert!(result.is_err(), "--tee without --appliance should fail");
    assert_eq!(result.unwrap_err().kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_tee_with_other_destinations_conflicts() {
    for destination in [&["--discard"][..], &["--output", "feeds.xml"][..]] {
        let mut args = vec!["feedpush"];
        args.extend_from_slice(destination);
        args.extend(["--tee", "copy.xml"]);
        let result = parse_args(args);
        assert!(
            result.is_err(),
            "--tee with {destination:?} should be rejected"
        );
        assert_eq!(result.unwrap_err().kind(), ErrorKind::ArgumentConflict);
    }
}

#[test]
fn test_tee_with_appliance() {
    let parsed = parse_args([
        "feedpush",
        "--appliance",
        "http://gsa:19900/",
        "--tee",
        "copy.xml",
    ])
    .unwrap();
    assert!(matches!(parsed.destination, Some(Destination::Appliance(_))));
    assert_eq!(parsed.tee.as_deref(), Some(std::path::Path::new("copy.xml")));
}
