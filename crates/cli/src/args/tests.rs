use super::*;
use clap::error::ErrorKind;

#[test]
fn defaults_without_options() {
    let parsed = parse_args(["feedpush", "docs.json"]).unwrap();
    assert!(!parsed.show_help);
    assert!(!parsed.show_version);
    assert_eq!(parsed.data_source, None);
    assert_eq!(parsed.feed_type, FeedType::Content);
    assert_eq!(parsed.destination, None);
    assert!(parsed.compress);
    assert!(!parsed.feed_log);
    assert_eq!(parsed.verbosity, 0);
    assert_eq!(parsed.documents, [PathBuf::from("docs.json")]);
}

#[test]
fn empty_argument_list_is_accepted() {
    let parsed = parse_args(Vec::<OsString>::new()).unwrap();
    assert!(parsed.documents.is_empty());
}

#[test]
fn destinations_are_recognised() {
    let parsed = parse_args(["feedpush", "--appliance", "http://gsa:19900/"]).unwrap();
    assert_eq!(
        parsed.destination,
        Some(Destination::Appliance("http://gsa:19900/".to_owned()))
    );

    let parsed = parse_args(["feedpush", "-o", "feeds.xml"]).unwrap();
    assert_eq!(
        parsed.destination,
        Some(Destination::Output(PathBuf::from("feeds.xml")))
    );

    let parsed = parse_args(["feedpush", "--discard"]).unwrap();
    assert_eq!(parsed.destination, Some(Destination::Discard));
}

#[test]
fn feed_type_is_parsed() {
    let parsed = parse_args(["feedpush", "--feed-type", "web"]).unwrap();
    assert_eq!(parsed.feed_type, FeedType::Web);

    let err = parse_args(["feedpush", "--feed-type", "bogus"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn verbosity_counts_repeats() {
    let parsed = parse_args(["feedpush", "-vv", "--verbose"]).unwrap();
    assert_eq!(parsed.verbosity, 3);
}

#[test]
fn max_feed_size_must_be_positive() {
    let parsed = parse_args(["feedpush", "--max-feed-size", "4096"]).unwrap();
    assert_eq!(parsed.max_feed_size, Some(4096));

    assert!(parse_args(["feedpush", "--max-feed-size", "0"]).is_err());
    assert!(parse_args(["feedpush", "--max-feed-size", "lots"]).is_err());
}

#[test]
fn switches_are_recorded() {
    let parsed = parse_args([
        "feedpush",
        "--datasource",
        "files",
        "--no-compress",
        "--feed-log",
        "--content-url-prefix",
        "http://host/get",
        "a.json",
        "b.json",
    ])
    .unwrap();
    assert_eq!(parsed.data_source.as_deref(), Some("files"));
    assert!(!parsed.compress);
    assert!(parsed.feed_log);
    assert_eq!(parsed.content_url_prefix.as_deref(), Some("http://host/get"));
    assert_eq!(parsed.documents.len(), 2);
}

#[test]
fn help_and_version_flags_do_not_exit() {
    let parsed = parse_args(["feedpush", "-h"]).unwrap();
    assert!(parsed.show_help);
    let parsed = parse_args(["feedpush", "-V"]).unwrap();
    assert!(parsed.show_version);
}
