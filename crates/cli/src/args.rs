//! Command-line definition and parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::builder::PathBufValueParser;
use clap::{Arg, ArgAction, ArgGroup, Command};
use spi::FeedType;

/// Where closed feeds are delivered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Destination {
    /// The appliance feed port at this base URL.
    Appliance(String),
    /// Appended to this file.
    Output(PathBuf),
    /// Dropped.
    Discard,
}

/// Parsed command-line options.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedArgs {
    /// `--help` was given.
    pub show_help: bool,
    /// `--version` was given.
    pub show_version: bool,
    /// Value of `--datasource`.
    pub data_source: Option<String>,
    /// Value of `--feed-type`, defaulting to `content`.
    pub feed_type: FeedType,
    /// Selected destination, if any.
    pub destination: Option<Destination>,
    /// Value of `--tee`.
    pub tee: Option<PathBuf>,
    /// Value of `--content-url-prefix`.
    pub content_url_prefix: Option<String>,
    /// Value of `--max-feed-size`.
    pub max_feed_size: Option<u64>,
    /// `false` when `--no-compress` was given.
    pub compress: bool,
    /// `--feed-log` was given.
    pub feed_log: bool,
    /// Number of `-v` flags.
    pub verbosity: u8,
    /// JSON document files.
    pub documents: Vec<PathBuf>,
}

fn clap_command() -> Command {
    Command::new("feedpush")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("datasource")
                .long("datasource")
                .value_name("NAME")
                .help("Data source the feeds are written for.")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("feed-type")
                .long("feed-type")
                .value_name("TYPE")
                .help("Feed type of documents that do not name one.")
                .action(ArgAction::Set)
                .value_parser(|value: &str| value.parse::<FeedType>()),
        )
        .arg(
            Arg::new("appliance")
                .long("appliance")
                .value_name("URL")
                .help("Post feeds to the appliance feed port at URL.")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .help("Append feeds to FILE.")
                .action(ArgAction::Set)
                .value_parser(PathBufValueParser::new()),
        )
        .arg(
            Arg::new("discard")
                .long("discard")
                .help("Build feeds and drop them.")
                .action(ArgAction::SetTrue),
        )
        .group(
            ArgGroup::new("destination")
                .args(["appliance", "output", "discard"])
                .multiple(false),
        )
        .arg(
            Arg::new("tee")
                .long("tee")
                .value_name("FILE")
                .help("Also append every feed posted to the appliance to FILE.")
                .action(ArgAction::Set)
                .requires("appliance")
                .conflicts_with_all(["output", "discard"])
                .value_parser(PathBufValueParser::new()),
        )
        .arg(
            Arg::new("content-url-prefix")
                .long("content-url-prefix")
                .value_name("URL")
                .help("Prefix of record URLs for contenturl feeds.")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("max-feed-size")
                .long("max-feed-size")
                .value_name("BYTES")
                .help("Submit a feed once it approaches BYTES.")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("no-compress")
                .long("no-compress")
                .help("Never compress document content.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("feed-log")
                .long("feed-log")
                .help("Log every submitted feed with content elided.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase logging verbosity; repeat for more.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("documents")
                .value_name("FILE")
                .action(ArgAction::Append)
                .num_args(0..)
                .value_parser(PathBufValueParser::new()),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
pub fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from("feedpush"));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    if matches.contains_id("tee") && !matches.contains_id("appliance") {
        return Err(clap_command().error(
            clap::error::ErrorKind::MissingRequiredArgument,
            "--tee requires --appliance",
        ));
    }

    let destination = if let Some(url) = matches.remove_one::<String>("appliance") {
        Some(Destination::Appliance(url))
    } else if let Some(path) = matches.remove_one::<PathBuf>("output") {
        Some(Destination::Output(path))
    } else if matches.get_flag("discard") {
        Some(Destination::Discard)
    } else {
        None
    };

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        data_source: matches.remove_one::<String>("datasource"),
        feed_type: matches
            .remove_one::<FeedType>("feed-type")
            .unwrap_or_default(),
        destination,
        tee: matches.remove_one::<PathBuf>("tee"),
        content_url_prefix: matches.remove_one::<String>("content-url-prefix"),
        max_feed_size: matches.remove_one::<u64>("max-feed-size"),
        compress: !matches.get_flag("no-compress"),
        feed_log: matches.get_flag("feed-log"),
        verbosity: matches.get_count("verbose"),
        documents: matches
            .remove_many::<PathBuf>("documents")
            .map(Iterator::collect)
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests;
