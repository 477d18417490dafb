#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `feedpush` command. It reads documents described as
//! JSON, hands them to a [`pusher::DocumentAcceptor`] and delivers the
//! resulting feeds to an appliance, to a file, or nowhere at all.
//!
//! # Design
//!
//! [`run`] accepts an iterator of arguments together with handles for
//! standard output and error so that tests can drive the command without
//! spawning a process. A [`clap`](https://docs.rs/clap/) command definition
//! performs the parse; help and version output are rendered from static text
//! so the wording stays stable.
//!
//! # Errors
//!
//! Exit codes are:
//!
//! - `0` when every document was accepted and delivered,
//! - `1` for usage errors and unreadable document files,
//! - `2` when some documents were skipped as unusable,
//! - `3` when feeds could not be delivered.
//!
//! # Examples
//!
//! ```
//! use cli::run;
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = run(["feedpush", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("feedpush "));
//! assert!(stderr.is_empty());
//! ```

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use pusher::{AcceptorError, DocPusherFactory, DocumentAcceptor, PusherConfig};
use transport::{
    DiscardFeedConnection, FeedConnection, FileFeedConnection, HttpConfig, HttpFeedConnection,
    TeeFeedConnection,
};

mod args;
mod documents;

use args::{Destination, ParsedArgs, parse_args};
pub use documents::{DocumentFileError, load_documents};

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Exit status for usage errors and unreadable inputs.
const EXIT_USAGE: i32 = 1;
/// Exit status when some documents were skipped.
const EXIT_SKIPPED: i32 = 2;
/// Exit status when feeds could not be delivered.
const EXIT_DELIVERY: i32 = 3;

const VERSION_TEXT: &str = concat!("feedpush ", env!("CARGO_PKG_VERSION"), "\n");

/// Static help text describing the command surface.
const HELP_TEXT: &str = concat!(
    "feedpush ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "\n",
    "Usage: feedpush --datasource NAME (--appliance URL | --output FILE | --discard)\n",
    "                [OPTIONS] FILE...\n",
    "\n",
    "Reads documents from JSON FILEs and pushes them as XML feeds.\n",
    "\n",
    "Options:\n",
    "  -h, --help                  Show this help message and exit.\n",
    "  -V, --version               Output version information and exit.\n",
    "      --datasource NAME       Data source the feeds are written for.\n",
    "      --feed-type TYPE        Default feed type: content, web, contenturl or acl.\n",
    "      --appliance URL         Post feeds to the appliance feed port at URL.\n",
    "  -o, --output FILE           Append feeds to FILE.\n",
    "      --discard               Build feeds and drop them.\n",
    "      --tee FILE              Also append feeds posted to the appliance to FILE.\n",
    "      --content-url-prefix URL  Prefix of record URLs for contenturl feeds.\n",
    "      --max-feed-size BYTES   Submit a feed once it approaches BYTES.\n",
    "      --no-compress           Never compress document content.\n",
    "      --feed-log              Log every submitted feed with content elided.\n",
    "  -v, --verbose               Increase logging verbosity; repeat for more.\n",
    "\n",
    "Exit status is 0 on success, 1 for usage errors, 2 when documents were\n",
    "skipped and 3 when feeds could not be delivered.\n",
);

#[doc(hidden)]
pub mod test_utils {
    pub use crate::args::{Destination, ParsedArgs, parse_args};
}

/// Runs the command with the provided arguments and output handles.
///
/// Returns the process exit code; see the crate documentation for values.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => {
            let _ = write!(stderr, "feedpush: {error}");
            EXIT_USAGE
        }
    }
}

/// Converts a status returned by [`run`] into an [`ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    ExitCode::from(u8::try_from(clamped).unwrap_or(u8::MAX))
}

fn usage_error<Err: Write>(stderr: &mut Err, message: &str) -> i32 {
    let _ = writeln!(stderr, "feedpush: {message}");
    let _ = writeln!(stderr, "Try 'feedpush --help' for more information.");
    EXIT_USAGE
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    if parsed.show_help {
        return if stdout.write_all(HELP_TEXT.as_bytes()).is_ok() {
            0
        } else {
            EXIT_USAGE
        };
    }
    if parsed.show_version {
        return if stdout.write_all(VERSION_TEXT.as_bytes()).is_ok() {
            0
        } else {
            EXIT_USAGE
        };
    }

    let Some(data_source) = parsed.data_source.as_deref() else {
        return usage_error(stderr, "missing --datasource");
    };
    let Some(destination) = parsed.destination.as_ref() else {
        return usage_error(stderr, "one of --appliance, --output or --discard is required");
    };
    if parsed.documents.is_empty() {
        return usage_error(stderr, "no document files given");
    }

    // A second initialisation (tests calling run repeatedly) is harmless.
    let _ = logging::init_tracing(&logging::VerbosityConfig::from_verbose_level(
        parsed.verbosity,
    ));

    let connection = match connect(destination, &parsed) {
        Ok(connection) => connection,
        Err(error) => {
            let _ = writeln!(stderr, "feedpush: {error}");
            return EXIT_USAGE;
        }
    };

    let mut loaded = Vec::with_capacity(parsed.documents.len());
    for path in &parsed.documents {
        match load_documents(path) {
            Ok(documents) => loaded.push(documents),
            Err(error) => {
                let _ = writeln!(stderr, "feedpush: {error}");
                return EXIT_USAGE;
            }
        }
    }

    let acceptor = DocumentAcceptor::new(
        data_source,
        DocPusherFactory::new(connection, pusher_config(&parsed)),
    );

    let mut accepted = 0_usize;
    let mut skipped = 0_usize;
    for (path, documents) in parsed.documents.iter().zip(&loaded) {
        for (index, document) in documents.iter().enumerate() {
            match acceptor.take(document) {
                Ok(()) => accepted += 1,
                Err(error) if error.is_document_fatal() => {
                    skipped += 1;
                    let _ = writeln!(
                        stderr,
                        "feedpush: skipping document {index} of {}: {error}",
                        path.display()
                    );
                }
                Err(error) => {
                    acceptor.cancel();
                    return delivery_error(stderr, &error);
                }
            }
        }
    }

    if let Err(error) = acceptor.flush() {
        return delivery_error(stderr, &error);
    }

    let _ = writeln!(
        stdout,
        "feedpush: accepted {accepted} document(s) for {data_source}; skipped {skipped}"
    );
    if skipped == 0 { 0 } else { EXIT_SKIPPED }
}

fn delivery_error<Err: Write>(stderr: &mut Err, error: &AcceptorError) -> i32 {
    let _ = writeln!(stderr, "feedpush: {error}");
    EXIT_DELIVERY
}

fn connect(
    destination: &Destination,
    parsed: &ParsedArgs,
) -> Result<Arc<dyn FeedConnection>, transport::FeedError> {
    Ok(match destination {
        Destination::Appliance(url) => {
            let http = HttpFeedConnection::new(&HttpConfig::new(url.as_str()))?;
            match &parsed.tee {
                Some(path) => Arc::new(TeeFeedConnection::new(
                    http,
                    FileFeedConnection::open(path.as_path())?,
                )),
                None => Arc::new(http),
            }
        }
        Destination::Output(path) => Arc::new(FileFeedConnection::open(path.as_path())?),
        Destination::Discard => Arc::new(DiscardFeedConnection),
    })
}

fn pusher_config(parsed: &ParsedArgs) -> PusherConfig {
    let mut config = PusherConfig::default()
        .with_default_feed_type(parsed.feed_type)
        .with_compression(parsed.compress)
        .with_feed_logging(parsed.feed_log);
    if let Some(bytes) = parsed.max_feed_size {
        config = config.with_max_feed_size(usize::try_from(bytes).unwrap_or(usize::MAX));
    }
    if let Some(prefix) = &parsed.content_url_prefix {
        config = config.with_content_url_prefix(prefix.as_str());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_support::write_file;

    fn run_cli(args: &[&str]) -> (i32, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run(args.iter().copied(), &mut stdout, &mut stderr);
        (
            code,
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
        )
    }

    #[test]
    fn help_is_written_to_stdout() {
        let (code, stdout, stderr) = run_cli(&["feedpush", "--help"]);
        assert_eq!(code, 0);
        assert!(stdout.contains("Usage: feedpush"));
        assert!(stderr.is_empty());
    }

    #[test]
    fn missing_data_source_is_a_usage_error() {
        let (code, _, stderr) = run_cli(&["feedpush", "--discard", "docs.json"]);
        assert_eq!(code, EXIT_USAGE);
        assert!(stderr.contains("--datasource"));
    }

    #[test]
    fn missing_destination_is_a_usage_error() {
        let (code, _, stderr) = run_cli(&["feedpush", "--datasource", "files", "docs.json"]);
        assert_eq!(code, EXIT_USAGE);
        assert!(stderr.contains("--appliance"));
    }

    #[test]
    fn unknown_option_is_a_usage_error() {
        let (code, _, stderr) = run_cli(&["feedpush", "--frobnicate"]);
        assert_eq!(code, EXIT_USAGE);
        assert!(stderr.starts_with("feedpush: "));
    }

    #[test]
    fn tee_without_appliance_is_a_usage_error() {
        let (code, stdout, stderr) = run_cli(&[
            "feedpush",
            "--datasource",
            "files",
            "--discard",
            "--tee",
            "copy.xml",
            "docs.json",
        ]);
        assert_eq!(code, EXIT_USAGE);
        assert!(stdout.is_empty());
        assert!(stderr.contains("--tee"));
    }

    #[test]
    fn unreadable_document_file_is_a_usage_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        let (code, _, stderr) = run_cli(&[
            "feedpush",
            "--datasource",
            "files",
            "--discard",
            missing.to_str().unwrap(),
        ]);
        assert_eq!(code, EXIT_USAGE);
        assert!(stderr.contains("missing.json"));
    }

    #[test]
    fn documents_are_written_to_output_file() {
        let dir = TempDir::new().unwrap();
        let docs = write_file(
            &dir,
            "docs.json",
            br#"[{"google:docid": "a", "google:content": {"text": "alpha"}},
                 {"google:docid": "b", "google:action": "delete"}]"#,
        );
        let output = dir.path().join("feeds.xml");

        let (code, stdout, stderr) = run_cli(&[
            "feedpush",
            "--datasource",
            "files",
            "--output",
            output.to_str().unwrap(),
            "--no-compress",
            docs.to_str().unwrap(),
        ]);
        assert_eq!(code, 0, "{stderr}");
        assert!(stdout.contains("accepted 2 document(s) for files"));

        let xml = std::fs::read_to_string(&output).unwrap();
        assert!(xml.contains("<datasource>files</datasource>"));
        assert!(xml.contains("docid=a"));
        assert!(xml.contains("docid=b"));
        assert!(xml.contains(r#"action="delete""#));
    }

    #[test]
    fn unusable_documents_are_skipped() {
        let dir = TempDir::new().unwrap();
        let docs = write_file(
            &dir,
            "docs.json",
            br#"[{"google:docid": "a"}, {"author": "no docid"}]"#,
        );

        let (code, stdout, stderr) = run_cli(&[
            "feedpush",
            "--datasource",
            "files",
            "--discard",
            docs.to_str().unwrap(),
        ]);
        assert_eq!(code, EXIT_SKIPPED);
        assert!(stdout.contains("accepted 1 document(s)"));
        assert!(stdout.contains("skipped 1"));
        assert!(stderr.contains("skipping document 1"));
    }

    #[test]
    fn exit_codes_are_clamped() {
        assert_eq!(exit_code_from(0), ExitCode::SUCCESS);
        assert_eq!(exit_code_from(-4), ExitCode::from(0));
        assert_eq!(exit_code_from(700), ExitCode::from(u8::MAX));
    }
}
