//! End-to-end runs of the acceptor against real connections.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pusher::{DocPusherFactory, DocumentAcceptor, PusherConfig, RetryPolicy};
use spi::{SimpleDocument, names};
use test_support::RecordingFeedConnection;
use transport::{FeedConnection, FileFeedConnection, TeeFeedConnection};

fn document(docid: &str) -> SimpleDocument {
    SimpleDocument::new()
        .with_string(names::DOCID, docid)
        .with_string("author", "joe")
        .with_content(format!("contents of {docid}"))
}

fn acceptor(connection: Arc<dyn FeedConnection>) -> DocumentAcceptor<DocPusherFactory> {
    DocumentAcceptor::new(
        "files",
        DocPusherFactory::new(connection, PusherConfig::default()),
    )
}

#[test]
fn documents_reach_file_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feeds.xml");
    let acceptor = acceptor(Arc::new(FileFeedConnection::open(&path).unwrap()));

    for docid in ["one", "two", "three"] {
        acceptor.take(&document(docid)).unwrap();
    }
    acceptor.flush().unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written.matches("<gsafeed>").count(), 1);
    assert_eq!(written.matches("<record ").count(), 3);
    let positions: Vec<_> = ["docid=one", "docid=two", "docid=three"]
        .iter()
        .map(|needle| written.find(needle).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(written.ends_with("</group>\n</gsafeed>\n"));
}

#[test]
fn tee_keeps_a_copy_of_every_feed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tee.xml");
    let recording = Arc::new(RecordingFeedConnection::new());
    let tee = TeeFeedConnection::new(
        Arc::clone(&recording),
        FileFeedConnection::open(&path).unwrap(),
    );
    let acceptor = acceptor(Arc::new(tee));

    acceptor.take(&document("one")).unwrap();
    acceptor.flush().unwrap();
    acceptor.take(&document("two")).unwrap();
    acceptor.flush().unwrap();

    assert_eq!(recording.sent_count(), 2);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), recording.xml());
}

#[test]
fn interrupt_wakes_a_waiting_take() {
    let connection = Arc::new(RecordingFeedConnection::new());
    connection.set_backlogged(true);
    let acceptor = acceptor(connection.clone()).with_retry_policy(
        RetryPolicy::default().with_sleeps(Duration::from_secs(60), Duration::from_secs(60)),
    );
    let handle = acceptor.interrupt_handle();

    let started = Instant::now();
    let waker = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        handle.interrupt();
    });
    acceptor.take(&document("one")).unwrap();
    waker.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(30));
    assert_eq!(connection.sent_count(), 0);

    connection.set_backlogged(false);
    acceptor.flush().unwrap();
    assert_eq!(connection.sent_count(), 1);
}

#[test]
fn take_resumes_when_backlog_clears() {
    let connection = Arc::new(RecordingFeedConnection::new());
    connection.set_backlogged(true);
    let acceptor = acceptor(connection.clone()).with_retry_policy(
        RetryPolicy::default()
            .with_retry_count(10_000)
            .with_sleeps(Duration::from_millis(1), Duration::from_millis(5)),
    );

    let clearer = {
        let connection = Arc::clone(&connection);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            connection.set_backlogged(false);
        })
    };
    acceptor.take(&document("one")).unwrap();
    clearer.join().unwrap();

    acceptor.take(&document("two")).unwrap();
    acceptor.flush().unwrap();
    assert_eq!(connection.payloads()[0].record_count(), 2);
}

#[test]
fn canceled_documents_are_never_sent() {
    let connection = Arc::new(RecordingFeedConnection::new());
    let acceptor = acceptor(connection.clone());

    acceptor.take(&document("lost")).unwrap();
    acceptor.cancel();
    acceptor.flush().unwrap();
    assert_eq!(connection.sent_count(), 0);

    acceptor.take(&document("kept")).unwrap();
    acceptor.flush().unwrap();
    let xml = connection.xml();
    assert!(xml.contains("docid=kept"));
    assert!(!xml.contains("docid=lost"));
}
