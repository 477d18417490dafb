use super::*;
use crate::StripMode;
use spi::{FeedType, Property, SimpleDocument, find_string};
use test_support::FailingDocument;

fn urls() -> UrlConstructor {
    UrlConstructor::new("ds", FeedType::Content)
}

fn strings(document: &dyn Document, name: &str) -> Vec<String> {
    document
        .find_property(name)
        .unwrap()
        .map(|property| property.iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}

#[derive(Debug)]
struct Rename(&'static str, &'static str);

impl DocumentFilter for Rename {
    fn find_property(
        &self,
        source: &dyn Document,
        name: &str,
    ) -> Result<Option<Property>, RepositoryError> {
        if name == self.1 {
            source.find_property(self.0)
        } else {
            source.find_property(name)
        }
    }

    fn property_names(&self, source: &dyn Document) -> Result<BTreeSet<String>, RepositoryError> {
        let mut visible = source.property_names()?;
        if visible.remove(self.0) {
            visible.insert(self.1.to_owned());
        }
        Ok(visible)
    }
}

#[test]
fn empty_chain_is_passthrough() {
    let source = SimpleDocument::new().with_string(names::DOCID, "1");
    let chain = DocumentFilterChain::new();
    let document = chain.compose(&source).unwrap();
    assert!(document.is_passthrough());
    assert_eq!(strings(&document, names::DOCID), ["1"]);
}

#[test]
fn plain_documents_get_no_acl_filters() {
    let source = SimpleDocument::new()
        .with_string(names::DOCID, "1")
        .with_strings(names::ACLUSERS, ["joe"]);
    let chain = DocumentFilterChain::acl(urls(), None);
    let document = chain.compose(&source).unwrap();
    assert!(document.is_passthrough());
}

#[test]
fn explicit_inherit_from_url_wins() {
    let source = SimpleDocument::new()
        .with_string(names::ACLINHERITFROM, "http://parent/")
        .with_string(names::ACLINHERITFROM_DOCID, "ignored");
    let chain = DocumentFilterChain::acl(urls(), None);
    let document = chain.compose(&source).unwrap();
    assert_eq!(document.depth(), 0);
    assert_eq!(strings(&document, names::ACLINHERITFROM), ["http://parent/"]);
}

#[test]
fn inherit_and_roles_stack_in_order() {
    let source = SimpleDocument::new()
        .with_string(names::DOCID, "child")
        .with_string(names::ACLINHERITFROM_DOCID, "parent")
        .with_strings(names::ACLUSERS, ["joe", "mary"])
        .with_strings(names::user_roles("mary"), ["reader", "writer"]);

    let chain = DocumentFilterChain::acl(urls(), None);
    let document = chain.compose(&source).unwrap();

    assert_eq!(document.depth(), 2);
    assert_eq!(
        find_string(&document, names::ACLINHERITFROM).unwrap().as_deref(),
        Some("googleconnector://ds.localhost/doc?docid=parent")
    );
    assert_eq!(
        strings(&document, names::ACLUSERS),
        ["joe", "mary=reader", "mary=writer"]
    );

    let visible = document.property_names().unwrap();
    assert!(visible.contains(names::ACLINHERITFROM));
    assert!(!visible.contains(names::ACLINHERITFROM_DOCID));
    assert!(!visible.contains(&names::user_roles("mary")));
}

#[test]
fn strip_runs_after_synthesis() {
    let source = SimpleDocument::new()
        .with_string(names::DOCID, "child")
        .with_string(names::ACLINHERITFROM_DOCID, "parent")
        .with_strings(names::ACLUSERS, ["joe"]);

    let chain = DocumentFilterChain::acl(urls(), Some(StripMode::All));
    let document = chain.compose(&source).unwrap();

    let visible: Vec<String> = document.property_names().unwrap().into_iter().collect();
    assert_eq!(visible, [names::DOCID]);
    assert!(document.find_property(names::ACLINHERITFROM).unwrap().is_none());
}

#[test]
fn inheritance_strip_keeps_scopes() {
    let source = SimpleDocument::new()
        .with_string(names::ACLINHERITFROM_DOCID, "parent")
        .with_strings(names::ACLGROUPS, ["staff"])
        .with_strings(names::group_roles("staff"), ["reader"]);

    let chain = DocumentFilterChain::acl(urls(), Some(StripMode::Inheritance));
    let document = chain.compose(&source).unwrap();

    assert_eq!(strings(&document, names::ACLGROUPS), ["staff=reader"]);
    assert!(document.find_property(names::ACLINHERITFROM).unwrap().is_none());
}

#[test]
fn later_stages_observe_earlier_output() {
    let source = SimpleDocument::new().with_string("a", "value");
    let chain = DocumentFilterChain::new()
        .with_filter("a-to-b", Rename("a", "b"))
        .with_filter("b-to-c", Rename("b", "c"));

    let document = chain.compose(&source).unwrap();
    assert_eq!(strings(&document, "c"), ["value"]);
    let visible: Vec<String> = document.property_names().unwrap().into_iter().collect();
    assert_eq!(visible, ["c"]);
}

#[test]
fn predicates_see_source_names() {
    let chain = DocumentFilterChain::new().with_stage(
        "only-with-a",
        |present| present.contains("a"),
        Rename("a", "b"),
    );

    let with_a = SimpleDocument::new().with_string("a", "1");
    let without_a = SimpleDocument::new().with_string("z", "1");
    assert_eq!(chain.compose(&with_a).unwrap().depth(), 1);
    assert_eq!(chain.compose(&without_a).unwrap().depth(), 0);
    assert_eq!(chain.stage_names().collect::<Vec<_>>(), ["only-with-a"]);
}

#[test]
fn listing_failures_abort_composition() {
    let source = FailingDocument::new(SimpleDocument::new())
        .fail_listing(RepositoryError::Transient("listing failed".into()));
    let chain = DocumentFilterChain::acl(urls(), None);
    let err = chain.compose(&source).unwrap_err();
    assert_eq!(err, RepositoryError::Transient("listing failed".into()));
}

#[test]
fn lookup_failures_pass_through_filters() {
    let source = FailingDocument::new(
        SimpleDocument::new()
            .with_strings(names::ACLUSERS, ["joe"])
            .with_strings(names::user_roles("joe"), ["reader"]),
    )
    .fail_on(
        names::user_roles("joe"),
        RepositoryError::Transient("roles offline".into()),
    );

    let chain = DocumentFilterChain::acl(urls(), None);
    let document = chain.compose(&source).unwrap();
    let err = document.find_property(names::ACLUSERS).unwrap_err();
    assert!(err.is_transient());
}
