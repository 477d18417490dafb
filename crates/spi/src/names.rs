//! Well-known property names understood by the feed pipeline.
//!
//! Connectors may attach any property they like; the names below carry
//! special meaning when a document is converted into a feed record.

/// Unique document identifier within its data source.
pub const DOCID: &str = "google:docid";
/// Explicit URL under which search results point at the document.
pub const SEARCHURL: &str = "google:searchurl";
/// URL shown to users in search results instead of the record URL.
pub const DISPLAYURL: &str = "google:displayurl";
/// Binary document content.
pub const CONTENT: &str = "google:content";
/// MIME type of the content.
pub const MIMETYPE: &str = "google:mimetype";
/// Date-typed last modification time.
pub const LASTMODIFIED: &str = "google:lastmodified";
/// Boolean; `false` marks a document that requires authorization.
pub const ISPUBLIC: &str = "google:ispublic";
/// Feed action: `add` or `delete`.
pub const ACTION: &str = "google:action";
/// Boolean lock flag that keeps the record in the index.
pub const LOCK: &str = "google:lock";
/// Appliance page-rank hint, passed through unvalidated.
pub const PAGERANK: &str = "google:pagerank";
/// Title used as alternate content when a document has none.
pub const TITLE: &str = "google:title";
/// Feed type override for this document (`content`, `web`, `contenturl`, `acl`).
pub const FEEDTYPE: &str = "google:feedtype";
/// Fragment distinguishing several records sharing one docid.
pub const FRAGMENT: &str = "google:fragment";
/// Document kind; the value `acl` marks a free-standing ACL document.
pub const DOCUMENTTYPE: &str = "google:documenttype";

/// Users permitted to read the document.
pub const ACLUSERS: &str = "google:aclusers";
/// Groups permitted to read the document.
pub const ACLGROUPS: &str = "google:aclgroups";
/// Users explicitly denied access.
pub const ACLDENYUSERS: &str = "google:acldenyusers";
/// Groups explicitly denied access.
pub const ACLDENYGROUPS: &str = "google:acldenygroups";
/// URL of the document this document inherits its ACL from.
pub const ACLINHERITFROM: &str = "google:aclinheritfrom";
/// Docid of the document this document inherits its ACL from.
pub const ACLINHERITFROM_DOCID: &str = "google:aclinheritfrom:docid";
/// Feed type used to fabricate the inherit-from URL.
pub const ACLINHERITFROM_FEEDTYPE: &str = "google:aclinheritfrom:feedtype";
/// Fragment used to fabricate the inherit-from URL.
pub const ACLINHERITFROM_FRAGMENT: &str = "google:aclinheritfrom:fragment";
/// ACL inheritance rule (`parent-overrides`, `child-overrides`, ...).
pub const ACLINHERITANCETYPE: &str = "google:aclinheritancetype";

/// Prefix of per-user role properties, e.g. `google:user:roles:joe`.
pub const USER_ROLES_PREFIX: &str = "google:user:roles:";
/// Prefix of per-group role properties, e.g. `google:group:roles:staff`.
pub const GROUP_ROLES_PREFIX: &str = "google:group:roles:";

/// Boolean web-feed hint asking the appliance to crawl the URL right away.
pub const CRAWL_IMMEDIATELY: &str = "google:crawlimmediately";
/// Boolean web-feed hint asking the appliance to crawl the URL only once.
pub const CRAWL_ONCE: &str = "google:crawlonce";

/// MIME type used when a document does not declare one.
pub const DEFAULT_MIMETYPE: &str = "text/html";
/// Value of [`DOCUMENTTYPE`] identifying an ACL document.
pub const DOCUMENTTYPE_ACL: &str = "acl";

/// Returns the role property name for a user scope.
#[must_use]
pub fn user_roles(scope: &str) -> String {
    format!("{USER_ROLES_PREFIX}{scope}")
}

/// Returns the role property name for a group scope.
#[must_use]
pub fn group_roles(scope: &str) -> String {
    format!("{GROUP_ROLES_PREFIX}{scope}")
}

/// Returns `true` for per-scope role properties of either kind.
#[must_use]
pub fn is_role_property(name: &str) -> bool {
    name.starts_with(USER_ROLES_PREFIX) || name.starts_with(GROUP_ROLES_PREFIX)
}

/// Returns `true` for every property that carries access-control data.
#[must_use]
pub fn is_acl_property(name: &str) -> bool {
    matches!(
        name,
        ACLUSERS
            | ACLGROUPS
            | ACLDENYUSERS
            | ACLDENYGROUPS
            | ACLINHERITFROM
            | ACLINHERITFROM_DOCID
            | ACLINHERITFROM_FEEDTYPE
            | ACLINHERITFROM_FRAGMENT
            | ACLINHERITANCETYPE
    ) || is_role_property(name)
}
