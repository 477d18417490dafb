use url::Url;

/// Returns `true` when `candidate` is acceptable as an explicit record URL.
///
/// The value must parse as an absolute, hierarchical URL. `smb:` URLs are
/// accepted without parsing since UNC-style share paths routinely contain
/// characters a strict parser rejects.
#[must_use]
pub fn is_valid_url(candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate
        .get(..4)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("smb:"))
    {
        return true;
    }
    Url::parse(candidate).is_ok_and(|url| !url.cannot_be_a_base())
}
