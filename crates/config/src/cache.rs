//! SAML assertion cache.
//!
//! Responsibilities:
//! - Decide whether an assertion is inside its `Conditions` validity window.
//! - Read a cached assertion for an IdP, returning it only while valid.
//! - Write a fresh assertion under the cache file's lock.
//!
//! Does NOT handle:
//! - Obtaining assertions (see `auth::AssertionProvider`).
//! - Signature verification; the cache trusts what the provider returned.
//!
//! Invariants:
//! - Every parse failure is an expected miss (`false` / `None`), never an error.
//! - The window is half-open: `NotBefore <= now < NotOnOrAfter`.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::constants::{SAML_ASSERTION_NS, SAML_TIMESTAMP_FORMAT};
use crate::persistence::{FileLock, ProfileStore, open_private};

/// Raw SAML response XML.
#[derive(Clone, PartialEq, Eq)]
pub struct SamlAssertion(Vec<u8>);

impl SamlAssertion {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decode a base64-encoded assertion (as passed via `--saml-assertion`).
    pub fn from_base64(encoded: &str) -> Result<Self, base64::DecodeError> {
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        STANDARD.decode(compact).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// True while the current time is inside the `Conditions` window.
    pub fn is_valid(&self) -> bool {
        validate(&self.0)
    }
}

impl fmt::Debug for SamlAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SamlAssertion({} bytes)", self.0.len())
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), SAML_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Validity window of an assertion, if it has exactly one well-formed `Conditions`.
pub fn validity_window(bytes: &[u8]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let text = std::str::from_utf8(bytes).ok()?;
    if text.trim().is_empty() {
        return None;
    }
    let doc = roxmltree::Document::parse(text).ok()?;

    let mut conditions = doc.descendants().filter(|node| {
        node.is_element()
            && node.tag_name().name() == "Conditions"
            && node.tag_name().namespace() == Some(SAML_ASSERTION_NS)
    });
    let element = conditions.next()?;
    if conditions.next().is_some() {
        return None;
    }

    let not_before = parse_timestamp(element.attribute("NotBefore")?)?;
    let not_on_or_after = parse_timestamp(element.attribute("NotOnOrAfter")?)?;
    Some((not_before, not_on_or_after))
}

/// True iff `NotBefore <= now < NotOnOrAfter`.
pub fn is_valid_at(bytes: &[u8], now: DateTime<Utc>) -> bool {
    match validity_window(bytes) {
        Some((not_before, not_on_or_after)) => not_before <= now && now < not_on_or_after,
        None => false,
    }
}

/// Validate against the current time.
pub fn validate(bytes: &[u8]) -> bool {
    is_valid_at(bytes, Utc::now())
}

/// Read the cached assertion for `idp_id`, returning it only while valid.
pub fn read(store: &ProfileStore, idp_id: &str) -> Option<SamlAssertion> {
    let path = store.saml_cache_file(idp_id);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no SAML cache");
            return None;
        }
    };

    let assertion = SamlAssertion::new(bytes);
    if assertion.is_valid() {
        tracing::info!(path = %path.display(), "SAML cache found");
        Some(assertion)
    } else {
        tracing::info!(path = %path.display(), "SAML cache expired or malformed");
        None
    }
}

/// Write `assertion` to the cache file for `idp_id` under its lock.
pub fn write(
    store: &ProfileStore,
    idp_id: &str,
    assertion: &SamlAssertion,
) -> std::io::Result<()> {
    use std::io::Write;

    let path = store.saml_cache_file(idp_id);
    let text = String::from_utf8_lossy(assertion.as_bytes());

    let _lock = FileLock::acquire(&path)?;
    let mut file = open_private(&path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    tracing::debug!(path = %path.display(), "SAML cache written");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn stamp(t: DateTime<Utc>) -> String {
        t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }

    pub(crate) fn assertion_xml(not_before: &str, not_on_or_after: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" ID="_r1" Version="2.0">
  <saml:Assertion xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="_a1" Version="2.0">
    <saml:Issuer>https://accounts.google.com/o/saml2?idpid=C01abc</saml:Issuer>
    <saml:Conditions NotBefore="{not_before}" NotOnOrAfter="{not_on_or_after}">
      <saml:AudienceRestriction>
        <saml:Audience>https://signin.aws.amazon.com/saml</saml:Audience>
      </saml:AudienceRestriction>
    </saml:Conditions>
  </saml:Assertion>
</samlp:Response>"#
        )
    }

    pub(crate) fn assertion_with_window(
        not_before: DateTime<Utc>,
        not_on_or_after: DateTime<Utc>,
    ) -> SamlAssertion {
        SamlAssertion::new(assertion_xml(&stamp(not_before), &stamp(not_on_or_after)))
    }

    fn fixed(raw: &str) -> DateTime<Utc> {
        parse_timestamp(raw).unwrap()
    }

    #[test]
    fn test_window_is_half_open() {
        let xml = assertion_xml("2024-05-01T10:00:00.000Z", "2024-05-01T11:00:00.000Z");
        let bytes = xml.as_bytes();

        assert!(is_valid_at(bytes, fixed("2024-05-01T10:00:00.000Z")));
        assert!(is_valid_at(bytes, fixed("2024-05-01T10:59:59.999Z")));
        assert!(!is_valid_at(bytes, fixed("2024-05-01T11:00:00.000Z")));
        assert!(!is_valid_at(bytes, fixed("2024-05-01T09:59:59.999Z")));
    }

    #[test]
    fn test_timestamps_without_fraction_are_accepted() {
        let xml = assertion_xml("2024-05-01T10:00:00Z", "2024-05-01T11:00:00Z");
        assert!(is_valid_at(xml.as_bytes(), fixed("2024-05-01T10:30:00Z")));
    }

    #[test]
    fn test_malformed_inputs_are_invalid() {
        let now = Utc::now();
        assert!(!is_valid_at(b"", now));
        assert!(!is_valid_at(b"   ", now));
        assert!(!is_valid_at(b"not xml at all", now));
        assert!(!is_valid_at(&[0xff, 0xfe, 0x00], now));
        assert!(!is_valid_at(b"<Response><Assertion/></Response>", now));
    }

    #[test]
    fn test_conditions_outside_saml_namespace_are_ignored() {
        let xml = r#"<Response><Conditions NotBefore="2000-01-01T00:00:00Z" NotOnOrAfter="2999-01-01T00:00:00Z"/></Response>"#;
        assert!(!is_valid_at(xml.as_bytes(), Utc::now()));
    }

    #[test]
    fn test_missing_attribute_is_invalid() {
        let xml = r#"<saml:Assertion xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion"><saml:Conditions NotBefore="2000-01-01T00:00:00Z"/></saml:Assertion>"#;
        assert!(!is_valid_at(xml.as_bytes(), Utc::now()));
    }

    #[test]
    fn test_bad_timestamp_is_invalid() {
        let xml = assertion_xml("yesterday", "tomorrow");
        assert!(!is_valid_at(xml.as_bytes(), Utc::now()));
    }

    #[test]
    fn test_duplicate_conditions_are_invalid() {
        let xml = r#"<saml:Assertion xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion">
<saml:Conditions NotBefore="2000-01-01T00:00:00Z" NotOnOrAfter="2999-01-01T00:00:00Z"/>
<saml:Conditions NotBefore="2000-01-01T00:00:00Z" NotOnOrAfter="2999-01-01T00:00:00Z"/>
</saml:Assertion>"#;
        assert!(!is_valid_at(xml.as_bytes(), Utc::now()));
    }

    #[test]
    fn test_base64_round_trip() {
        let assertion = SamlAssertion::new(b"<xml/>".to_vec());
        let encoded = assertion.to_base64();
        let wrapped = format!("{}\n{}", &encoded[..4], &encoded[4..]);
        assert_eq!(SamlAssertion::from_base64(&wrapped).unwrap(), assertion);
        assert!(SamlAssertion::from_base64("!!!").is_err());
    }

    #[test]
    fn test_read_returns_only_valid_cache() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path().join("config"), dir.path().join("credentials"));
        let now = Utc::now();

        assert!(read(&store, "C01abc").is_none());

        let fresh = assertion_with_window(now - Duration::minutes(1), now + Duration::hours(1));
        write(&store, "C01abc", &fresh).unwrap();
        assert_eq!(read(&store, "C01abc"), Some(fresh));
        assert!(dir.path().join("saml_cache_C01abc.xml").exists());

        let stale = assertion_with_window(now - Duration::hours(2), now - Duration::hours(1));
        write(&store, "C01abc", &stale).unwrap();
        assert!(read(&store, "C01abc").is_none());
    }

    #[test]
    fn test_debug_does_not_dump_assertion() {
        let assertion = SamlAssertion::new(b"<secret-assertion/>".to_vec());
        let debug_output = format!("{:?}", assertion);
        assert!(!debug_output.contains("secret-assertion"));
    }
}
