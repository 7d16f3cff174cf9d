//! Request Fingerprints
//!
//! Cache keys derived from an upstream endpoint path and its query parameters.

use std::collections::BTreeMap;
use std::fmt;

// == Fingerprint ==
/// Deterministic cache key for one logical upstream request.
///
/// Parameters are sorted by name, so the same request always maps to the same
/// fingerprint regardless of the order its parameters were supplied in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Builds the fingerprint for `endpoint` called with `params`.
    pub fn new<I, K, V>(endpoint: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let params: BTreeMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let mut key = format!("/{}", endpoint.trim_matches('/'));
        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
                .collect::<Vec<_>>()
                .join("&");
            key.push('?');
            key.push_str(&query);
        }

        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Separators inside names or values must not collide with the query layout.
fn escape(raw: &str) -> String {
    raw.replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3D")
}
