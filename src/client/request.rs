//! Upstream Request Description
//!
//! An endpoint path plus query parameters, convertible both into a concrete
//! URL under the configured base and into a cache fingerprint.

use reqwest::Url;

use crate::cache::Fingerprint;
use crate::error::{OrklError, Result};

// == Api Request ==
/// One GET request against the ORKL API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    segments: Vec<String>,
    params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Creates a request for the path made of `segments`.
    ///
    /// Segments are percent-encoded when the URL is built, so caller-supplied
    /// identifiers cannot escape their path position.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            params: Vec::new(),
        }
    }

    /// Adds a query parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Adds a query parameter only when `value` is present.
    pub fn param_opt<T: ToString>(self, name: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    /// Readable endpoint path, e.g. `/library/entry/abc`.
    ///
    /// `%` is escaped before `/` so distinct segments never share a path.
    pub fn path(&self) -> String {
        let escaped: Vec<String> = self
            .segments
            .iter()
            .map(|s| s.replace('%', "%25").replace('/', "%2F"))
            .collect();
        format!("/{}", escaped.join("/"))
    }

    // == Fingerprint ==
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(&self.path(), self.params.iter().cloned())
    }

    // == URL ==
    /// Resolves the request against `base`, keeping any path `base` carries.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                OrklError::Configuration(format!("base URL '{}' cannot carry a path", base))
            })?
            .pop_if_empty()
            .extend(&self.segments);

        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.params);
        }
        Ok(url)
    }
}
