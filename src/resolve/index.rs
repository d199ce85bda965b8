//! External documentation index for types outside the documented assembly.
//!
//! The HTTP implementation queries an xref service:
//! `GET <base>?uid=System.String` → `[{"name": "String", "href": "https://..."}]`.

use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_XREF_URL: &str = "https://xref.docs.microsoft.com/query";

/// A resolved external reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalRef {
    pub name: String,
    #[serde(rename = "href")]
    pub url: String,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

pub trait ReferenceIndex {
    /// Find documentation for a fully qualified type name.
    fn lookup(&self, full_name: &str) -> Result<Option<ExternalRef>, LookupError>;
}

/// Blocking HTTP client for an xref query endpoint. No retries.
pub struct XrefService {
    agent: ureq::Agent,
    base_url: String,
}

impl XrefService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        XrefService {
            agent,
            base_url: base_url.into(),
        }
    }
}

impl Default for XrefService {
    fn default() -> Self {
        Self::new(DEFAULT_XREF_URL)
    }
}

impl ReferenceIndex for XrefService {
    fn lookup(&self, full_name: &str) -> Result<Option<ExternalRef>, LookupError> {
        debug!(uid = full_name, "querying xref service");
        let response = self
            .agent
            .get(&self.base_url)
            .query("uid", full_name)
            .call()
            .map_err(|e| LookupError::Request {
                url: self.base_url.clone(),
                source: Box::new(e),
            })?;
        let entries: Vec<ExternalRef> =
            response.into_json().map_err(|e| LookupError::Decode {
                url: self.base_url.clone(),
                source: e,
            })?;
        Ok(entries.into_iter().next())
    }
}

/// Never finds anything; used with `--offline`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Offline;

impl ReferenceIndex for Offline {
    fn lookup(&self, _full_name: &str) -> Result<Option<ExternalRef>, LookupError> {
        Ok(None)
    }
}

/// Remembers every answer so each name is queried at most once per run.
/// A failed query is remembered as "no result".
pub struct Cached<I> {
    inner: I,
    memo: RefCell<HashMap<String, Option<ExternalRef>>>,
}

impl<I: ReferenceIndex> Cached<I> {
    pub fn new(inner: I) -> Self {
        Cached {
            inner,
            memo: RefCell::new(HashMap::new()),
        }
    }
}

impl<I: ReferenceIndex> ReferenceIndex for Cached<I> {
    fn lookup(&self, full_name: &str) -> Result<Option<ExternalRef>, LookupError> {
        if let Some(hit) = self.memo.borrow().get(full_name) {
            return Ok(hit.clone());
        }
        let result = self.inner.lookup(full_name);
        let remembered = result.as_ref().ok().cloned().flatten();
        self.memo
            .borrow_mut()
            .insert(full_name.to_string(), remembered);
        result
    }
}

#[cfg(test)]
pub(crate) mod stub {
    //! Canned index for tests.

    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    pub struct StubIndex {
        entries: HashMap<String, ExternalRef>,
        pub calls: Cell<usize>,
        pub fail: bool,
    }

    impl StubIndex {
        pub fn with(mut self, full_name: &str, name: &str, url: &str) -> Self {
            self.entries.insert(
                full_name.to_string(),
                ExternalRef {
                    name: name.to_string(),
                    url: url.to_string(),
                },
            );
            self
        }

        pub fn failing() -> Self {
            StubIndex {
                fail: true,
                ..Default::default()
            }
        }
    }

    impl ReferenceIndex for StubIndex {
        fn lookup(&self, full_name: &str) -> Result<Option<ExternalRef>, LookupError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(LookupError::Decode {
                    url: "stub".to_string(),
                    source: std::io::Error::other("offline"),
                });
            }
            Ok(self.entries.get(full_name).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::stub::StubIndex;
    use super::*;

    #[test]
    fn offline_finds_nothing() {
        assert_eq!(Offline.lookup("System.String").unwrap(), None);
    }

    #[test]
    fn cache_queries_once() {
        let cached = Cached::new(StubIndex::default().with(
            "System.String",
            "String",
            "https://example.com/system.string",
        ));
        for _ in 0..3 {
            let hit = cached.lookup("System.String").unwrap().unwrap();
            assert_eq!(hit.name, "String");
        }
        assert_eq!(cached.inner.calls.get(), 1);
    }

    #[test]
    fn cache_remembers_failures_as_misses() {
        let cached = Cached::new(StubIndex::failing());
        assert!(cached.lookup("System.String").is_err());
        assert_eq!(cached.lookup("System.String").unwrap(), None);
        assert_eq!(cached.inner.calls.get(), 1);
    }

    #[test]
    fn xref_payload_decodes() {
        let payload = r#"[{"uid":"System.String","name":"String","fullName":"System.String","href":"https://learn.microsoft.com/dotnet/api/system.string"}]"#;
        let entries: Vec<ExternalRef> = serde_json::from_str(payload).unwrap();
        assert_eq!(entries[0].url, "https://learn.microsoft.com/dotnet/api/system.string");
    }
}
