//! Download link lookup.
//!
//! A download runs in two steps so the caller can report progress between
//! them: [`DownloadResolver::resolve_identifier`] settles which content hash
//! the user means, then [`DownloadResolver::fetch_links`] asks the service
//! for that hash's links.

use crate::client::BookIndexClient;
use crate::error::BookIndexError;
use crate::model::DownloadLinkSet;
use rootcause::Report;
use shelfseek_ai::{BookIdentification, Extractor, book_identification_template};
use shelfseek_core::ContentHash;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Path of the download endpoint.
pub const DOWNLOAD_ENDPOINT: &str = "download";

/// Where a resolved hash came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// The hash appeared verbatim in the user's message.
    Direct,
    /// The extractor picked the hash out of the conversation.
    Extracted {
        title: Option<String>,
        author: Option<String>,
    },
}

/// A content hash together with how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentifier {
    pub hash: ContentHash,
    pub provenance: Provenance,
}

impl ResolvedIdentifier {
    /// Progress notice to send before the links are fetched.
    ///
    /// Only extracted identifiers get one; a hash the user typed needs no
    /// confirmation.
    #[must_use]
    pub fn status_message(&self) -> Option<String> {
        match &self.provenance {
            Provenance::Direct => None,
            Provenance::Extracted { title, author } => Some(format!(
                "Downloading `{}` by `{}`…",
                title.as_deref().unwrap_or("this book"),
                author.as_deref().unwrap_or("an unknown author"),
            )),
        }
    }
}

/// Resolves a download request into links.
#[derive(Clone)]
pub struct DownloadResolver {
    client: BookIndexClient,
    extractor: Arc<dyn Extractor>,
}

impl DownloadResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(client: BookIndexClient, extractor: Arc<dyn Extractor>) -> Self {
        Self { client, extractor }
    }

    /// Works out which content hash `text` refers to.
    ///
    /// A hash inside `text` wins outright. Otherwise the extractor is asked
    /// once, over `context` (recent conversation including `text`).
    ///
    /// # Errors
    ///
    /// - `Configuration` if no API key is set (the extractor is not consulted)
    /// - `ExtractionFailed` if the extractor fails
    /// - `IdentifierNotFound` if the extractor returns no well-formed hash
    #[instrument(skip(self, text, context))]
    pub async fn resolve_identifier(
        &self,
        text: &str,
        context: &str,
    ) -> Result<ResolvedIdentifier, Report<BookIndexError>> {
        self.client.ensure_configured()?;

        if let Some(hash) = ContentHash::find_in(text) {
            info!(hash = %hash, "Using content hash from message");
            return Ok(ResolvedIdentifier {
                hash,
                provenance: Provenance::Direct,
            });
        }

        let value = self
            .extractor
            .extract(&book_identification_template(), context)
            .await
            .map_err(|report| {
                warn!(error = %report, "Book identification failed");
                BookIndexError::ExtractionFailed {
                    reason: report.current_context().to_string(),
                }
            })?;

        let identification = BookIdentification::from_value(&value).map_err(|e| {
            warn!(error = %e, "Extractor returned an unusable object");
            BookIndexError::ExtractionFailed {
                reason: e.to_string(),
            }
        })?;

        let Some(hash) = identification.content_hash() else {
            warn!(md5 = ?identification.md5, "Extractor returned no usable content hash");
            return Err(BookIndexError::IdentifierNotFound.into());
        };

        info!(
            hash = %hash,
            title = ?identification.title,
            "Identified book from conversation"
        );
        Ok(ResolvedIdentifier {
            hash,
            provenance: Provenance::Extracted {
                title: identification.title,
                author: identification.author,
            },
        })
    }

    /// Fetches the download links for `hash`.
    ///
    /// # Errors
    ///
    /// - `Configuration` if no API key is set (no request is sent)
    /// - `RequestFailed`, `ResponseParse` or `Api` from the exchange
    #[instrument(skip(self, hash), fields(hash = %hash))]
    pub async fn fetch_links(
        &self,
        hash: &ContentHash,
    ) -> Result<DownloadLinkSet, Report<BookIndexError>> {
        let links: Vec<String> = self
            .client
            .get_json(DOWNLOAD_ENDPOINT, &[("md5", hash.as_str())])
            .await?;

        info!(link_count = links.len(), "Download lookup completed");
        Ok(DownloadLinkSet {
            hash: hash.clone(),
            links,
        })
    }

    /// Resolves and fetches in one call, for callers that don't report progress.
    ///
    /// # Errors
    ///
    /// As [`Self::resolve_identifier`] and [`Self::fetch_links`].
    pub async fn download(
        &self,
        text: &str,
        context: &str,
    ) -> Result<DownloadLinkSet, Report<BookIndexError>> {
        let resolved = self.resolve_identifier(text, context).await?;
        self.fetch_links(&resolved.hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BookIndexConfig;
    use crate::render::render_download_links;
    use crate::testing::StubTransport;
    use serde_json::json;
    use shelfseek_ai::ExtractionError;
    use shelfseek_ai::testing::StubExtractor;

    const HASH: &str = "5b723c172fc4c8a77f476e7016ad3945";
    const OTHER: &str = "0123456789abcdef0123456789abcdef";
    const LINKS: &str = r#"["http://a","http://b"]"#;

    fn resolver(
        key: Option<&str>,
        transport: Arc<StubTransport>,
        extractor: Arc<StubExtractor>,
    ) -> DownloadResolver {
        let config = BookIndexConfig::new(key.map(str::to_string)).with_host("books.example");
        DownloadResolver::new(BookIndexClient::new(config, transport), extractor)
    }

    fn identifying(md5: &str) -> Arc<StubExtractor> {
        Arc::new(StubExtractor::returning(
            json!({"md5": md5, "title": "Dune", "author": "Frank Herbert"}),
        ))
    }

    #[tokio::test]
    async fn direct_hash_skips_extractor() {
        let transport = Arc::new(StubTransport::json(200, LINKS));
        let extractor = identifying(OTHER);
        let resolver = resolver(Some("key"), transport.clone(), extractor.clone());

        let links = resolver
            .download(&format!("Download book with MD5 {HASH}"), "")
            .await
            .expect("download");

        assert_eq!(extractor.calls(), 0);
        assert_eq!(links.hash.as_str(), HASH);
        assert_eq!(
            render_download_links(&links),
            "1. http://a\n2. http://b"
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/download");
        assert_eq!(requests[0].url.query(), Some(format!("md5={HASH}").as_str()));
    }

    #[tokio::test]
    async fn direct_hash_has_no_status_message() {
        let transport = Arc::new(StubTransport::json(200, LINKS));
        let resolver = resolver(Some("key"), transport, identifying(OTHER));

        let resolved = resolver
            .resolve_identifier(&format!("get {HASH} please"), "")
            .await
            .expect("resolve");
        assert_eq!(resolved.provenance, Provenance::Direct);
        assert!(resolved.status_message().is_none());
    }

    #[tokio::test]
    async fn natural_language_calls_extractor_once() {
        let transport = Arc::new(StubTransport::json(200, LINKS));
        let extractor = identifying(HASH);
        let resolver = resolver(Some("key"), transport.clone(), extractor.clone());

        let resolved = resolver
            .resolve_identifier("download the first one", "User: download the first one")
            .await
            .expect("resolve");

        assert_eq!(extractor.calls(), 1);
        assert_eq!(
            extractor.seen()[0],
            (
                "book_identification".to_string(),
                "User: download the first one".to_string()
            )
        );
        assert_eq!(resolved.hash.as_str(), HASH);
        assert_eq!(
            resolved.status_message().as_deref(),
            Some("Downloading `Dune` by `Frank Herbert`…")
        );
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn missing_md5_is_identifier_not_found_without_request() {
        let transport = Arc::new(StubTransport::json(200, LINKS));
        let extractor = Arc::new(StubExtractor::returning(json!({"title": "Dune"})));
        let resolver = resolver(Some("key"), transport.clone(), extractor.clone());

        let report = resolver
            .download("download that book", "User: download that book")
            .await
            .unwrap_err();

        assert_eq!(report.current_context(), &BookIndexError::IdentifierNotFound);
        assert_eq!(extractor.calls(), 1);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_md5_is_identifier_not_found() {
        let transport = Arc::new(StubTransport::json(200, LINKS));
        let resolver = resolver(Some("key"), transport.clone(), identifying("not-a-hash"));

        let report = resolver.download("download it", "").await.unwrap_err();
        assert_eq!(report.current_context(), &BookIndexError::IdentifierNotFound);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn extractor_failure_is_extraction_failure() {
        let transport = Arc::new(StubTransport::json(200, LINKS));
        let extractor = Arc::new(StubExtractor::failing(ExtractionError::NotAnObject {
            output: "sorry".to_string(),
        }));
        let resolver = resolver(Some("key"), transport.clone(), extractor);

        let report = resolver.download("download it", "").await.unwrap_err();
        assert!(matches!(
            report.current_context(),
            BookIndexError::ExtractionFailed { .. }
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn missing_key_short_circuits_both_steps() {
        let transport = Arc::new(StubTransport::json(200, LINKS));
        let extractor = identifying(HASH);
        let resolver = resolver(None, transport.clone(), extractor.clone());

        let report = resolver.download("download dune", "").await.unwrap_err();
        assert!(matches!(
            report.current_context(),
            BookIndexError::Configuration { .. }
        ));

        let hash: ContentHash = HASH.parse().expect("hash");
        let report = resolver.fetch_links(&hash).await.unwrap_err();
        assert!(matches!(
            report.current_context(),
            BookIndexError::Configuration { .. }
        ));

        assert_eq!(extractor.calls(), 0);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let transport = Arc::new(StubTransport::json(200, "<html>oops</html>"));
        let resolver = resolver(Some("key"), transport, identifying(HASH));

        let report = resolver.download(HASH, "").await.unwrap_err();
        match report.current_context() {
            BookIndexError::ResponseParse { endpoint, body, .. } => {
                assert_eq!(endpoint, DOWNLOAD_ENDPOINT);
                assert_eq!(body, "<html>oops</html>");
            }
            other => panic!("expected ResponseParse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn object_body_is_parse_error() {
        let transport = Arc::new(StubTransport::json(200, r#"{"links": []}"#));
        let resolver = resolver(Some("key"), transport, identifying(HASH));

        let report = resolver.download(HASH, "").await.unwrap_err();
        assert!(matches!(
            report.current_context(),
            BookIndexError::ResponseParse { .. }
        ));
    }

    #[tokio::test]
    async fn empty_link_list_is_not_an_error() {
        let transport = Arc::new(StubTransport::json(200, "[]"));
        let resolver = resolver(Some("key"), transport, identifying(HASH));

        let links = resolver.download(HASH, "").await.expect("download");
        assert!(links.is_empty());
        assert_eq!(render_download_links(&links), crate::render::NO_LINKS);
    }

    #[test]
    fn status_message_falls_back_when_fields_are_missing() {
        let resolved = ResolvedIdentifier {
            hash: HASH.parse().expect("hash"),
            provenance: Provenance::Extracted {
                title: None,
                author: None,
            },
        };
        assert_eq!(
            resolved.status_message().as_deref(),
            Some("Downloading `this book` by `an unknown author`…")
        );
    }
}
