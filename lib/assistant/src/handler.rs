//! Request handlers.
//!
//! Each handler runs one request from message to final reply. Handlers do not
//! return errors: a failure is logged with its full report and the user gets
//! an apology through the sink instead. Every invocation delivers exactly one
//! `Final` reply and returns its text so the host can record it.

use crate::intent::Intent;
use crate::reply::{Operation, apology};
use shelfseek_ai::Extractor;
use shelfseek_book_index::{
    BookIndexClient, BookIndexConfig, DownloadResolver, HttpTransport, SearchResolver,
    render_download_links, render_search_results,
};
use shelfseek_conversation::{Conversation, DEFAULT_CONTEXT_WINDOW, MessageRole, Reply, ReplySink};
use shelfseek_core::RequestId;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// The book assistant: search and download handlers over one book index.
#[derive(Clone)]
pub struct BookAssistant {
    search: SearchResolver,
    download: DownloadResolver,
    history_window: usize,
}

impl BookAssistant {
    /// Creates an assistant.
    #[must_use]
    pub fn new(
        config: BookIndexConfig,
        transport: Arc<dyn HttpTransport>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        let client = BookIndexClient::new(config, transport);
        Self {
            search: SearchResolver::new(client.clone(), extractor.clone()),
            download: DownloadResolver::new(client, extractor),
            history_window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    /// Sets how many past messages the download path shows the extractor.
    #[must_use]
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Routes `message` to the search or download handler.
    ///
    /// `history` holds the conversation so far, not including `message`.
    pub async fn handle(
        &self,
        message: &str,
        history: &Conversation,
        sink: &dyn ReplySink,
    ) -> String {
        let intent = Intent::classify(message);
        debug!(%intent, "Routing message");
        match intent {
            Intent::Search => self.handle_search(message, sink).await,
            Intent::Download => self.handle_download(message, history, sink).await,
        }
    }

    /// Extracts a search term, searches, and replies with the results.
    #[instrument(skip_all, fields(request_id = %RequestId::new()))]
    pub async fn handle_search(&self, message: &str, sink: &dyn ReplySink) -> String {
        let text = match self.search.search_text(message).await {
            Ok((term, result)) => {
                info!(
                    term = %term,
                    total = result.total,
                    book_count = result.books.len(),
                    "Search handled"
                );
                render_search_results(&result)
            }
            Err(report) => {
                error!(error = %report, "Search request failed");
                apology(Operation::Search, report.current_context())
            }
        };

        deliver(sink, Reply::final_text(text.clone())).await;
        text
    }

    /// Resolves the requested book and replies with its download links.
    ///
    /// When the book had to be picked out of the conversation, a status
    /// reply naming it goes out before the links are fetched. That notice is
    /// optimistic; the lookup can still fail afterwards.
    #[instrument(skip_all, fields(request_id = %RequestId::new()))]
    pub async fn handle_download(
        &self,
        message: &str,
        history: &Conversation,
        sink: &dyn ReplySink,
    ) -> String {
        let context = self.extraction_context(message, history);

        let text = match self.download.resolve_identifier(message, &context).await {
            Ok(resolved) => {
                if let Some(status) = resolved.status_message() {
                    deliver(sink, Reply::status(status)).await;
                }
                match self.download.fetch_links(&resolved.hash).await {
                    Ok(links) => {
                        info!(
                            hash = %links.hash,
                            link_count = links.links.len(),
                            "Download handled"
                        );
                        render_download_links(&links)
                    }
                    Err(report) => {
                        error!(error = %report, hash = %resolved.hash, "Download lookup failed");
                        apology(Operation::Download, report.current_context())
                    }
                }
            }
            Err(report) => {
                error!(error = %report, "Download identifier resolution failed");
                apology(Operation::Download, report.current_context())
            }
        };

        deliver(sink, Reply::final_text(text.clone())).await;
        text
    }

    fn extraction_context(&self, message: &str, history: &Conversation) -> String {
        let current = format!("{}: {message}", MessageRole::User);
        let recent = history.render_context(self.history_window.saturating_sub(1));
        if recent.is_empty() {
            current
        } else {
            format!("{recent}\n{current}")
        }
    }
}

async fn deliver(sink: &dyn ReplySink, reply: Reply) {
    let kind = reply.kind;
    if let Err(report) = sink.deliver(reply).await {
        warn!(error = %report, ?kind, "Failed to deliver reply");
    }
}
