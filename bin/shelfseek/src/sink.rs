//! Reply sink that prints to stdout.

use async_trait::async_trait;
use rootcause::Report;
use shelfseek_conversation::{Reply, ReplyKind, ReplySink, SinkError};
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

/// Writes each reply to stdout followed by a blank line.
pub struct StdoutSink {
    out: Mutex<Stdout>,
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self {
            out: Mutex::new(tokio::io::stdout()),
        }
    }
}

#[async_trait]
impl ReplySink for StdoutSink {
    async fn deliver(&self, reply: Reply) -> Result<(), Report<SinkError>> {
        let text = match reply.kind {
            ReplyKind::Status => format!("… {}\n", reply.text),
            ReplyKind::Final => format!("{}\n\n", reply.text),
        };

        let mut out = self.out.lock().await;
        out.write_all(text.as_bytes())
            .await
            .map_err(|e| SinkError::DeliveryFailed {
                reason: e.to_string(),
            })?;
        out.flush().await.map_err(|e| SinkError::DeliveryFailed {
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
