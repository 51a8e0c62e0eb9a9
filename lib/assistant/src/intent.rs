//! Message routing.

use shelfseek_core::ContentHash;
use std::fmt;

/// Which handler a message goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Find books matching the message.
    Search,
    /// Fetch download links for a book.
    Download,
}

impl Intent {
    /// Classifies a message.
    ///
    /// A message is a download request if it carries a content hash or the
    /// word "download"; everything else is a search.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let mentions_download = text
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word.eq_ignore_ascii_case("download"));

        if mentions_download || ContentHash::find_in(text).is_some() {
            Self::Download
        } else {
            Self::Search
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Download => write!(f, "download"),
        }
    }
}
