//! `/chat`: AI coach conversations.

use super::{PageObject, PageTimeouts};
use crate::config::SuiteConfig;
use crate::locator::{Locator, Selector};
use crate::url::UrlPattern;

/// Chat page
#[derive(Debug, Clone)]
pub struct ChatPage {
    timeouts: PageTimeouts,
}

impl ChatPage {
    /// Create the page object
    #[must_use]
    pub const fn new(config: &SuiteConfig) -> Self {
        Self {
            timeouts: PageTimeouts::from_config(config),
        }
    }

    /// Button starting a new conversation
    #[must_use]
    pub fn new_chat(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("new-chat-button"))
    }

    /// Message composer
    #[must_use]
    pub fn message_input(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("message-input"))
    }

    /// Existing conversations
    #[must_use]
    pub fn conversation_list(&self) -> Locator {
        self.timeouts.locate(Selector::test_id("conversation-list"))
    }

    /// Where the new-chat control leads
    #[must_use]
    pub fn new_conversation_route() -> UrlPattern {
        UrlPattern::path("/chat/new")
    }

    /// An existing conversation
    #[must_use]
    pub fn conversation_route() -> UrlPattern {
        UrlPattern::route("/chat/:id")
    }
}

impl PageObject for ChatPage {
    fn path(&self) -> &str {
        "/chat"
    }

    fn page_name(&self) -> &'static str {
        "chat"
    }

    fn timeouts(&self) -> &PageTimeouts {
        &self.timeouts
    }

    fn landmarks(&self) -> Vec<Locator> {
        vec![self.new_chat()]
    }
}
