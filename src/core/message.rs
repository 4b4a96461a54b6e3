//! Outbound chat message model
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use serde::{Deserialize, Serialize};

/// A single piece of an outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    Plain { text: String },
    Image { url: String },
}

impl Component {
    /// Image component referencing a remote URL
    pub fn image_from_url(url: impl Into<String>) -> Self {
        Component::Image { url: url.into() }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Component::Plain { text: text.into() }
    }
}

/// Ordered list of components delivered as one chat message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageChain {
    pub chain: Vec<Component>,
}

impl MessageChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_components(chain: Vec<Component>) -> Self {
        Self { chain }
    }

    /// Append a text component
    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.chain.push(Component::plain(text));
        self
    }

    /// Append an image component built from a URL
    pub fn url_image(mut self, url: impl Into<String>) -> Self {
        self.chain.push(Component::image_from_url(url));
        self
    }

    pub fn components(&self) -> &[Component] {
        &self.chain
    }

    /// URLs of all image components, in order
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        self.chain.iter().filter_map(|c| match c {
            Component::Image { url } => Some(url.as_str()),
            Component::Plain { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_image_chain() {
        let chain = MessageChain::new().url_image("https://x/a.png");
        assert_eq!(chain.len(), 1);
        assert_eq!(
            chain.components()[0],
            Component::Image {
                url: "https://x/a.png".to_string()
            }
        );
        assert_eq!(chain.image_urls().collect::<Vec<_>>(), vec!["https://x/a.png"]);
    }

    #[test]
    fn test_mixed_chain_order() {
        let chain = MessageChain::new()
            .message("here you go")
            .url_image("https://x/b.png");
        assert_eq!(chain.len(), 2);
        assert!(matches!(chain.components()[0], Component::Plain { .. }));
        assert_eq!(chain.image_urls().count(), 1);
    }

    #[test]
    fn test_component_serialization_is_tagged() {
        let json = serde_json::to_value(Component::image_from_url("https://x/c.png")).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["url"], "https://x/c.png");
    }
}
