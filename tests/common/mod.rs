//! Shared fixtures for integration tests
//!
//! [`WxrBuilder`] assembles WXR documents from fragments so each test only
//! spells out the elements it cares about.

#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;
use wxrtools::handler::CollectingHandler;
use wxrtools::{ExtractionStats, Extractor, ExtractorConfig};

/// Namespace declarations of a WXR 1.2 export
pub const WXR_1_2_NAMESPACES: &str = r#"xmlns:excerpt="http://wordpress.org/export/1.2/excerpt/"
    xmlns:content="http://purl.org/rss/1.0/modules/content/"
    xmlns:wfw="http://wellformedweb.org/CommentAPI/"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:wp="http://wordpress.org/export/1.2/""#;

/// Builder for a complete export document
#[derive(Debug, Clone)]
pub struct WxrBuilder {
    namespaces: String,
    channel: Vec<String>,
}

impl WxrBuilder {
    pub fn new() -> Self {
        Self {
            namespaces: WXR_1_2_NAMESPACES.to_string(),
            channel: Vec::new(),
        }
    }

    /// Replace the namespace declarations on the root element
    pub fn namespaces(mut self, declarations: &str) -> Self {
        self.namespaces = declarations.to_string();
        self
    }

    /// Append a raw fragment inside `channel`
    pub fn channel_xml(mut self, xml: &str) -> Self {
        self.channel.push(xml.to_string());
        self
    }

    pub fn title(self, title: &str) -> Self {
        self.channel_xml(&format!("<title>{}</title>", title))
    }

    pub fn link(self, link: &str) -> Self {
        self.channel_xml(&format!("<link>{}</link>", link))
    }

    pub fn author(self, id: &str, login: &str) -> Self {
        self.channel_xml(&format!(
            "<wp:author><wp:author_id>{}</wp:author_id><wp:author_login>{}</wp:author_login></wp:author>",
            id, login
        ))
    }

    pub fn image(self, url: &str) -> Self {
        self.channel_xml(&format!("<image><url>{}</url></image>", url))
    }

    /// An item with a title and status
    pub fn item(self, title: &str, status: &str) -> Self {
        self.channel_xml(&format!(
            "<item><title>{}</title><wp:status>{}</wp:status><wp:post_type>post</wp:post_type></item>",
            title, status
        ))
    }

    pub fn build(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\"\n    {}>\n<channel>\n{}\n</channel>\n</rss>\n",
            self.namespaces,
            self.channel.join("\n")
        )
    }

    /// Write the document to a temporary file
    pub fn write_temp(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(self.build().as_bytes()).unwrap();
        file
    }
}

impl Default for WxrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract `xml` into a collecting handler
pub fn collect(xml: &str) -> (CollectingHandler, ExtractionStats) {
    collect_with(xml, &ExtractorConfig::new())
}

/// Extract `xml` into a collecting handler with a custom configuration
pub fn collect_with(xml: &str, config: &ExtractorConfig) -> (CollectingHandler, ExtractionStats) {
    let mut collector = CollectingHandler::new();
    let stats = Extractor::from_reader(xml.as_bytes(), &mut collector, config)
        .run()
        .unwrap();
    (collector, stats)
}
