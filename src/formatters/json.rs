use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::core::Link;

/// JSON serialization of the link list handed to the visualization
/// consumer. The core engine produces the in-memory list; this is the
/// only place it takes on a wire shape.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format_links(&self, links: &[Link]) -> Result<String> {
        let output = if self.pretty {
            serde_json::to_string_pretty(links)?
        } else {
            serde_json::to_string(links)?
        };
        Ok(output)
    }

    pub fn format_to_file(&self, links: &[Link], output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format_links(links)?)?;
        Ok(())
    }
}
