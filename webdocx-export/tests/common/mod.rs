//! Shared fixtures: a tiny PNG, a scripted fetcher and sample pages.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use webdocx_export::fetch::ResourceFetcher;
use webdocx_export::FetchError;

/// A 1x1 PNG
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn tiny_png() -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .decode(TINY_PNG_BASE64)
        .unwrap()
}

pub fn tiny_png_data_uri() -> String {
    format!("data:image/png;base64,{TINY_PNG_BASE64}")
}

/// Wrap `body` in a page with an export container of class `export`.
pub fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>t</title></head><body><div class=\"export\">{body}</div></body></html>"
    )
}

pub fn report_page() -> String {
    page(
        r#"<h1 id="head-line">Report</h1>
           <p>Body text.</p>
           <table>
             <tr><td>1</td><td>2</td></tr>
             <tr><td>3</td><td>4</td></tr>
           </table>"#,
    )
}

/// Serves the tiny PNG for every known source after a per-source delay, and records the
/// order in which fetches complete.
#[derive(Default, Clone)]
pub struct ScriptedFetcher {
    delays: HashMap<String, Duration>,
    completed: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, source_ref: &str, delay: Duration) -> Self {
        self.delays.insert(source_ref.to_string(), delay);
        self
    }

    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceFetcher for ScriptedFetcher {
    async fn fetch(&self, source_ref: &str) -> Result<Vec<u8>, FetchError> {
        let Some(delay) = self.delays.get(source_ref) else {
            return Err(FetchError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                source_ref.to_string(),
            )));
        };
        tokio::time::sleep(*delay).await;
        self.completed.lock().unwrap().push(source_ref.to_string());
        Ok(tiny_png())
    }
}
