//! Shared fixtures for integration tests: small real PDFs and scripted
//! backends. No test here touches the network.

#![allow(dead_code)]

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use quizcraft::{AppConfig, ChatBackend, LlmError, ProviderGateway};
use quizcraft::provider::{ChatMessage, ChatOptions};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Write a PDF with one Courier text line per page.
pub fn write_text_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).expect("save test pdf");
}

/// Config whose pdfium path cannot bind, forcing the text-layer path.
pub fn config_without_renderer(scratch: &Path) -> AppConfig {
    AppConfig::builder()
        .pdfium_lib_path(scratch.join("missing-libpdfium.so"))
        .generator_timeout_secs(5)
        .build()
        .expect("valid config")
}

/// Backend that fails every call and counts them.
pub struct DownBackend {
    pub name: &'static str,
    pub calls: AtomicUsize,
}

impl DownBackend {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for DownBackend {
    fn name(&self) -> &str {
        self.name
    }

    async fn chat(&self, _messages: &[ChatMessage], _options: &ChatOptions) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LlmError::Api {
            backend: self.name.to_string(),
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

/// Backend that echoes the last user message and counts calls.
pub struct EchoBackend {
    pub calls: AtomicUsize,
}

impl EchoBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for EchoBackend {
    fn name(&self) -> &str {
        "echo"
    }

    async fn chat(&self, messages: &[ChatMessage], _options: &ChatOptions) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(messages.last().map(|m| m.text()).unwrap_or_default())
    }
}

/// Primary and fallback both down.
pub fn gateway_all_down() -> (ProviderGateway, Arc<DownBackend>, Arc<DownBackend>) {
    let primary = DownBackend::new("groq");
    let fallback = DownBackend::new("nvidia");
    let gateway = ProviderGateway::new()
        .with_backend(primary.clone(), None)
        .with_backend(fallback.clone(), Some(4096));
    (gateway, primary, fallback)
}
