//! Integration tests for citeset
//!
//! These tests run the full pipeline against real files in a temporary
//! folder and a local mock HTTP server.

use citeset::dataset::DatasetBuilder;
use citeset::models::{Dataset, SourceType};
use citeset::utils::{HttpClient, MemorySink, DEFAULT_TIMEOUT};
use citeset::CitationError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;
use std::sync::Arc;

/// Write a PDF with one page per entry of `pages`
fn write_pdf(path: &Path, pages: &[&str], title: Option<&str>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    doc.save(path).unwrap();
}

fn builder() -> (Arc<MemorySink>, DatasetBuilder) {
    let sink = Arc::new(MemorySink::new());
    let client = HttpClient::new(DEFAULT_TIMEOUT).unwrap();
    (sink.clone(), DatasetBuilder::new(client, sink))
}

fn read_output(path: &Path) -> (serde_json::Value, Dataset) {
    let raw = std::fs::read_to_string(path).unwrap();
    (
        serde_json::from_str(&raw).unwrap(),
        serde_json::from_str(&raw).unwrap(),
    )
}

/// Two-page PDF with a registry mapping and no URLs
#[tokio::test]
async fn test_pdf_with_registry_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("PDFs");
    std::fs::create_dir(&folder).unwrap();
    write_pdf(
        &folder.join("report.pdf"),
        &["Page one text", "Page two text"],
        Some("Embedded Title"),
    );
    std::fs::write(folder.join("readme.txt"), "not a pdf").unwrap();

    let registry = dir.path().join("links.csv");
    std::fs::write(
        &registry,
        "Document Name,Title,Web Link\nreport.pdf,Annual Report,https://x/report\n",
    )
    .unwrap();
    let output = dir.path().join("citations.json");
    let (sink, builder) = builder();

    let summary = builder
        .build(&folder, &[], Some(registry.as_path()), &output)
        .await;

    assert_eq!(summary.pdf_files, 1);
    assert_eq!(summary.records(), 2);
    assert!(summary.written);
    assert!(sink.failures().is_empty());

    let (json, dataset) = read_output(&output);
    assert_eq!(json.as_object().unwrap().len(), 1);
    assert_eq!(dataset.len(), 2);
    for (index, record) in dataset.citations.iter().enumerate() {
        assert_eq!(record.source_type, SourceType::Pdf);
        assert_eq!(record.document_title, "Annual Report");
        assert_eq!(record.page_number, Some(index as u32 + 1));
        assert_eq!(record.web_link.as_deref(), Some("https://x/report"));
        assert!(record.url.is_none());
    }
    assert!(dataset.citations[0].text.contains("Page one"));
    assert!(dataset.citations[1].text.contains("Page two"));
}

/// One URL with a titled page and no PDFs
#[tokio::test]
async fn test_web_page_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html><head><title>Example</title></head><body><p>Hello</p></body></html>")
        .create_async()
        .await;
    let url = server.url();

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("citations.json");
    let (_, builder) = builder();

    let summary = builder
        .build(dir.path(), std::slice::from_ref(&url), None, &output)
        .await;

    assert_eq!(summary.pdf_files, 0);
    assert_eq!(summary.web_records, 1);

    let (json, dataset) = read_output(&output);
    assert_eq!(dataset.len(), 1);
    let record = &dataset.citations[0];
    assert_eq!(record.source_type, SourceType::Web);
    assert_eq!(record.document_title, "Example");
    assert_eq!(record.url.as_deref(), Some(url.as_str()));
    assert!(json["citations"][0]["page_number"].is_null());
}

/// Unmatched PDFs fall back to metadata or file name and carry no link
#[tokio::test]
async fn test_unmatched_pdfs_carry_no_link() {
    let dir = tempfile::tempdir().unwrap();
    write_pdf(&dir.path().join("Memo.PDF"), &["memo"], None);
    write_pdf(&dir.path().join("brief.pdf"), &["brief"], Some("Policy Brief"));
    let output = dir.path().join("out").with_extension("json");
    let (_, builder) = builder();

    builder.build(dir.path(), &[], None, &output).await;

    let (json, dataset) = read_output(&output);
    let mut titles: Vec<&str> = dataset
        .citations
        .iter()
        .map(|r| r.document_title.as_str())
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["Memo", "Policy Brief"]);
    for record in json["citations"].as_array().unwrap() {
        assert!(record.get("web_link").is_none());
    }
}

/// Failed URLs contribute nothing and do not stop later inputs
#[tokio::test]
async fn test_failed_fetch_does_not_abort_run() {
    let mut server = mockito::Server::new_async().await;
    let _broken = server
        .mock("GET", "/broken")
        .with_status(500)
        .create_async()
        .await;
    let _ok = server
        .mock("GET", "/ok")
        .with_status(200)
        .with_body("<title>Fine</title><p>still here</p>")
        .create_async()
        .await;
    let urls = vec![
        format!("{}/broken", server.url()),
        format!("{}/ok", server.url()),
    ];

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("citations.json");
    let (sink, builder) = builder();

    let summary = builder.build(dir.path(), &urls, None, &output).await;

    assert_eq!(summary.urls, 2);
    assert_eq!(summary.web_records, 1);
    assert!(matches!(
        sink.failures().as_slice(),
        [CitationError::WebFetch { .. }]
    ));

    let (_, dataset) = read_output(&output);
    assert_eq!(dataset.citations[0].document_title, "Fine");
    assert_eq!(dataset.citations[0].url.as_deref(), Some(urls[1].as_str()));
}

/// PDF records come before web records, web records keep URL order
#[tokio::test]
async fn test_pdfs_then_urls_in_order() {
    let mut server = mockito::Server::new_async().await;
    let _a = server
        .mock("GET", "/a")
        .with_body("<title>A</title>")
        .create_async()
        .await;
    let _b = server
        .mock("GET", "/b")
        .with_body("<title>B</title>")
        .create_async()
        .await;
    let urls = vec![format!("{}/b", server.url()), format!("{}/a", server.url())];

    let dir = tempfile::tempdir().unwrap();
    write_pdf(&dir.path().join("doc.pdf"), &["one", "two", "three"], None);
    let output = dir.path().join("citations.json");
    let (_, builder) = builder();

    builder.build(dir.path(), &urls, None, &output).await;

    let (_, dataset) = read_output(&output);
    let kinds: Vec<SourceType> = dataset.citations.iter().map(|r| r.source_type).collect();
    assert_eq!(
        kinds,
        vec![
            SourceType::Pdf,
            SourceType::Pdf,
            SourceType::Pdf,
            SourceType::Web,
            SourceType::Web
        ]
    );
    assert_eq!(dataset.citations[3].document_title, "B");
    assert_eq!(dataset.citations[4].document_title, "A");
}

/// Registry with a BOM and mixed-case names matches case-insensitively
#[tokio::test]
async fn test_registry_matches_case_insensitively() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("docs");
    std::fs::create_dir(&folder).unwrap();
    write_pdf(&folder.join("Guidance.PDF"), &["guidance"], None);

    let registry = dir.path().join("links.csv");
    std::fs::write(
        &registry,
        "\u{feff}Document Name,Title,Web Link\n  guidance.pdf ,Clinical Guidance,\n",
    )
    .unwrap();
    let output = dir.path().join("citations.json");
    let (_, builder) = builder();

    builder
        .build(&folder, &[], Some(registry.as_path()), &output)
        .await;

    let (json, dataset) = read_output(&output);
    assert_eq!(dataset.citations[0].document_title, "Clinical Guidance");
    assert!(json["citations"][0].get("web_link").is_none());
}
