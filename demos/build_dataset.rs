//! Basic usage example for the citeset library.
//!
//! Reads PDFs from a folder, fetches a couple of web pages, prints a preview
//! of the resulting records and writes them to `citations.json`.
//!
//! ```sh
//! cargo run --example build_dataset -- ./PDFs https://example.com
//! ```

use citeset::dataset::write_dataset;
use citeset::utils::{HttpClient, TracingSink, DEFAULT_TIMEOUT};
use citeset::{DatasetBuilder, LinkRegistry};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("citeset=info")
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let folder = PathBuf::from(args.next().unwrap_or_else(|| "PDFs".to_string()));
    let urls: Vec<String> = args.collect();

    let sink = Arc::new(TracingSink);
    let builder = DatasetBuilder::new(HttpClient::new(DEFAULT_TIMEOUT)?, sink.clone());

    // Use the registry next to the PDFs when there is one
    let registry_path = folder.join("urls-for-document-references.csv");
    let registry = if registry_path.is_file() {
        LinkRegistry::load(&registry_path, sink.as_ref())
    } else {
        LinkRegistry::empty()
    };
    println!("Registry entries: {}", registry.len());

    let (dataset, summary) = builder.collect(&folder, &urls, &registry).await;
    println!(
        "{} PDF pages from {} files, {} web pages from {} URLs\n",
        summary.pdf_records, summary.pdf_files, summary.web_records, summary.urls
    );

    for (i, record) in dataset.citations.iter().take(3).enumerate() {
        println!("{}. [{}] {}", i + 1, record.source_type, record.document_title);
        if let Some(page) = record.page_number {
            println!("   Page: {}", page);
        }
        if let Some(link) = record.web_link.as_deref().or(record.url.as_deref()) {
            println!("   Link: {}", link);
        }
        let preview: String = record.text.chars().take(120).collect();
        println!("   {}", preview);
    }

    write_dataset(&dataset, &PathBuf::from("citations.json"))?;
    println!("\nWrote {} citations to citations.json", dataset.len());

    Ok(())
}
