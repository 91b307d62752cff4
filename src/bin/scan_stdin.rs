//! Simple CLI that reads HTML from stdin and writes the extraction
//! response payload as JSON to stdout.
//!
//! Usage: `scan_stdin [page-url] < page.html`

use std::io::{self, Read};

use picscan::{extract_images_bytes_with_settings, ExtractResponse, ExtractionSettings};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "picscan=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let mut html = Vec::new();
    if io::stdin().read_to_end(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let settings = ExtractionSettings {
        page_url: std::env::args().nth(1),
        ..ExtractionSettings::default()
    };

    let result = extract_images_bytes_with_settings(&html, &settings);
    let response = ExtractResponse::from_result(result);

    println!("{}", serde_json::to_string(&response).unwrap_or_default());
}
