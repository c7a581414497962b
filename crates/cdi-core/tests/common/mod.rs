//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod zip_server;

use std::io::Write;

/// Builds an in-memory driver archive whose executable prints a ChromeDriver
/// banner for `version` when run with `--version`.
pub fn driver_zip(version: &str) -> Vec<u8> {
    let script = format!(
        "#!/bin/sh\necho \"ChromeDriver {}.0 (0000000000000000000000000000000000000000)\"\n",
        version
    );
    let name = if cfg!(windows) {
        "chromedriver.exe"
    } else {
        "chromedriver"
    };
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::FileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file(name, options).unwrap();
    zip.write_all(script.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}
