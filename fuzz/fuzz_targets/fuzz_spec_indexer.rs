#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use specfile::export::{write_scan, ExportFormat};
use specfile::file::FileIndex;

fuzz_target!(|data: &[u8]| {
    // Index in two passes so the reopen path is exercised too
    let split = data.len() / 2;
    let mut index = FileIndex::new();
    if index.index(&mut Cursor::new(&data[..split])).is_err() {
        return;
    }
    if index.index(&mut Cursor::new(data)).is_err() {
        return;
    }

    for header in index.headers() {
        let _ = header.creator();
        let _ = header.epoch_datetime();
    }

    // Parsing and exporting must never panic, whatever the content
    for scan in index.scans() {
        let _ = scan.meta();
        let mut out = Vec::new();
        let _ = write_scan(&scan, &mut out, ExportFormat::Csv);
    }
});
