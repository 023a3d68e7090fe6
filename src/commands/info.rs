use crate::paths::file_size;
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let doc = PdfDocument::open(&path)?;
    let info = doc.get_info();
    let size = file_size(&path)?;

    println!("File: {}", path.as_ref().display());
    println!("Size: {:.2} MB ({} bytes)", size as f64 / (1024.0 * 1024.0), size);
    println!("PDF version: {}", info.version);
    println!("Pages: {}", info.page_count);

    let fields = [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
        ("Keywords", &info.keywords),
        ("Creator", &info.creator),
        ("Producer", &info.producer),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", label, value);
        }
    }
    if let Some(creation_date) = &info.creation_date {
        println!("Created: {}", format_pdf_date(creation_date));
    }
    if let Some(mod_date) = &info.mod_date {
        println!("Modified: {}", format_pdf_date(mod_date));
    }

    Ok(())
}

/// Render `D:YYYYMMDDHHmmSS...` as `YYYY-MM-DD HH:mm:SS`.
pub fn format_pdf_date(date: &str) -> String {
    let Some(d) = date.strip_prefix("D:") else {
        return date.to_string();
    };
    if !all_digits(d, 0..8) {
        return date.to_string();
    }

    let mut out = format!("{}-{}-{}", &d[0..4], &d[4..6], &d[6..8]);
    if all_digits(d, 8..14) {
        out.push_str(&format!(" {}:{}:{}", &d[8..10], &d[10..12], &d[12..14]));
    }
    out
}

fn all_digits(s: &str, range: std::ops::Range<usize>) -> bool {
    s.as_bytes()
        .get(range)
        .is_some_and(|bytes| bytes.iter().all(u8::is_ascii_digit))
}
