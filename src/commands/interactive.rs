//! Prompt-driven session that asks the same questions as the desktop dialogs:
//! pick files, pick a page range or compression level, pick where to save.
//!
//! Failures are reported inline and the menu comes back; only I/O errors on
//! the session's own streams end it early.

use crate::commands::{compress, merge, split};
use crate::error::Error;
use crate::page_range::PageSpan;
use crate::paths::with_pdf_extension;
use crate::pdf::{CompressionLevel, PdfDocument};
use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

enum MenuChoice {
    Merge,
    Split,
    Compress,
    Quit,
}

pub struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Session { input, output }
    }

    /// Show the menu until the user quits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.show_menu()?;
            let Some(answer) = self.prompt("Choose an option: ")? else {
                writeln!(self.output)?;
                return Ok(());
            };

            let choice = match parse_choice(&answer) {
                Some(choice) => choice,
                None => {
                    writeln!(self.output, "Error: Unknown option: {}", answer)?;
                    continue;
                }
            };

            let outcome = match choice {
                MenuChoice::Merge => self.merge_flow(),
                MenuChoice::Split => self.split_flow(),
                MenuChoice::Compress => self.compress_flow(),
                MenuChoice::Quit => return Ok(()),
            };

            match outcome {
                Ok(Some(message)) => writeln!(self.output, "{}", message)?,
                Ok(None) => writeln!(self.output, "Cancelled.")?,
                Err(err) => writeln!(self.output, "Error: {:#}", err)?,
            }
        }
    }

    fn show_menu(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "PDF Editor")?;
        writeln!(self.output, "  1) Merge PDFs")?;
        writeln!(self.output, "  2) Split PDF")?;
        writeln!(self.output, "  3) Compress PDF")?;
        writeln!(self.output, "  4) Quit")?;
        Ok(())
    }

    /// Returns `Ok(None)` when the user backs out.
    fn merge_flow(&mut self) -> Result<Option<String>> {
        writeln!(
            self.output,
            "Enter PDF files to merge, one per line (blank line to finish):"
        )?;
        let mut files = Vec::new();
        while let Some(line) = self.prompt("> ")? {
            if line.is_empty() {
                break;
            }
            files.push(PathBuf::from(unquote(&line)));
        }

        if files.is_empty() {
            return Ok(None);
        }
        if files.len() < 2 {
            return Err(Error::TooFewInputs(files.len()).into());
        }

        let Some((output, force)) = self.ask_output("Save merged PDF as: ")? else {
            return Ok(None);
        };
        let outcome = merge::merge(&files, &output, force)?;

        Ok(Some(format!(
            "Successfully merged {} PDFs! ({} pages) -> {}",
            outcome.files,
            outcome.pages,
            outcome.output.display()
        )))
    }

    fn split_flow(&mut self) -> Result<Option<String>> {
        let Some(source) = self.ask_path("PDF to split: ")? else {
            return Ok(None);
        };
        let doc = PdfDocument::open(&source)?;
        let total = split::ensure_splittable(&doc)?;

        let start = self
            .prompt(&format!("Start Page (1-{}): ", total))?
            .unwrap_or_default();
        let end = self
            .prompt(&format!("End Page (1-{}): ", total))?
            .unwrap_or_default();
        let span = PageSpan::from_answers(&start, &end, total)?;

        let Some((output, force)) = self.ask_output("Save split PDF as: ")? else {
            return Ok(None);
        };
        let outcome = split::split(&doc, span, &output, force)?;

        Ok(Some(format!(
            "Successfully split pages {} to {}! -> {}",
            outcome.span.start,
            outcome.span.end,
            outcome.output.display()
        )))
    }

    fn compress_flow(&mut self) -> Result<Option<String>> {
        let Some(source) = self.ask_path("PDF to compress: ")? else {
            return Ok(None);
        };
        let Some(level) = self.ask_level()? else {
            return Ok(None);
        };
        let Some((output, force)) = self.ask_output("Save compressed PDF as: ")? else {
            return Ok(None);
        };

        let outcome = compress::compress(&source, level, &output, force)?;

        Ok(Some(format!(
            "PDF compressed successfully!\n\n{}\nSaved to {}",
            outcome.report,
            outcome.output.display()
        )))
    }

    fn ask_level(&mut self) -> Result<Option<CompressionLevel>> {
        writeln!(self.output, "Select Compression Level:")?;
        for (index, level) in CompressionLevel::ALL.iter().enumerate() {
            writeln!(self.output, "  {}) {}", index + 1, level.label())?;
        }

        let Some(answer) = self.prompt("Level [2]: ")? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(Some(CompressionLevel::default()));
        }
        Ok(Some(answer.parse()?))
    }

    fn ask_path(&mut self, text: &str) -> Result<Option<PathBuf>> {
        Ok(self
            .prompt(text)?
            .filter(|answer| !answer.is_empty())
            .map(|answer| PathBuf::from(unquote(&answer))))
    }

    /// Ask for a save location; confirm before replacing an existing file.
    fn ask_output(&mut self, text: &str) -> Result<Option<(PathBuf, bool)>> {
        let Some(path) = self.ask_path(text)? else {
            return Ok(None);
        };
        let path = with_pdf_extension(path);
        if !path.exists() {
            return Ok(Some((path, false)));
        }

        let question = format!("{} already exists. Overwrite? [y/N]: ", path.display());
        let confirmed = self
            .prompt(&question)?
            .is_some_and(|answer| matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"));
        Ok(confirmed.then_some((path, true)))
    }

    /// Print `text` and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn parse_choice(answer: &str) -> Option<MenuChoice> {
    match answer.to_ascii_lowercase().as_str() {
        "1" | "merge" => Some(MenuChoice::Merge),
        "2" | "split" => Some(MenuChoice::Split),
        "3" | "compress" => Some(MenuChoice::Compress),
        "4" | "q" | "quit" | "exit" => Some(MenuChoice::Quit),
        _ => None,
    }
}

/// Paths dragged into a terminal often arrive quoted.
fn unquote(s: &str) -> &str {
    let s = s.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)) {
            return inner;
        }
    }
    s
}

pub fn run() -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Session::new(stdin.lock(), stdout.lock()).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::sample::{page_labels, write_document};
    use lopdf::Document;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::TempDir;

    fn transcript(script: &str) -> String {
        let mut output = Vec::new();
        Session::new(Cursor::new(script.to_string()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn sample(dir: &Path, name: &str, pages: u32) -> PathBuf {
        let path = dir.join(name);
        write_document(&path, name, pages);
        path
    }

    #[test]
    fn test_merge_flow() {
        let dir = TempDir::new().unwrap();
        let a = sample(dir.path(), "a.pdf", 1);
        let b = sample(dir.path(), "b.pdf", 2);
        let out = dir.path().join("both");

        let text = transcript(&format!(
            "1\n{}\n\"{}\"\n\n{}\n4\n",
            a.display(),
            b.display(),
            out.display()
        ));

        assert!(text.contains("Successfully merged 2 PDFs!"), "{}", text);
        let merged = Document::load(dir.path().join("both.pdf")).unwrap();
        assert_eq!(page_labels(&merged), vec!["a.pdf 1", "b.pdf 1", "b.pdf 2"]);
    }

    #[test]
    fn test_merge_flow_with_one_file() {
        let dir = TempDir::new().unwrap();
        let a = sample(dir.path(), "a.pdf", 1);

        let text = transcript(&format!("merge\n{}\n\n4\n", a.display()));
        assert!(
            text.contains("Error: Please select at least 2 PDF files to merge"),
            "{}",
            text
        );
    }

    #[test]
    fn test_split_flow() {
        let dir = TempDir::new().unwrap();
        let src = sample(dir.path(), "src.pdf", 4);
        let out = dir.path().join("middle.pdf");

        let text = transcript(&format!("2\n{}\n2\n3\n{}\n", src.display(), out.display()));

        assert!(text.contains("Start Page (1-4): "), "{}", text);
        assert!(text.contains("Successfully split pages 2 to 3!"), "{}", text);
        let split = Document::load(&out).unwrap();
        assert_eq!(page_labels(&split), vec!["src.pdf 2", "src.pdf 3"]);
    }

    #[test]
    fn test_split_flow_errors_return_to_menu() {
        let dir = TempDir::new().unwrap();
        let src = sample(dir.path(), "src.pdf", 4);
        let single = sample(dir.path(), "single.pdf", 1);

        let text = transcript(&format!(
            "2\n{src}\n3\n1\n2\n{src}\n\n4\n2\n{src}\nx\n2\n2\n{single}\n4\n",
            src = src.display(),
            single = single.display()
        ));

        assert!(
            text.contains("Error: Invalid page range! Please enter numbers between 1 and 4"),
            "{}",
            text
        );
        assert!(text.contains("Error: Page numbers required"), "{}", text);
        assert!(text.contains("Error: Please enter valid numbers"), "{}", text);
        assert!(
            text.contains("Error: PDF must have at least 2 pages to split"),
            "{}",
            text
        );
    }

    #[test]
    fn test_compress_flow_default_level_and_overwrite() {
        let dir = TempDir::new().unwrap();
        let src = sample(dir.path(), "src.pdf", 3);
        let out = dir.path().join("out.pdf");
        std::fs::write(&out, b"old").unwrap();

        // Declining the overwrite cancels; accepting it replaces the file.
        let text = transcript(&format!(
            "3\n{src}\n\n{out}\nn\n3\n{src}\n3\n{out}\ny\n",
            src = src.display(),
            out = out.display()
        ));

        assert!(text.contains("Cancelled."), "{}", text);
        assert!(text.contains("  3) High (Smaller Size)"), "{}", text);
        assert!(text.contains("PDF compressed successfully!"), "{}", text);
        assert!(text.contains("Size reduction: "), "{}", text);
        let reloaded = Document::load(&out).unwrap();
        assert_eq!(reloaded.get_pages().len(), 3);
    }

    #[test]
    fn test_unknown_option_and_eof() {
        let text = transcript("7\n");
        assert!(text.contains("Error: Unknown option: 7"));
        assert!(text.ends_with("Choose an option: \n"));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'a b.pdf'"), "a b.pdf");
        assert_eq!(unquote("\"x.pdf\""), "x.pdf");
        assert_eq!(unquote("\"x.pdf"), "\"x.pdf");
    }
}
