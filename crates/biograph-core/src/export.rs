//! Citation export for publication lists.
//!
//! Renders publications as CSV, BibTeX, or RIS text. Line breaks inside
//! values are collapsed to a single space so every field stays on one line.

use std::fmt;
use std::str::FromStr;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::publications::Publication;
use crate::value::Scalar;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown export format '{0}' (expected csv, bibtex or ris)")]
pub struct UnknownFormat(pub String);

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error while buffering export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Supported citation formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Bibtex,
    Ris,
}

impl ExportFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Bibtex => "bib",
            ExportFormat::Ris => "ris",
        }
    }

    pub fn default_file_name(&self) -> String {
        format!("export.{}", self.extension())
    }

    pub fn render(&self, items: &[Publication]) -> Result<String, ExportError> {
        match self {
            ExportFormat::Csv => to_csv(items),
            ExportFormat::Bibtex => Ok(to_bibtex(items)),
            ExportFormat::Ris => Ok(to_ris(items)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Bibtex => "bibtex",
            ExportFormat::Ris => "ris",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "bibtex" | "bib" => Ok(ExportFormat::Bibtex),
            "ris" => Ok(ExportFormat::Ris),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Collapse each run of line breaks into one space and trim.
fn sanitize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_break = false;
    for c in value.chars() {
        if c == '\n' || c == '\r' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out.trim().to_string()
}

fn text(value: Option<&str>) -> String {
    value.map(sanitize).unwrap_or_default()
}

fn scalar(value: Option<&Scalar>) -> String {
    value.map(|v| sanitize(&v.to_string())).unwrap_or_default()
}

fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|s| !s.trim().is_empty())
}

const CSV_HEADER: &str = "pmcid,title,authors,journal,year,doi,pdf_available";

/// CSV with a bare header line; every data field is quoted. Rows are
/// separated by `\n` with no trailing newline.
pub fn to_csv(items: &[Publication]) -> Result<String, ExportError> {
    let mut buffer = format!("{}\n", CSV_HEADER).into_bytes();
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(&mut buffer);

    for item in items {
        let authors: Vec<String> = item.authors.iter().map(|a| sanitize(a)).collect();
        let fields = [
            text(item.pmcid.as_deref()),
            text(item.title.as_deref()),
            authors.join("; "),
            text(item.journal.as_deref()),
            scalar(item.year.as_ref()),
            text(item.doi.as_deref()),
            item.pdf_downloaded.to_string(),
        ];
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    drop(writer);

    let mut out = String::from_utf8(buffer)?;
    out.pop();
    Ok(out)
}

/// Citation key: pmcid, doi or title stripped to ASCII alphanumerics, plus
/// the year (`n.d.` when unknown).
pub fn bibtex_key(item: &Publication) -> String {
    let base: String = first_non_empty(&[
        item.pmcid.as_deref(),
        item.doi.as_deref(),
        item.title.as_deref(),
    ])
    .unwrap_or("item")
    .chars()
    .filter(char::is_ascii_alphanumeric)
    .collect();

    let year = scalar(item.year.as_ref());
    let year = if year.is_empty() { "n.d.".to_string() } else { year };
    format!("{}_{}", base, year)
}

fn bibtex_entry(item: &Publication) -> String {
    let authors: Vec<String> = item.authors.iter().map(|a| sanitize(a)).collect();
    let url = first_non_empty(&[
        item.url.as_deref(),
        item.pdf_url.as_deref(),
        item.pdf_file_path.as_deref(),
    ]);

    let fields = [
        ("title", text(item.title.as_deref())),
        ("author", authors.join(" and ")),
        ("journal", text(item.journal.as_deref())),
        ("year", scalar(item.year.as_ref())),
        ("volume", scalar(item.volume.as_ref())),
        ("number", scalar(item.issue.as_ref())),
        ("pages", text(item.pages.as_deref())),
        ("doi", text(item.doi.as_deref())),
        ("url", text(url)),
    ];

    let mut entry = format!("@article{{{},\n", bibtex_key(item));
    for (name, value) in fields.iter().filter(|(_, v)| !v.is_empty()) {
        entry.push_str(&format!("  {} = {{{}}},\n", name, value));
    }
    if let Some(stripped) = entry.strip_suffix(",\n") {
        entry = format!("{}\n", stripped);
    }
    entry.push_str("}\n\n");
    entry
}

/// BibTeX `@article` entries, omitting empty fields.
pub fn to_bibtex(items: &[Publication]) -> String {
    items.iter().map(bibtex_entry).collect()
}

fn ris_entry(item: &Publication) -> String {
    let mut lines = vec!["TY  - JOUR".to_string()];
    let mut tag = |name: &str, value: String| {
        if !value.is_empty() {
            lines.push(format!("{}  - {}", name, value));
        }
    };

    tag("TI", text(item.title.as_deref()));
    for author in &item.authors {
        tag("AU", sanitize(author));
    }
    tag("JO", text(item.journal.as_deref()));
    tag("PY", scalar(item.year.as_ref()));
    tag("VL", scalar(item.volume.as_ref()));
    tag("IS", scalar(item.issue.as_ref()));
    tag("SP", text(item.pages.as_deref()));
    tag("DO", text(item.doi.as_deref()));
    tag("UR", text(item.url.as_deref()));
    tag("AB", text(item.abstract_text.as_deref()));

    lines.push("ER  - ".to_string());
    format!("{}\n\n", lines.join("\n"))
}

/// RIS records, one `AU` line per author.
pub fn to_ris(items: &[Publication]) -> String {
    items.iter().map(ris_entry).collect()
}

/// Download links for every item that has a stored PDF.
pub fn pdf_links(items: &[Publication], base_url: &str) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    items
        .iter()
        .filter(|item| item.pdf_downloaded)
        .filter_map(|item| item.pmcid.as_deref())
        .map(str::trim)
        .filter(|pmcid| !pmcid.is_empty())
        .map(|pmcid| format!("{}/pdf/{}", base, pmcid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_collapses_breaks() {
        assert_eq!(sanitize("Bone\r\n\nloss \n"), "Bone loss");
        assert_eq!(sanitize("a\nb\rc"), "a b c");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("BIB".parse::<ExportFormat>(), Ok(ExportFormat::Bibtex));
        assert_eq!(ExportFormat::Ris.extension(), "ris");
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_bibtex_key_fallbacks() {
        let item = Publication {
            doi: Some("10.1038/s41526-020-0104-1".to_string()),
            ..Publication::default()
        };
        assert_eq!(bibtex_key(&item), "101038s4152602001041_n.d.");

        let untitled = Publication::default();
        assert_eq!(bibtex_key(&untitled), "item_n.d.");
    }
}
