//! Printable register export.
//!
//! The report is a right-to-left HTML document: title, export date, one
//! table row per resident and a closing total. Turning it into PDF or
//! paper is left to whatever opens the file.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::error::{Error, Result};
use crate::resident::Resident;

/// Report title used when none is configured.
pub const DEFAULT_TITLE: &str = "قائمة سكان العمارة السكنية";

/// Output file name used when none is configured.
pub const DEFAULT_FILE_NAME: &str = "قائمة_السكان.html";

const HEADER_COLOR: &str = "#2980b9";
const CELL_STYLE: &str = "border: 1px solid #ddd; padding: 8px;";
const COLUMNS: [&str; 6] = ["#", "الاسم", "الدور", "الشقة", "الهاتف", "ملاحظات"];

/// Everything the report shows.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    /// Heading of the document.
    pub title: &'a str,
    /// Date printed as the export date.
    pub generated_on: NaiveDate,
    /// Residents in list order.
    pub residents: &'a [Resident],
}

/// Destination for a rendered report.
pub trait Exporter {
    /// Write the report, returning where it went.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written.
    fn export(&mut self, report: &Report<'_>) -> Result<PathBuf>;
}

/// Writes the HTML report to a file.
#[derive(Debug, Clone)]
pub struct HtmlFileExporter {
    path: PathBuf,
}

impl HtmlFileExporter {
    /// Export to `path`, replacing any existing file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Exporter for HtmlFileExporter {
    fn export(&mut self, report: &Report<'_>) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        std::fs::write(&self.path, render_html(report))
            .map_err(|e| Error::export(&self.path, e.to_string()))?;

        info!(
            "Exported {} residents to {}",
            report.residents.len(),
            self.path.display()
        );
        Ok(self.path.clone())
    }
}

/// Render the report as a standalone HTML document.
#[must_use]
pub fn render_html(report: &Report<'_>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"ar\" dir=\"rtl\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(report.title));
    html.push_str("</head>\n<body>\n");
    html.push_str(
        "<div style=\"direction: rtl; font-family: Arial, sans-serif; padding: 20px;\">\n",
    );
    let _ = writeln!(
        html,
        "<h1 style=\"text-align: center; color: {HEADER_COLOR}; margin-bottom: 20px;\">{}</h1>",
        escape_html(report.title)
    );
    let _ = writeln!(
        html,
        "<p style=\"text-align: right; margin-bottom: 20px;\">تاريخ التصدير: {}</p>",
        arabic_short_date(report.generated_on)
    );

    html.push_str(
        "<table style=\"width: 100%; border-collapse: collapse; margin-bottom: 20px;\">\n",
    );
    let _ = writeln!(
        html,
        "<thead>\n<tr style=\"background-color: {HEADER_COLOR}; color: white;\">"
    );
    for column in COLUMNS {
        let _ = writeln!(
            html,
            "<th style=\"{CELL_STYLE} text-align: center;\">{column}</th>"
        );
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for (index, resident) in report.residents.iter().enumerate() {
        let shade = if index % 2 == 0 { "#f9f9f9" } else { "white" };
        let _ = writeln!(html, "<tr style=\"background-color: {shade};\">");
        push_cell(&mut html, "center", &(index + 1).to_string());
        push_cell(
            &mut html,
            "right; font-weight: bold",
            &escape_html(&resident.name),
        );
        push_cell(&mut html, "center", &escape_html(&resident.floor));
        push_cell(&mut html, "center", &resident.apartment.to_string());
        push_cell(&mut html, "center", &escape_html(&resident.phone));
        push_cell(&mut html, "right", &escape_html(resident.notes_or_dash()));
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    let _ = writeln!(
        html,
        "<p style=\"text-align: center; font-weight: bold;\">إجمالي عدد السكان {}</p>",
        report.residents.len()
    );
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn push_cell(html: &mut String, align: &str, content: &str) {
    let _ = writeln!(
        html,
        "<td style=\"{CELL_STYLE} text-align: {align};\">{content}</td>"
    );
}

/// Format a date the way the `ar-EG` locale writes a short date:
/// day/month/year in Arabic-Indic digits, each separator preceded by a
/// right-to-left mark.
#[must_use]
pub fn arabic_short_date(date: NaiveDate) -> String {
    format!(
        "{}\u{200f}/{}\u{200f}/{}",
        arabic_digits(&date.day().to_string()),
        arabic_digits(&date.month().to_string()),
        arabic_digits(&date.year().to_string()),
    )
}

/// Replace ASCII digits with Arabic-Indic digits.
#[must_use]
pub fn arabic_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
            _ => c,
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
