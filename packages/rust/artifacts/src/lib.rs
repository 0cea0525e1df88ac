//! Spreadsheet output for collected channel records.
//!
//! A run produces one `<category>_channels.xlsx` workbook with a single sheet
//! named after the category: a fixed header row followed by one row per
//! record, each tagged with the category label.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::{info, instrument};

use tgcatalog_shared::{CatalogError, DetailRecord, Result};

/// Header row of every exported sheet.
pub const HEADER: [&str; 4] = ["Link", "Channel Name", "Category", "Member Count"];

/// Excel's limit on worksheet name length.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Fallback used when a label sanitizes to nothing.
const FALLBACK_NAME: &str = "channels";

/// One data row of the exported table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub link: String,
    pub channel_name: String,
    pub category: String,
    pub member_count: i64,
}

/// Tag each record with `category`, keeping record order.
pub fn table_rows(records: &[DetailRecord], category: &str) -> Vec<TableRow> {
    records
        .iter()
        .map(|r| TableRow {
            link: r.handle.clone(),
            channel_name: r.name.clone(),
            category: category.to_string(),
            member_count: r.members,
        })
        .collect()
}

/// File name used for a category's workbook.
pub fn output_file_name(category: &str) -> String {
    let stem: String = category
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() { FALLBACK_NAME } else { stem.as_str() };
    format!("{stem}_channels.xlsx")
}

/// Coerce a label into a valid worksheet name.
pub fn sheet_name(category: &str) -> String {
    let cleaned: String = category
        .trim()
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    // Apostrophes are trimmed after truncation so the cut can't expose one.
    let cleaned = cleaned.trim_matches('\'');
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("history") {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Reject a category label that cannot name the output sheet.
///
/// Runs the same name check the writer applies, so a bad label fails before
/// any crawling starts.
pub fn check_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(CatalogError::config("category label must not be empty"));
    }
    let mut scratch = Worksheet::new();
    scratch
        .set_name(sheet_name(category))
        .map_err(|e| CatalogError::config(format!("category '{category}' cannot name a sheet: {e}")))?;
    Ok(())
}

/// Write `records` to `<output_dir>/<category>_channels.xlsx`.
///
/// The whole workbook is built in memory and saved in one step.
#[instrument(skip_all, fields(category = %category, records = records.len()))]
pub fn write_table(records: &[DetailRecord], category: &str, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|e| CatalogError::io(output_dir, e))?;
    let path = output_dir.join(output_file_name(category));

    let mut workbook = Workbook::new();
    build_sheet(&mut workbook, records, category).map_err(export_error)?;
    workbook.save(&path).map_err(export_error)?;

    info!(path = %path.display(), rows = records.len(), "saved channel table");
    Ok(path)
}

fn build_sheet(
    workbook: &mut Workbook,
    records: &[DetailRecord],
    category: &str,
) -> std::result::Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(category))?;

    for (col, title) in HEADER.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }

    for (index, row) in table_rows(records, category).iter().enumerate() {
        let r = index as u32 + 1;
        worksheet.write_string(r, 0, row.link.as_str())?;
        worksheet.write_string(r, 1, row.channel_name.as_str())?;
        worksheet.write_string(r, 2, row.category.as_str())?;
        worksheet.write_number(r, 3, row.member_count as f64)?;
    }

    worksheet.set_column_width(0, 32.0)?;
    worksheet.set_column_width(1, 40.0)?;
    Ok(())
}

fn export_error(e: XlsxError) -> CatalogError {
    CatalogError::Export(e.to_string())
}
