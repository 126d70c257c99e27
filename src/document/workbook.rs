//! Spreadsheet writer seam
//!
//! The assembler writes through [`WorkbookSink`] so it can be exercised
//! against [`MemoryWorkbook`] in tests and [`XlsxWorkbook`] for real output.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Url, Workbook};
use tracing::debug;

use super::error::DocumentError;

/// Cell formatting used by the tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellStyle {
    #[default]
    Plain,
    Bold,
}

/// Destination for sheets and cells
///
/// Sheets are addressed by the index returned from `add_sheet`.
pub trait WorkbookSink {
    /// Append a sheet with the given name and return its index
    fn add_sheet(&mut self, name: &str) -> Result<usize, DocumentError>;

    /// Write a string cell
    fn write(
        &mut self,
        sheet: usize,
        row: u32,
        col: u16,
        text: &str,
        style: CellStyle,
    ) -> Result<(), DocumentError>;

    /// Write a hyperlink to cell `A1` of another sheet
    fn write_link(
        &mut self,
        sheet: usize,
        row: u32,
        col: u16,
        target_sheet: &str,
        text: &str,
    ) -> Result<(), DocumentError>;

    /// Flush the workbook to disk
    fn save(&mut self, path: &Path) -> Result<(), DocumentError>;
}

/// `.xlsx` output via `rust_xlsxwriter`
pub struct XlsxWorkbook {
    workbook: Workbook,
    bold: Format,
    sheet_count: usize,
}

impl Default for XlsxWorkbook {
    fn default() -> Self {
        Self {
            workbook: Workbook::new(),
            bold: Format::new().set_bold(),
            sheet_count: 0,
        }
    }
}

impl XlsxWorkbook {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Internal link target for a sheet, quoting the name
fn internal_link(target_sheet: &str) -> String {
    format!("internal:'{}'!A1", target_sheet.replace('\'', "''"))
}

impl WorkbookSink for XlsxWorkbook {
    fn add_sheet(&mut self, name: &str) -> Result<usize, DocumentError> {
        self.workbook.add_worksheet().set_name(name)?;
        self.sheet_count += 1;
        Ok(self.sheet_count - 1)
    }

    fn write(
        &mut self,
        sheet: usize,
        row: u32,
        col: u16,
        text: &str,
        style: CellStyle,
    ) -> Result<(), DocumentError> {
        let worksheet = self
            .workbook
            .worksheet_from_index(sheet)
            .map_err(|_| DocumentError::UnknownSheet(sheet))?;
        match style {
            CellStyle::Plain => worksheet.write_string(row, col, text)?,
            CellStyle::Bold => worksheet.write_string_with_format(row, col, text, &self.bold)?,
        };
        Ok(())
    }

    fn write_link(
        &mut self,
        sheet: usize,
        row: u32,
        col: u16,
        target_sheet: &str,
        text: &str,
    ) -> Result<(), DocumentError> {
        let worksheet = self
            .workbook
            .worksheet_from_index(sheet)
            .map_err(|_| DocumentError::UnknownSheet(sheet))?;
        let url = Url::new(internal_link(target_sheet)).set_text(text);
        worksheet.write_url(row, col, url)?;
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), DocumentError> {
        debug!("Saving workbook to {}", path.display());
        self.workbook.save(path)?;
        Ok(())
    }
}

/// A cell captured by [`MemoryWorkbook`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCell {
    pub text: String,
    pub style: CellStyle,
    /// Target sheet name for internal links
    pub link: Option<String>,
}

/// A sheet captured by [`MemoryWorkbook`]
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    pub name: String,
    pub cells: BTreeMap<(u32, u16), MemoryCell>,
}

impl MemorySheet {
    /// Text at a cell, if written
    pub fn text(&self, row: u32, col: u16) -> Option<&str> {
        self.cells.get(&(row, col)).map(|cell| cell.text.as_str())
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&MemoryCell> {
        self.cells.get(&(row, col))
    }
}

/// Workbook kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    pub sheets: Vec<MemorySheet>,
    pub saved_to: Option<PathBuf>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    fn sheet_mut(&mut self, sheet: usize) -> Result<&mut MemorySheet, DocumentError> {
        self.sheets
            .get_mut(sheet)
            .ok_or(DocumentError::UnknownSheet(sheet))
    }
}

impl WorkbookSink for MemoryWorkbook {
    fn add_sheet(&mut self, name: &str) -> Result<usize, DocumentError> {
        self.sheets.push(MemorySheet {
            name: name.to_string(),
            ..Default::default()
        });
        Ok(self.sheets.len() - 1)
    }

    fn write(
        &mut self,
        sheet: usize,
        row: u32,
        col: u16,
        text: &str,
        style: CellStyle,
    ) -> Result<(), DocumentError> {
        self.sheet_mut(sheet)?.cells.insert(
            (row, col),
            MemoryCell {
                text: text.to_string(),
                style,
                link: None,
            },
        );
        Ok(())
    }

    fn write_link(
        &mut self,
        sheet: usize,
        row: u32,
        col: u16,
        target_sheet: &str,
        text: &str,
    ) -> Result<(), DocumentError> {
        self.sheet_mut(sheet)?.cells.insert(
            (row, col),
            MemoryCell {
                text: text.to_string(),
                style: CellStyle::Plain,
                link: Some(target_sheet.to_string()),
            },
        );
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), DocumentError> {
        self.saved_to = Some(path.to_path_buf());
        Ok(())
    }
}
