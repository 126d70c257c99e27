//! Worksheet naming
//!
//! Excel limits sheet names to 31 characters, forbids `: / \ ? * [ ]`,
//! and compares names case-insensitively. Titles that break these rules
//! get a numbered placeholder instead.

use std::collections::HashSet;

use tracing::debug;

/// Name of the first sheet
pub const TOC_SHEET_NAME: &str = "Table of Contents";

/// Longest sheet name Excel accepts
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_CHARS: &[char] = &[':', '/', '\\', '?', '*', '[', ']'];

/// How content sheets are named
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SheetNaming {
    /// Use the page title
    #[default]
    PageTitle,
    /// `Sheet N`, matching the table of contents position
    Index,
}

/// Assigns unique, valid sheet names for one workbook
#[derive(Debug)]
pub struct SheetNamer {
    naming: SheetNaming,
    used: HashSet<String>,
    placeholder_count: usize,
}

/// `Sheet N` for the page at a 0-based table of contents position
///
/// The table of contents is sheet 1, so the first page is `Sheet 2`.
pub fn index_name(position: usize) -> String {
    format!("Sheet {}", position + 2)
}

fn is_valid(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(FORBIDDEN_CHARS)
        && !name.starts_with('\'')
        && !name.ends_with('\'')
}

impl SheetNamer {
    /// A namer with the table of contents name already taken
    pub fn new(naming: SheetNaming) -> Self {
        let mut used = HashSet::new();
        used.insert(TOC_SHEET_NAME.to_lowercase());
        Self {
            naming,
            used,
            placeholder_count: 0,
        }
    }

    /// Pick the name for the page at `position`
    pub fn name_for(&mut self, position: usize, title: Option<&str>) -> String {
        let mut name = match (self.naming, title.map(str::trim)) {
            (SheetNaming::PageTitle, Some(title)) if !title.is_empty() => {
                title.chars().take(MAX_SHEET_NAME_LEN).collect::<String>().trim().to_string()
            }
            _ => index_name(position),
        };

        if !is_valid(&name) {
            self.placeholder_count += 1;
            debug!("Sheet name {:?} is not valid in Excel", name);
            name = format!("title error {}", self.placeholder_count);
        }

        while self.used.contains(&name.to_lowercase()) {
            self.placeholder_count += 1;
            debug!("Sheet name {:?} is already taken", name);
            name = format!("Duplicate title Error {}", self.placeholder_count);
        }

        self.used.insert(name.to_lowercase());
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_used_and_truncated() {
        let mut namer = SheetNamer::new(SheetNaming::PageTitle);
        assert_eq!(namer.name_for(0, Some("  Home  ")), "Home");

        let long = "A very long page title that keeps going on";
        let name = namer.name_for(1, Some(long));
        assert_eq!(name.chars().count(), MAX_SHEET_NAME_LEN);
        assert!(long.starts_with(&name));
    }

    #[test]
    fn test_forbidden_characters_get_placeholder() {
        let mut namer = SheetNamer::new(SheetNaming::PageTitle);
        assert_eq!(namer.name_for(0, Some("Q&A: Pricing")), "title error 1");
        assert_eq!(namer.name_for(1, Some("Home/Away")), "title error 2");
        assert_eq!(namer.name_for(2, Some("[draft]")), "title error 3");
    }

    #[test]
    fn test_duplicates_share_the_counter() {
        let mut namer = SheetNamer::new(SheetNaming::PageTitle);
        assert_eq!(namer.name_for(0, Some("Home")), "Home");
        assert_eq!(namer.name_for(1, Some("HOME")), "Duplicate title Error 1");
        assert_eq!(namer.name_for(2, Some("a:b")), "title error 2");
        assert_eq!(namer.name_for(3, Some("Home")), "Duplicate title Error 3");
    }

    #[test]
    fn test_table_of_contents_is_reserved() {
        let mut namer = SheetNamer::new(SheetNaming::PageTitle);
        assert_eq!(
            namer.name_for(0, Some("table of contents")),
            "Duplicate title Error 1"
        );
    }

    #[test]
    fn test_missing_title_falls_back_to_index() {
        let mut namer = SheetNamer::new(SheetNaming::PageTitle);
        assert_eq!(namer.name_for(4, None), "Sheet 6");
        assert_eq!(namer.name_for(5, Some("   ")), "Sheet 7");
    }

    #[test]
    fn test_index_naming_ignores_titles() {
        let mut namer = SheetNamer::new(SheetNaming::Index);
        assert_eq!(namer.name_for(0, Some("Home")), "Sheet 2");
        assert_eq!(namer.name_for(1, Some("Home")), "Sheet 3");
    }
}
