use markdown::mdast::{Node, Table};
use markdown::ParseOptions;

use crate::dom::Element;
use crate::error::TableParseError;

/// Read access to a grid of cell text.
///
/// Rows and columns are 0-based and absolute: row 0 is the first row
/// of the table, whether or not it is a header.
pub trait TableSource {
    /// Number of rows, header row included.
    fn row_count(&self) -> usize;

    /// Number of cells in the first row. This is the column count of
    /// the whole table, however many cells later rows have.
    fn column_count(&self) -> usize;

    /// Text of the cell at the given position, if there is one.
    fn cell_text(&self, row: usize, col: usize) -> Option<String>;
}

/// A [TableSource] view over a `<table>` element.
///
/// Rows are every `tr` below the table in document order, so `thead`
/// and `tbody` wrappers make no difference. Cells are a row's direct
/// `td` and `th` children.
pub struct DomTable<'a> {
    rows: Vec<&'a Element>
}

impl<'a> DomTable<'a> {
    /// Create a view over the given table element.
    pub fn new(table: &'a Element) -> DomTable<'a> {
        DomTable { rows: table.query_tag("tr") }
    }

    fn cells(row: &'a Element) -> impl Iterator<Item = &'a Element> {
        row.children.iter().filter(|c| c.tag == "td" || c.tag == "th")
    }
}

impl TableSource for DomTable<'_> {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.rows.first().map_or(0, |&r| Self::cells(r).count())
    }

    fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        let row = *self.rows.get(row)?;
        Self::cells(row).nth(col).map(Element::text_content)
    }
}

/// A table of text cells held in memory.
///
/// Rows may be ragged; a short row simply has no cell at the missing
/// positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RollTable {
    rows: Vec<Vec<String>>
}

impl RollTable {
    /// Create a table from rows of cells.
    pub fn new(rows: Vec<Vec<String>>) -> RollTable {
        RollTable { rows }
    }

    /// Parse the pipe table out of a GitHub flavored markdown document.
    ///
    /// Headings and prose around the table are ignored. The document
    /// must hold exactly one table. Cell text is the cell's plain text,
    /// trimmed, so escaped pipes and inline formatting read as written.
    ///
    /// ```
    /// use table_roller::table::{RollTable, TableSource};
    ///
    /// let t = RollTable::parse_markdown("# Weather\n\n| d4 | Weather |\n|----|----|\n| 1 | Rain |").unwrap();
    /// assert_eq!(2, t.row_count());
    /// assert_eq!(Some("Rain".to_string()), t.cell_text(1, 1));
    /// ```
    pub fn parse_markdown(s: &str) -> Result<RollTable, TableParseError> {
        let tree = markdown::to_mdast(s, &ParseOptions::gfm())
            .map_err(|e| TableParseError::Markdown(e.to_string()))?;

        let mut tables = Vec::new();
        collect_tables(&tree, &mut tables);
        let table = match tables.as_slice() {
            [] => return Err(TableParseError::Empty),
            [table] => *table,
            _ => return Err(TableParseError::MultipleTables(tables.len()))
        };

        let rows: Vec<Vec<String>> = table
            .children
            .iter()
            .map(|row| {
                row.children()
                    .map(|cells| cells.iter().map(|c| c.to_string().trim().to_string()).collect::<Vec<_>>())
                    .unwrap_or_default()
            })
            .collect();
        Ok(RollTable { rows })
    }

    /// Parse delimited text: one row per non-blank line, cells split
    /// on `separator` and trimmed.
    pub fn parse_delimited(s: &str, separator: char) -> Result<RollTable, TableParseError> {
        let rows: Vec<Vec<String>> = s
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.split(separator).map(|c| c.trim().to_string()).collect())
            .collect();

        if rows.is_empty() {
            Err(TableParseError::Empty)
        }
        else {
            Ok(RollTable { rows })
        }
    }

    /// Build the equivalent `<table>` element, one `td` per cell.
    pub fn to_element(&self) -> Element {
        let rows = self.rows.iter().map(|r| {
            Element::new("tr").with_children(r.iter().map(|c| Element::new("td").with_text(c.as_str())))
        });
        Element::new("table").child(Element::new("tbody").with_children(rows))
    }
}

fn collect_tables<'a>(node: &'a Node, tables: &mut Vec<&'a Table>) {
    match node {
        Node::Table(table) => tables.push(table),
        _ => {
            for child in node.children().into_iter().flatten() {
                collect_tables(child, tables);
            }
        }
    }
}

impl TableSource for RollTable {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        self.rows.get(row)?.get(col).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> RollTable {
        RollTable::new(rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect())
    }

    /// Tests that the column count comes from the first row only.
    #[test]
    fn test_rolltable_ragged() {
        let t = grid(&[&["d6", "Name"], &["1", "Bob", "extra"], &["2"]]);

        assert_eq!(3, t.row_count());
        assert_eq!(2, t.column_count());
        assert_eq!(Some("extra".to_string()), t.cell_text(1, 2));
        assert_eq!(None, t.cell_text(2, 1));
        assert_eq!(None, t.cell_text(5, 0));
    }

    /// Tests that an empty table has no columns.
    #[test]
    fn test_rolltable_empty() {
        let t = RollTable::default();

        assert_eq!(0, t.row_count());
        assert_eq!(0, t.column_count());
    }

    /// Tests markdown parsing, including alignment rows.
    #[test]
    fn test_parse_markdown() {
        let s = "\n| d4 | Weather |  Wind |\n|:---|:-------:|------:|\n| 1  | Rain    | Calm  |\n| 2  | Fog     | Gale  |\n";
        let t = RollTable::parse_markdown(s).unwrap();

        assert_eq!(grid(&[&["d4", "Weather", "Wind"], &["1", "Rain", "Calm"], &["2", "Fog", "Gale"]]), t);
    }

    /// Tests that headings and prose around the table are skipped.
    #[test]
    fn test_parse_markdown_in_document() {
        let s = "# Encounters\n\nRoll when the party rests.\n\n| d2 | Foe |\n|---|---|\n| 1 | Orc |\n| 2 | *Two* `rats` |\n\nSee also the forest table.\n";
        let t = RollTable::parse_markdown(s).unwrap();

        assert_eq!(grid(&[&["d2", "Foe"], &["1", "Orc"], &["2", "Two rats"]]), t);
    }

    /// Tests that an escaped pipe stays inside its cell.
    #[test]
    fn test_parse_markdown_escaped_pipe() {
        let t = RollTable::parse_markdown("| d2 | Foe |\n|---|---|\n| 1 | Orc \\| Goblin |\n| 2 | Rat |").unwrap();

        assert_eq!(Some("Orc | Goblin".to_string()), t.cell_text(1, 1));
        assert_eq!(2, t.column_count());
    }

    /// Tests that a data row made of dashes is kept as data.
    #[test]
    fn test_parse_markdown_dash_row() {
        let t = RollTable::parse_markdown("| d3 | Loot |\n|---|---|\n| 1 | Gold |\n| - | --- |\n| 3 | Gem |").unwrap();

        assert_eq!(4, t.row_count());
        assert_eq!(Some("-".to_string()), t.cell_text(2, 0));
        assert_eq!(Some("---".to_string()), t.cell_text(2, 1));
    }

    /// Tests markdown parse failures.
    #[test]
    fn test_parse_markdown_errors() {
        assert_eq!(TableParseError::Empty, RollTable::parse_markdown("\n  \n").unwrap_err());
        assert_eq!(TableParseError::Empty, RollTable::parse_markdown("|---|---|").unwrap_err());
        assert_eq!(TableParseError::Empty, RollTable::parse_markdown("# Loot\n\nNothing here yet.").unwrap_err());

        let two = "| a |\n|---|\n| 1 |\n\ntext\n\n| b |\n|---|\n| 2 |";
        assert_eq!(TableParseError::MultipleTables(2), RollTable::parse_markdown(two).unwrap_err());
    }

    /// Tests delimited parsing.
    #[test]
    fn test_parse_delimited() {
        let t = RollTable::parse_delimited("a\tb\n\nc\t d \n", '\t').unwrap();
        assert_eq!(grid(&[&["a", "b"], &["c", "d"]]), t);

        assert_eq!(TableParseError::Empty, RollTable::parse_delimited("", ',').unwrap_err());
    }

    /// Tests that a table converted to an element reads back the same.
    #[test]
    fn test_dom_table_matches_rolltable() {
        let t = grid(&[&["d6", "Name"], &["1", "Bob"], &["2", "Alice"]]);
        let e = t.to_element();
        let d = DomTable::new(&e);

        assert_eq!(t.row_count(), d.row_count());
        assert_eq!(t.column_count(), d.column_count());
        assert_eq!(Some("Alice".to_string()), d.cell_text(2, 1));
        assert_eq!(None, d.cell_text(2, 2));
    }

    /// Tests that header cells count as columns and nested text is read.
    #[test]
    fn test_dom_table_cells() {
        let e = Element::new("table")
            .child(Element::new("thead").child(Element::new("tr")
                .child(Element::new("th").with_text("d4"))
                .child(Element::new("th").with_text("Loot"))))
            .child(Element::new("tbody").child(Element::new("tr")
                .child(Element::new("td").with_text("1"))
                .child(Element::new("td").child(Element::new("b").with_text("Gold")).child(Element::new("i").with_text(" coins")))));
        let d = DomTable::new(&e);

        assert_eq!(2, d.row_count());
        assert_eq!(2, d.column_count());
        assert_eq!(Some("Gold coins".to_string()), d.cell_text(1, 1));
    }
}
