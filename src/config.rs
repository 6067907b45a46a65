use crate::dom::Element;

/// First row of the table is data, not a header.
pub const NO_HEADERS: &str = "no-headers";
/// First column of the table is data, not a dice column.
pub const NO_DICE_COLUMN: &str = "no-dice-column";
/// Number each output line.
pub const OUTPUT_DICE_COLUMN: &str = "output-dice-column";
/// Label of the roll button.
pub const ROLL_LABEL: &str = "roll-label";
/// Label of the clear button.
pub const CLEAR_LABEL: &str = "clear-label";
/// Text placed between column values.
pub const DELIM: &str = "delim";
/// Comma separated 1-based columns that take no delimiter after them.
pub const GLUE: &str = "glue";

/// Every attribute a table roller reacts to.
pub const OBSERVED_ATTRIBUTES: &[&str] = &[
    NO_HEADERS,
    NO_DICE_COLUMN,
    ROLL_LABEL,
    CLEAR_LABEL,
    OUTPUT_DICE_COLUMN,
    DELIM,
    GLUE
];

/// Settings of a table roller, as read from its host element.
///
/// Nothing holds on to one of these: each operation reads a fresh
/// copy so attribute changes take effect immediately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollerConfig {
    /// The table's first row is data.
    pub no_headers: bool,
    /// The table's first column is data.
    pub no_dice_column: bool,
    /// Prefix each output line with a counter.
    pub output_dice_column: bool,
    /// Roll button label.
    pub roll_label: String,
    /// Clear button label.
    pub clear_label: String,
    /// Delimiter between column values.
    pub delim: String,
    /// 1-based column numbers glued to the following column.
    pub glue: Vec<usize>
}

impl Default for RollerConfig {
    fn default() -> Self {
        RollerConfig {
            no_headers: false,
            no_dice_column: false,
            output_dice_column: false,
            roll_label: "Roll".into(),
            clear_label: "Clear".into(),
            delim: " ".into(),
            glue: Vec::new()
        }
    }
}

impl RollerConfig {
    /// Read the configuration from an element's attributes, using
    /// defaults for anything absent.
    pub fn from_element(e: &Element) -> RollerConfig {
        let d = RollerConfig::default();
        let string = |name: &str, default: String| {
            e.get_attribute(name).map_or(default, str::to_string)
        };

        RollerConfig {
            no_headers: e.has_attribute(NO_HEADERS),
            no_dice_column: e.has_attribute(NO_DICE_COLUMN),
            output_dice_column: e.has_attribute(OUTPUT_DICE_COLUMN),
            roll_label: string(ROLL_LABEL, d.roll_label),
            clear_label: string(CLEAR_LABEL, d.clear_label),
            delim: string(DELIM, d.delim),
            glue: e.get_attribute(GLUE).map(parse_glue).unwrap_or_default()
        }
    }

    /// Index of the first column taking part in a roll.
    pub fn start_col_index(&self) -> usize {
        if self.no_dice_column { 0 } else { 1 }
    }

    /// Is the column with the given 1-based number glued to the next?
    pub fn is_glued(&self, column: usize) -> bool {
        self.glue.contains(&column)
    }
}

/// Parse a comma separated list of column numbers.
///
/// Each entry is read leniently: leading whitespace and an optional `+`
/// sign are skipped and the leading run of digits is taken. Entries with
/// no digits there are dropped.
///
/// ```
/// use table_roller::config::parse_glue;
///
/// assert_eq!(vec![1, 3, 4], parse_glue("1, 3,4th,,x"));
/// ```
pub fn parse_glue(s: &str) -> Vec<usize> {
    s.split(',')
        .filter_map(|part| {
            let part = part.trim_start();
            let digits = part.strip_prefix('+').unwrap_or(part);
            let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
            let n = digits[..end].parse().ok();
            if n.is_none() && !part.is_empty() {
                log::debug!("ignoring glue entry {part:?}");
            }
            n
        })
        .collect()
}
