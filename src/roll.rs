use rand::Rng;

use crate::config::RollerConfig;
use crate::table::TableSource;

/// Number of rows that can be rolled on: every row, less the header
/// row unless the table has none.
pub fn data_row_count<T: TableSource + ?Sized>(table: &T, no_headers: bool) -> usize {
    if no_headers {
        table.row_count()
    }
    else {
        table.row_count().saturating_sub(1)
    }
}

/// Pick one value per rolled column.
///
/// Every column from [RollerConfig::start_col_index] up to the table's
/// column count gets its own uniformly random data row, independent of
/// the other columns. A missing cell reads as the empty string, as does
/// every column of a table with no data rows.
pub fn pick_across<T, R>(table: &T, config: &RollerConfig, rng: &mut R) -> Vec<String>
where
    T: TableSource + ?Sized,
    R: Rng
{
    let rows = data_row_count(table, config.no_headers);
    // Data rows start after the header, when there is one.
    let offset = if config.no_headers { 0 } else { 1 };

    (config.start_col_index()..table.column_count())
        .map(|col| {
            if rows == 0 {
                return String::new();
            }
            let row = rng.random_range(0..rows) + offset;
            table.cell_text(row, col).unwrap_or_default()
        })
        .collect()
}

/// Join picked values into one line.
///
/// `first_column` is the 0-based table column of `values[0]`. The
/// delimiter follows every value except the last and those whose
/// 1-based column number is glued.
pub fn join_columns(values: &[String], first_column: usize, config: &RollerConfig) -> String {
    let mut s = String::new();
    for (i, v) in values.iter().enumerate() {
        s.push_str(v);

        let column_number = first_column + i + 1;
        if i + 1 < values.len() && !config.is_glued(column_number) {
            s.push_str(&config.delim);
        }
    }
    s
}

/// Roll once across the table: one random pick per column, joined.
///
/// # Examples
///
/// ```
/// use table_roller::config::RollerConfig;
/// use table_roller::roll::random_across;
/// use table_roller::table::RollTable;
///
/// let t = RollTable::parse_delimited("d2,Who,Does\n1,Orc,sleeps\n2,Elf,sings", ',').unwrap();
/// let mut rng = rand::rng();
///
/// let s = random_across(&t, &RollerConfig::default(), &mut rng);
/// assert!(["Orc sleeps", "Orc sings", "Elf sleeps", "Elf sings"].contains(&s.as_str()));
/// ```
pub fn random_across<T, R>(table: &T, config: &RollerConfig, rng: &mut R) -> String
where
    T: TableSource + ?Sized,
    R: Rng
{
    let values = pick_across(table, config, rng);
    join_columns(&values, config.start_col_index(), config)
}
