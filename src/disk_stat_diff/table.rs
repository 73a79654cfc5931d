use std::fmt::{self, Display, Formatter};

const SEPARATOR: &str = " ";

/// Column oriented table printed with every cell left-aligned and padded
/// to the widest entry of its column, header included.
#[derive(Debug, Default)]
pub struct Table {
    columns: Vec<(String, Vec<String>)>,
}

impl Table {
    pub fn new() -> Table {
        Table::default()
    }

    /// Appends a column. Panics if its length differs from the columns
    /// already present.
    pub fn push_column<I, T>(&mut self, header: &str, values: I)
        where I: IntoIterator<Item=T>,
              T: Display {
        let values: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        if let Some((first, rows)) = self.columns.first() {
            assert_eq!(rows.len(), values.len(),
                       "column {:?} has {} rows, {:?} has {}",
                       header, values.len(), first, rows.len());
        }
        self.columns.push((header.to_string(), values));
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .map(|(header, values)| {
                values.iter()
                    .map(|v| v.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn write_row<'a>(f: &mut Formatter<'_>, cells: impl Iterator<Item=&'a str>, widths: &[usize]) -> fmt::Result {
        for (index, (cell, width)) in cells.zip(widths).enumerate() {
            if index > 0 {
                f.write_str(SEPARATOR)?;
            }
            write!(f, "{:<width$}", cell, width = width)?;
        }
        writeln!(f)
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        Table::write_row(f, self.columns.iter().map(|(header, _)| header.as_str()), &widths)?;

        let rows = self.columns.first().map_or(0, |(_, values)| values.len());
        for row in 0..rows {
            Table::write_row(f, self.columns.iter().map(|(_, values)| values[row].as_str()), &widths)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn pads_to_widest_cell() {
        let mut table = Table::new();
        table.push_column("stat", vec!["read_ios", "in_flight"]);
        table.push_column("diff", vec![5, 123456]);

        assert_eq!(
            table.to_string(),
            "stat      diff  \n\
             read_ios  5     \n\
             in_flight 123456\n"
        );
    }

    #[test]
    fn header_can_be_widest() {
        let mut table = Table::new();
        table.push_column("stat", vec!["a"]);
        table.push_column("avg", vec![-1.5]);

        assert_eq!(table.to_string(), "stat avg \na    -1.5\n");
    }

    #[test]
    fn every_line_has_same_width() {
        let mut table = Table::new();
        table.push_column("stat", vec!["discard_sectors", "io_ticks", "x"]);
        table.push_column("diff", vec![0, -42, 1000000]);

        let rendered = table.to_string();
        let widths: Vec<usize> = rendered.lines().map(|l| l.len()).collect();
        assert_eq!(widths, vec![23, 23, 23, 23]);
    }

    #[test]
    fn empty_table_prints_header() {
        let mut table = Table::new();
        table.push_column("stat", Vec::<String>::new());
        assert_eq!(table.to_string(), "stat\n");
    }

    #[test]
    #[should_panic(expected = "has 1 rows")]
    fn uneven_columns_panic() {
        let mut table = Table::new();
        table.push_column("stat", vec!["a", "b"]);
        table.push_column("diff", vec![1]);
    }
}
