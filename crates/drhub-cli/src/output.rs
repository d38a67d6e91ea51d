//! Output rendering for command results.

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// A command result: one JSON document plus its table rendering.
pub struct CommandOutput {
    json: serde_json::Value,
    table: String,
}

impl CommandOutput {
    pub fn new(data: &impl Serialize, table: String) -> Result<Self, CliError> {
        Ok(Self {
            json: serde_json::to_value(data)?,
            table,
        })
    }

    pub fn render(&self, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
        match format {
            OutputFormat::Table => println!("{}", self.table.trim_end()),
            OutputFormat::Json if pretty => {
                println!("{}", serde_json::to_string_pretty(&self.json)?)
            }
            OutputFormat::Json => println!("{}", serde_json::to_string(&self.json)?),
        }
        Ok(())
    }
}

/// Minimal fixed-width table writer.
pub struct Table {
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: &[&str]) -> Self {
        let header: Vec<String> = header.iter().map(|cell| String::from(*cell)).collect();
        Self {
            widths: header.iter().map(String::len).collect(),
            rows: vec![header],
        }
    }

    pub fn row(&mut self, cells: &[String]) {
        for (index, cell) in cells.iter().enumerate() {
            if index < self.widths.len() {
                self.widths[index] = self.widths[index].max(cell.chars().count());
            }
        }
        self.rows.push(cells.to_vec());
    }

    pub fn finish(self) -> String {
        let mut out = String::new();
        for (row_index, row) in self.rows.iter().enumerate() {
            for (index, cell) in row.iter().enumerate() {
                let width = self.widths.get(index).copied().unwrap_or(0);
                let pad = width.saturating_sub(cell.chars().count());
                out.push_str(cell);
                out.push_str(&" ".repeat(pad + 2));
            }
            out.push('\n');
            if row_index == 0 {
                let total: usize = self.widths.iter().map(|w| w + 2).sum();
                out.push_str(&"-".repeat(total));
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_to_widest_cell() {
        let mut table = Table::new(&["SYMBOL", "PRICE"]);
        table.row(&[String::from("AAPL80"), String::from("6.45")]);
        table.row(&[String::from("TENCENT80"), String::from("14.25")]);
        let rendered = table.finish();

        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("SYMBOL"));
        assert!(lines[1].starts_with("---"));
        assert!(lines[3].starts_with("TENCENT80  "));
    }
}
