use std::fmt::Write as _;

/// Minimal pipe-table builder; the chat surface renders markdown tables verbatim.
#[derive(Debug, Clone)]
pub(crate) struct MarkdownTable {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    pub(crate) fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn row<I, T>(&mut self, cells: I)
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.rows
            .push(cells.into_iter().map(|cell| escape(&cell.to_string())).collect());
    }

    pub(crate) fn render(&self) -> String {
        let mut out = String::new();
        writeln!(out, "| {} |", self.headers.join(" | ")).expect("write header");
        let divider: Vec<&str> = self.headers.iter().map(|_| "---").collect();
        write!(out, "| {} |", divider.join(" | ")).expect("write divider");
        for row in &self.rows {
            write!(out, "\n| {} |", row.join(" | ")).expect("write row");
        }
        out
    }
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}

/// Whole-dollar amount with thousands separators, e.g. `$115,000`.
pub(crate) fn dollars(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (index, digit) in rounded.chars().enumerate() {
        if index > 0 && (rounded.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if value < 0.0 && rounded != "0" {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollars_groups_thousands() {
        assert_eq!(dollars(115_000.0), "$115,000");
        assert_eq!(dollars(999.4), "$999");
        assert_eq!(dollars(1_234_567.6), "$1,234,568");
        assert_eq!(dollars(-2_500.0), "-$2,500");
        assert_eq!(dollars(0.0), "$0");
    }

    #[test]
    fn table_renders_header_divider_and_rows() {
        let mut table = MarkdownTable::new(&["Department", "Headcount"]);
        table.row(["Engineering".to_string(), 12.to_string()]);
        table.row(["R|D".to_string(), 3.to_string()]);
        assert_eq!(
            table.render(),
            "| Department | Headcount |\n| --- | --- |\n| Engineering | 12 |\n| R\\|D | 3 |"
        );
    }
}
