use colored::Colorize;

const COLUMN_GAP: usize = 5;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CellStyle {
    #[default]
    Plain,
    Price,
    // red when the value starts with '-', green otherwise
    Percent,
    Holdings,
    Value,
}

#[derive(Clone, Debug)]
pub struct Cell {
    text: String,
    style: CellStyle,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, CellStyle::Plain)
    }

    pub fn styled(text: impl Into<String>, style: CellStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn paint(&self) -> String {
        match self.style {
            CellStyle::Plain => self.text.clone(),
            CellStyle::Price => self.text.magenta().bold().to_string(),
            CellStyle::Percent => {
                if self.text.starts_with('-') {
                    self.text.red().bold().to_string()
                } else {
                    self.text.green().bold().to_string()
                }
            }
            CellStyle::Holdings => self.text.blue().bold().to_string(),
            CellStyle::Value => self.text.yellow().bold().to_string(),
        }
    }
}

// Aligned table with a fixed gap between columns. Widths are measured on the
// unstyled text so the ANSI escapes do not skew the padding.
#[derive(Clone, Debug, Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: vec![],
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut out = String::new();

        let mut line = String::new();
        for (i, title) in self.header.iter().enumerate() {
            line.push_str(title);
            line.push_str(&" ".repeat(widths[i] - title.len()));
        }
        out.push_str(line.trim_end());
        out.push('\n');

        for row in &self.rows {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                let padding = widths[i] - cell.text.len();
                line.push_str(&cell.paint());
                line.push_str(&" ".repeat(padding));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    pub fn render_plain(&self) -> String {
        let mut out = self.header.join("\t");
        out.push('\n');
        for row in &self.rows {
            let texts = row.iter().map(Cell::text).collect::<Vec<_>>();
            out.push_str(&texts.join("\t"));
            out.push('\n');
        }
        out
    }

    fn column_widths(&self) -> Vec<usize> {
        (0..self.header.len())
            .map(|i| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.text.len())
                    .max()
                    .unwrap_or(0);
                widest.max(self.header[i].len()) + COLUMN_GAP
            })
            .collect()
    }
}
