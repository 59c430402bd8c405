use super::html::escape;

/// A table cell: escaped text plus an optional CSS class
pub struct Cell {
    text: String,
    class: Option<&'static str>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Cell { text: text.into(), class: None }
    }

    pub fn styled(text: impl Into<String>, class: Option<&'static str>) -> Self {
        Cell { text: text.into(), class }
    }
}

/// A simple HTML table body/header generator
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a new table with the given headers
    pub fn new(headers: &[&str]) -> Self {
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row to the table
    pub fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Render the header row as `<tr><th>..</th></tr>`
    pub fn render_head(&self) -> String {
        let mut output = String::from("<tr>");
        for header in &self.headers {
            output.push_str(&format!("<th>{}</th>", escape(header)));
        }
        output.push_str("</tr>");
        output
    }

    /// Render all rows, one `<tr>` per line
    pub fn render_body(&self) -> String {
        let mut output = String::new();
        for row in &self.rows {
            output.push_str("<tr>");
            for cell in row {
                match cell.class {
                    Some(class) => output.push_str(&format!(
                        "<td class=\"{}\">{}</td>",
                        class,
                        escape(&cell.text)
                    )),
                    None => output.push_str(&format!("<td>{}</td>", escape(&cell.text))),
                }
            }
            output.push_str("</tr>\n");
        }
        output
    }
}
