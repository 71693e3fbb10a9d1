use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Color as CtColor, Stylize};
use unicode_width::UnicodeWidthStr;

pub fn get_styles() -> Styles {
    let bold = |color: AnsiColor| Style::new().bold().fg_color(Some(Color::Ansi(color)));
    Styles::styled()
        .usage(bold(AnsiColor::Yellow).underline())
        .header(bold(AnsiColor::Yellow).underline())
        .literal(bold(AnsiColor::Green))
        .invalid(bold(AnsiColor::Red))
        .error(bold(AnsiColor::Red))
        .valid(bold(AnsiColor::Green))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

pub mod colors {
    use crossterm::style::Color;

    pub const FRAME: Color = Color::Rgb {
        r: 230,
        g: 180,
        b: 60,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 200,
        b: 120,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
}

pub fn get_prompt() -> String {
    format!("{} ", "catalog>".with(colors::FRAME).bold())
}

pub fn print_success(message: &str) {
    println!(" {} {}", "✓".with(colors::GREEN).bold(), message.with(colors::GREEN));
}

pub fn print_error(message: &str) {
    eprintln!(" {} {}", "✗".with(colors::RED).bold(), message.with(colors::RED));
}

pub fn print_empty_list(message: &str) {
    println!(" {} {}", "○".with(colors::DIM), message.with(colors::DIM));
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {}",
        format!("{:<18}", key).with(colors::DIM),
        value.with(CtColor::White)
    );
}

/// Box-drawn table sized to the widest cell of each column.
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: &[&str]) -> Self {
        TableBuilder {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            col_widths: headers.iter().map(|h| h.width()).collect(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        for (width, cell) in self.col_widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.width());
        }
        self.rows.push(row);
    }

    fn border(&self, left: &str, middle: &str, right: &str) -> String {
        let segments: Vec<String> = self.col_widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(middle), right)
    }

    fn line(&self, cells: &[String]) -> String {
        let mut out = String::from("│");
        for (i, width) in self.col_widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let padding = width.saturating_sub(cell.width());
            out.push_str(&format!(" {}{} │", cell, " ".repeat(padding)));
        }
        out
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            self.border("╭", "┬", "╮"),
            self.line(&self.headers),
            self.border("├", "┼", "┤"),
        ];
        lines.extend(self.rows.iter().map(|row| self.line(row)));
        lines.push(self.border("╰", "┴", "╯"));
        lines.join("\n")
    }

    pub fn print(&self) {
        println!("{}", self.render().with(colors::FRAME));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_pads_to_widest_cell() {
        let mut table = TableBuilder::new(&["id", "name"]);
        table.add_row(vec!["1".to_string(), "Drama".to_string()]);
        table.add_row(vec!["12".to_string(), "Sci-fi".to_string()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "╭────┬────────╮");
        assert_eq!(lines[1], "│ id │ name   │");
        assert_eq!(lines[3], "│ 1  │ Drama  │");
        assert_eq!(lines[5], "╰────┴────────╯");
    }
}
