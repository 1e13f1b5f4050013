//! Reshape model output for the terminal.
//!
//! Inline markdown is stripped first, then every line is classified by shape.
//! The rules are tried top to bottom and the first match wins.

use crossterm::style::Stylize;
use regex::Regex;
use std::sync::LazyLock;

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid link regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));
static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]*)`").expect("valid code regex"));
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("valid numbered regex"));
static EXAMPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^example").expect("valid example regex"));
static FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{1,2}\w").expect("valid flag regex"));

/// Shape of a single trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Header,
    Example,
    Flag,
    Bullet,
    Plain,
}

fn classify(line: &str) -> LineKind {
    if line.is_empty() {
        LineKind::Blank
    } else if NUMBERED.is_match(line)
        || line.ends_with(':')
        || line.to_lowercase().contains("recommendation")
    {
        LineKind::Header
    } else if EXAMPLE.is_match(line) {
        LineKind::Example
    } else if FLAG.is_match(line) {
        LineKind::Flag
    } else if line.starts_with('*') || line.starts_with('-') {
        LineKind::Bullet
    } else {
        LineKind::Plain
    }
}

/// Remove bold, inline-code and link markup, keeping the text.
pub fn strip_markup(text: &str) -> String {
    let text = LINK.replace_all(text, "$1");
    let text = BOLD.replace_all(&text, "$1");
    CODE.replace_all(&text, "$1").into_owned()
}

/// Formats raw answers, optionally with ANSI emphasis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    color: bool,
}

impl Formatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Render `raw` line by line. Blank lines are kept as paragraph breaks.
    pub fn format(&self, raw: &str) -> String {
        let stripped = strip_markup(raw);
        let mut out = Vec::new();
        for line in stripped.lines() {
            self.render_line(line.trim(), &mut out);
        }
        out.join("\n")
    }

    fn render_line(&self, line: &str, out: &mut Vec<String>) {
        match classify(line) {
            LineKind::Blank => out.push(String::new()),
            LineKind::Header => {
                let header = line.to_uppercase();
                let underline = "-".repeat(header.chars().count());
                if self.color {
                    out.push(header.bold().cyan().to_string());
                    out.push(underline.dark_grey().to_string());
                } else {
                    out.push(header);
                    out.push(underline);
                }
            }
            LineKind::Example => {
                let text = if self.color {
                    line.to_string().green().to_string()
                } else {
                    line.to_string()
                };
                out.push(format!("  > {}", text));
            }
            LineKind::Flag => {
                let text = if self.color {
                    line.to_string().yellow().to_string()
                } else {
                    line.to_string()
                };
                out.push(format!("    {}", text));
            }
            LineKind::Bullet => {
                let item = line.trim_start_matches(['*', '-']).trim_start();
                out.push(format!("  {}", item));
            }
            LineKind::Plain => out.push(line.to_string()),
        }
    }
}
