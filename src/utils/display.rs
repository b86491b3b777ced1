use crate::models::content::Article;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

pub struct DisplayFormatter;

impl DisplayFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_header(&self, text: &str) -> String {
        format!("\n{} {}", "»".cyan(), text.bold().underline())
    }

    /// Borderless table with `headers` as its title row.
    pub fn format_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = Table::init(
            rows.iter()
                .map(|row| Row::new(row.iter().map(|cell| Cell::new(cell)).collect()))
                .collect(),
        );
        table.set_titles(Row::new(headers.iter().map(|h| Cell::new(h)).collect()));
        table.set_format(*format::consts::FORMAT_CLEAN);
        table.to_string()
    }

    pub fn format_saved(&self, saved: bool) -> String {
        if saved {
            "Kaydedildi".green().to_string()
        } else {
            "Kayıt kaldırıldı".red().to_string()
        }
    }

    /// Renders seconds as `m:ss`, or `h:mm:ss` past an hour.
    pub fn format_duration(&self, seconds: u64) -> String {
        let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
        if h > 0 {
            format!("{}:{:02}:{:02}", h, m, s)
        } else {
            format!("{}:{:02}", m, s)
        }
    }

    /// Shortens `text` to at most `max` characters, marking the cut with `…`.
    pub fn truncate(&self, text: &str, max: usize) -> String {
        if text.chars().count() <= max {
            return text.to_string();
        }
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }

    pub fn format_article(&self, article: &Article) -> String {
        let mut output = Vec::new();
        output.push(self.format_header(&article.title));
        output.push(format!("Slug: {}", article.slug));
        if let Some(author) = &article.author {
            output.push(format!("Yazar: {}", author));
        }
        if let Some(category) = &article.category {
            output.push(format!("Kategori: {}", category));
        }
        if let Some(created_at) = &article.created_at {
            output.push(format!("Tarih: {}", created_at));
        }
        if let Some(body) = article.content.as_ref().or(article.summary.as_ref()) {
            output.push(String::new());
            output.push(self.truncate(body, 600));
        }

        output.join("\n")
    }
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new()
    }
}
