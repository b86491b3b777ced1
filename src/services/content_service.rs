use crate::api::error::ApiError;
use crate::api::openwall::OpenwallApi;
use crate::models::content::Article;
use crate::utils::display::DisplayFormatter;
use tracing::info;

pub struct ContentService {
    api: OpenwallApi,
    display: DisplayFormatter,
}

impl ContentService {
    pub fn new(api: OpenwallApi) -> Self {
        Self {
            api,
            display: DisplayFormatter::new(),
        }
    }

    fn article_rows(&self, articles: &[Article]) -> Vec<Vec<String>> {
        articles
            .iter()
            .map(|a| {
                vec![
                    self.display.truncate(&a.title, 48),
                    a.slug.clone(),
                    a.author.clone().unwrap_or_else(|| "-".to_string()),
                    a.category.clone().unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect()
    }

    pub async fn show_articles(&self, page: u32) -> Result<(), ApiError> {
        info!("Listing articles, page {}", page);
        let articles = self.api.list_articles(page).await?;

        println!("{}", self.display.format_header(&format!("Makaleler (sayfa {})", page)));
        if articles.is_empty() {
            println!("Bu sayfada makale yok.");
            return Ok(());
        }
        let headers = &["Başlık", "Slug", "Yazar", "Kategori"];
        println!("{}", self.display.format_table(headers, &self.article_rows(&articles)));
        Ok(())
    }

    pub async fn show_article(&self, slug: &str) -> Result<(), ApiError> {
        let article = self.api.get_article(slug).await?;
        println!("{}", self.display.format_article(&article));
        Ok(())
    }

    pub async fn show_videos(&self) -> Result<(), ApiError> {
        let videos = self.api.list_videos().await?;

        println!("{}", self.display.format_header("Videolar"));
        let rows: Vec<Vec<String>> = videos
            .iter()
            .map(|v| {
                vec![
                    self.display.truncate(&v.title, 48),
                    v.duration
                        .map(|d| self.display.format_duration(d))
                        .unwrap_or_else(|| "-".to_string()),
                    v.url.clone().unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();
        println!("{}", self.display.format_table(&["Başlık", "Süre", "Bağlantı"], &rows));
        Ok(())
    }

    pub async fn show_dictionary(&self, term: &str) -> Result<(), ApiError> {
        let entries = self.api.search_dictionary(term).await?;

        println!("{}", self.display.format_header(&format!("Sözlük: {}", term)));
        if entries.is_empty() {
            println!("Sonuç bulunamadı.");
            return Ok(());
        }
        for entry in &entries {
            println!("\n{}", entry.word);
            for (i, definition) in entry.definitions.iter().enumerate() {
                println!("  {}. {}", i + 1, definition);
            }
            for example in &entry.examples {
                println!("  » {}", example);
            }
        }
        Ok(())
    }

    pub async fn show_saved(&self) -> Result<(), ApiError> {
        let articles = self.api.saved_articles().await?;

        println!("{}", self.display.format_header("Kaydedilen makaleler"));
        let headers = &["Başlık", "Slug", "Yazar", "Kategori"];
        println!("{}", self.display.format_table(headers, &self.article_rows(&articles)));
        Ok(())
    }

    pub async fn toggle_saved(&self, slug: &str) -> Result<(), ApiError> {
        let toggle = self.api.toggle_saved_article(slug).await?;
        println!("{}: {}", slug, self.display.format_saved(toggle.saved));
        Ok(())
    }

    pub fn refresh(&self) {
        info!("Refreshing: dropping all cached responses");
        self.api.clear_cache();
    }

    pub fn logout(&self) {
        self.api.logout();
    }
}
