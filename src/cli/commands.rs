use crate::app::{AppContext, HeadlinesError, Result};
use crate::domain::{Article, Category};
use crate::repository::NewsRepository;
use crate::viewmodel::{NewsState, NewsViewModel};

pub async fn top(ctx: &AppContext, category: Category, country: Option<String>) -> Result<()> {
    let country = country.unwrap_or_else(|| ctx.config.api.country.clone());
    let view_model = NewsViewModel::new(ctx.repository.clone(), country);
    view_model.load_by_category(category).await;
    report(&ctx.repository, view_model.state())
}

pub async fn search(ctx: &AppContext, query: &str) -> Result<()> {
    let view_model = ctx.view_model();
    view_model.load_search(query).await;
    report(&ctx.repository, view_model.state())
}

pub async fn everything(ctx: &AppContext, query: Option<String>) -> Result<()> {
    let query = query.unwrap_or_else(|| ctx.config.api.default_query.clone());
    let view_model = ctx.view_model();
    view_model.load_everything(&query).await;
    report(&ctx.repository, view_model.state())
}

pub async fn all(ctx: &AppContext, categories: Vec<Category>) -> Result<()> {
    let categories = if categories.is_empty() {
        ctx.config.categories.clone()
    } else {
        categories
    };

    let view_model = ctx.view_model();
    view_model.load_all_news(&categories).await;
    report(&ctx.repository, view_model.state())
}

pub fn list_favorites(ctx: &AppContext) -> Result<()> {
    let favorites = ctx.repository.list_favorites()?;

    if favorites.is_empty() {
        println!("No favorites yet");
        return Ok(());
    }

    for favorite in favorites {
        let article = Article::from(favorite);
        println!("{}", format_line(&article));
    }

    Ok(())
}

pub fn unfavorite(ctx: &AppContext, url: &str) -> Result<()> {
    if !ctx.repository.is_favorite(url)? {
        println!("Not a favorite: {}", url);
        return Ok(());
    }

    ctx.repository.remove_favorite_url(url)?;
    println!("Removed favorite: {}", url);
    Ok(())
}

/// Print a settled fetch, or turn its error into the command's failure.
fn report(repository: &NewsRepository, state: NewsState) -> Result<()> {
    if let Some(error) = state.error {
        return Err(HeadlinesError::Other(error));
    }

    if let Some(message) = state.empty_message() {
        println!("{}", message);
        return Ok(());
    }

    for mut article in state.articles {
        let marked = match article.key() {
            Some(url) => repository.is_favorite(url)?,
            None => false,
        };
        article.is_favorite = marked;
        println!("{}", format_line(&article));
    }

    Ok(())
}

fn format_line(article: &Article) -> String {
    let marker = if article.is_favorite { "♥" } else { " " };
    let date = article
        .published_timestamp()
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| " ".repeat(16));

    let mut line = format!(
        "{} {} [{}] {}",
        marker,
        date,
        article.display_category(),
        article.display_title()
    );
    if let Some(source) = article.source_name() {
        line.push_str(&format!(" ({})", source));
    }
    if let Some(url) = article.key() {
        line.push_str(&format!("\n  {}", url));
    }
    line
}
