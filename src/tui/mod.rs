pub mod app;
pub mod event;
pub mod layout;
pub mod marks;

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;

use crate::app::{AppContext, Result};
use crate::config::Config;
use crate::domain::FavoriteRecord;
use crate::viewmodel::{NewsState, NewsViewModel};

use self::app::{ActivePane, Screen, Section, TuiApp};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Receivers the screen redraws from.
struct Streams {
    news: watch::Receiver<NewsState>,
    favorites: watch::Receiver<Vec<FavoriteRecord>>,
}

async fn run_app(terminal: &mut Tui, ctx: &AppContext) -> Result<()> {
    let config = &ctx.config;
    let view_model = ctx.view_model();
    let mut tui_app = TuiApp::new();
    let event_handler = EventHandler::new(Duration::from_millis(100));

    let mut streams = Streams {
        news: view_model.subscribe(),
        favorites: view_model.favorites(),
    };
    let initial = streams.favorites.borrow_and_update().clone();
    tui_app.apply_favorites(&initial);

    view_model.get_everything(config.api.default_query.clone());

    loop {
        sync(&mut tui_app, &view_model, &mut streams);
        terminal.draw(|frame| layout::render(frame, &mut tui_app, &config.colors))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                tui_app.clear_status();
                if tui_app.is_searching() {
                    handle_search_key(&mut tui_app, &view_model, config, key);
                } else {
                    let action = config.keybindings.get_action(&key);
                    handle_action(&mut tui_app, &view_model, config, action);
                }
            }
            AppEvent::Tick => {}
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Pull whatever the background tasks published since the last frame.
fn sync(tui_app: &mut TuiApp, view_model: &NewsViewModel, streams: &mut Streams) {
    if streams.news.has_changed().unwrap_or(false) {
        let state = streams.news.borrow_and_update().clone();
        if tui_app.apply_news(state) {
            tui_app.track_marks(|url| view_model.is_favorite(url));
        }
    }

    if streams.favorites.has_changed().unwrap_or(false) {
        let records = streams.favorites.borrow_and_update().clone();
        tui_app.apply_favorites(&records);
    }

    tui_app.poll_marks();
}

fn handle_search_key(tui_app: &mut TuiApp, view_model: &NewsViewModel, config: &Config, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            if let Some(query) = tui_app.submit_search() {
                tui_app.show_headlines();
                view_model.search_news(query);
            }
        }
        KeyCode::Esc => {
            tui_app.cancel_search();
            reload_current(tui_app, view_model, config);
        }
        KeyCode::Backspace => {
            if let Some(input) = tui_app.search_input.as_mut() {
                input.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(input) = tui_app.search_input.as_mut() {
                input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_action(tui_app: &mut TuiApp, view_model: &NewsViewModel, config: &Config, action: Action) {
    match action {
        Action::Quit => {
            tui_app.should_quit = true;
        }
        Action::MoveUp => {
            tui_app.move_up();
        }
        Action::MoveDown => {
            tui_app.move_down();
        }
        Action::NextPage => {
            tui_app.next_page();
        }
        Action::PrevPage => {
            tui_app.prev_page();
        }
        Action::ToggleMaximize => {
            tui_app.toggle_maximize();
        }
        Action::NextPane => {
            tui_app.active_pane = tui_app.active_pane.next();
        }
        Action::PrevPane => {
            tui_app.active_pane = tui_app.active_pane.prev();
        }
        Action::Select => match tui_app.active_pane {
            ActivePane::Sections => {
                if let Some(section) = tui_app.selected_section() {
                    open_section(tui_app, view_model, config, section);
                }
            }
            ActivePane::Articles => {
                if tui_app.selected_article().is_some() {
                    tui_app.active_pane = ActivePane::Detail;
                }
            }
            ActivePane::Detail => {}
        },
        Action::Back => {
            if tui_app.screen == Screen::Favorites {
                tui_app.show_headlines();
            } else if tui_app.maximized {
                tui_app.toggle_maximize();
            } else if tui_app.last_query.is_some() {
                tui_app.cancel_search();
                reload_current(tui_app, view_model, config);
            } else if tui_app.active_pane == ActivePane::Detail {
                tui_app.active_pane = ActivePane::Articles;
            }
        }
        Action::ToggleFavorite => toggle_favorite(tui_app, view_model),
        Action::OpenInBrowser => {
            let link = tui_app
                .selected_article()
                .and_then(|a| a.key())
                .map(String::from);
            match link {
                Some(link) => {
                    if let Err(e) = open::that(&link) {
                        tui_app.set_status(format!("Failed to open browser: {}", e));
                    }
                }
                None => tui_app.set_status("Article has no link".to_string()),
            }
        }
        Action::Refresh => {
            if tui_app.screen == Screen::Favorites {
                return;
            }
            tui_app.last_query = None;
            match tui_app.current_category {
                Some(category) => view_model.get_news_by_category(category),
                None => view_model.get_all_news(config.categories.clone()),
            }
        }
        Action::Search => {
            tui_app.open_search();
        }
        Action::ShowFavorites => {
            tui_app.show_favorites();
        }
        Action::None => {}
    }
}

fn open_section(tui_app: &mut TuiApp, view_model: &NewsViewModel, config: &Config, section: Section) {
    match section {
        Section::Favorites => {
            tui_app.show_favorites();
            return;
        }
        Section::All => {
            tui_app.current_category = None;
            view_model.get_everything(config.api.default_query.clone());
        }
        Section::Category(category) => {
            tui_app.current_category = Some(category);
            view_model.get_news_by_category(category);
        }
    }
    tui_app.last_query = None;
    tui_app.show_headlines();
    tui_app.active_pane = ActivePane::Articles;
}

/// Closing a search returns to the current category or the initial feed.
fn reload_current(tui_app: &TuiApp, view_model: &NewsViewModel, config: &Config) {
    match tui_app.current_category {
        Some(category) => view_model.get_news_by_category(category),
        None => view_model.get_everything(config.api.default_query.clone()),
    }
}

fn toggle_favorite(tui_app: &mut TuiApp, view_model: &NewsViewModel) {
    let Some(article) = tui_app.selected_article().cloned() else {
        return;
    };
    let Some(url) = article.key().map(String::from) else {
        tui_app.set_status("Article has no link".to_string());
        return;
    };

    // The favorites screen only ever removes.
    if tui_app.screen == Screen::Favorites {
        let _ = view_model.remove_favorite(article);
        tui_app.set_status("Removed from favorites".to_string());
        return;
    }

    let make_favorite = !tui_app.marks.is_favorite(&url);
    tui_app.mark_favorite(&url, make_favorite);
    let _ = view_model.toggle_favorite(article, make_favorite);
    tui_app.set_status(if make_favorite {
        "Added to favorites".to_string()
    } else {
        "Removed from favorites".to_string()
    });
}
