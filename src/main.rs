mod app;
mod config;
mod detail;
mod error;
mod models;
mod omdb;
mod search;
mod ui;

#[cfg(test)]
mod testing;

use app::{App, AppEvent, InputMode, View};
use clap::{Parser, Subcommand};
use config::{AppConfig, ConfigOverrides};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use detail::DetailController;
use indicatif::{ProgressBar, ProgressStyle};
use omdb::{MovieApi, OmdbClient};
use regex::Regex;
use search::{PageChange, SearchController};
use std::path::PathBuf;
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

/// Search OMDb and browse movie details in the terminal
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a JSON config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// OMDb API key (overrides OMDB_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Base URL of the movie service; must be https
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Term used for the landing result set
    #[arg(long, global = true)]
    landing_term: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive explorer (default)
    Run,
    /// Search once and print one page of results
    Search {
        /// Search term; empty prints the landing set
        #[arg(default_value = "")]
        term: String,
        /// Page to show
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Fetch and print a single movie by IMDb id
    Show {
        /// IMDb id, e.g. tt0133093
        id: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_path = init_logging(cli.verbose)?;

    let overrides = ConfigOverrides {
        api_key: cli.api_key.clone(),
        base_url: cli.base_url.clone(),
        landing_term: cli.landing_term.clone(),
    };
    let config = match AppConfig::load(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let api: Arc<dyn MovieApi> = Arc::new(OmdbClient::new(&config)?);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            tracing::info!(log = %log_path.display(), "starting explorer");
            let (tx, mut rx) = unbounded_channel();
            let mut app = App::new(api, tx, config.landing_term.clone());
            app.init();

            // Init terminal
            let mut terminal = ratatui::init();

            // Main loop
            let result = run_app(&mut terminal, &mut app, &mut rx).await;

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Search { term, page, json } => {
            print_search(api.as_ref(), &config.landing_term, &term, page, json).await?;
        }
        Commands::Show { id, json } => {
            if !is_imdb_id(&id) {
                eprintln!("Error: not an IMDb id: {id}");
                std::process::exit(1);
            }
            print_detail(api.as_ref(), &id, json).await?;
        }
    }

    Ok(())
}

/// Log to a file in the cache directory; the terminal belongs to the TUI.
fn init_logging(verbose: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let project_dirs = config::project_dirs().ok_or("Could not determine home directory")?;
    let cache_dir = project_dirs.cache_dir();
    std::fs::create_dir_all(cache_dir)?;
    let log_path = cache_dir.join("movie-finder.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(log_path)
}

static IMDB_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tt\d+$").expect("IMDb id pattern is valid"));

fn is_imdb_id(id: &str) -> bool {
    IMDB_ID.is_match(id)
}

fn spinner(message: &str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

async fn print_search(
    api: &dyn MovieApi,
    landing_term: &str,
    term: &str,
    page: u32,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = spinner("Searching...")?;
    let mut controller = SearchController::new();
    if term.is_empty() {
        controller.load_landing(api, landing_term).await;
    } else {
        controller.search(api, term).await;
    }
    let change = if page == controller.page() {
        PageChange::Local
    } else {
        controller.change_page(api, page).await
    };
    pb.finish_and_clear();

    if let Some(error) = controller.error() {
        eprintln!("{error}");
        std::process::exit(1);
    }
    if change == PageChange::Rejected {
        eprintln!(
            "Error: page {} is out of range (1-{})",
            page,
            controller.total_pages()
        );
        std::process::exit(1);
    }

    let result_page = controller.current_page();
    if json {
        println!("{}", serde_json::to_string_pretty(&result_page)?);
        return Ok(());
    }
    if result_page.items.is_empty() {
        println!("No movies found.");
        return Ok(());
    }
    println!("Page {} of {}", result_page.page_number, result_page.total_pages);
    for movie in result_page.items {
        println!(
            "{}  {} ({})  Runtime: {}",
            movie.id,
            movie.title,
            movie.year,
            movie.runtime_label()
        );
        println!("    {}", movie.plot_label());
    }
    Ok(())
}

async fn print_detail(
    api: &dyn MovieApi,
    id: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = spinner("Loading movie...")?;
    let mut controller = DetailController::new();
    controller.load_detail(api, id).await;
    pb.finish_and_clear();

    let Some(movie) = controller.movie() else {
        eprintln!("{}", controller.error().unwrap_or(detail::DETAIL_DEFAULT_ERROR));
        std::process::exit(1);
    };

    if json {
        let value = serde_json::json!({
            "movie": movie,
            "reviews": controller.reviews(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", movie.title);
    println!("Poster:   {}", movie.poster);
    println!();
    println!("{}", movie.plot);
    println!();
    println!("Year:     {}", movie.year);
    println!("Director: {}", movie.director);
    println!("Actors:   {}", movie.actors);
    println!("Rating:   {}", movie.imdb_rating);
    println!("Genre:    {}", movie.genre);
    println!("Runtime:  {}", movie.runtime);
    println!();
    println!("Reviews");
    for review in controller.reviews() {
        println!("  {}: {}", review.author, review.content);
    }
    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    events: &mut UnboundedReceiver<AppEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(completed) = events.try_recv() {
            app.handle_event(completed);
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a short timeout so fetch completions show up promptly
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key(app, key);
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.feedback.is_some() {
        app.handle_feedback_key(key);
        return;
    }

    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_search_input(app, key);
        return;
    }
    match app.view {
        View::List => handle_list_key(app, key),
        View::Detail => handle_detail_key(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.submit_search();
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
        }
        _ => {}
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.list_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.list_prev();
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
            app.next_page();
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
            app.prev_page();
        }
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(page) = c.to_digit(10) {
                app.change_page(page);
            }
        }
        KeyCode::Enter => {
            app.open_detail();
        }
        KeyCode::Char('f') => {
            app.toggle_feedback();
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
            app.close_detail();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_down();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_up();
        }
        KeyCode::PageDown => {
            app.scroll_page_down();
        }
        KeyCode::PageUp => {
            app.scroll_page_up();
        }
        _ => {}
    }
}
