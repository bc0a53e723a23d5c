use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, path::PathBuf, sync::mpsc::Receiver, time::Duration};
use todo_deck::{
    config::{Config, Overrides},
    input::{self, Flow},
    logging, ui, view, weather, App, JsonFileSlot, TaskStore,
};

#[derive(Parser, Debug)]
#[command(name = "todo-deck", version, about = "Terminal to-do list manager")]
struct Args {
    /// Config file, defaults to the platform config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Task file to use instead of the configured one
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Skip the weather lookup
    #[arg(long)]
    no_weather: bool,
}

fn main() -> eyre::Result<()> {
    let args = Args::parse();
    let config = Config::load(
        args.config.as_deref(),
        Overrides {
            data_file: args.data_file,
            no_weather: args.no_weather,
        },
    )?;
    if let Err(err) = logging::init_logging(&config.log_level, &config.log_dir) {
        eprintln!("logging disabled: {err}");
    }

    let store = TaskStore::open(Box::new(JsonFileSlot::new(&config.data_file)))?;
    let mut app = App::new(store, config.export_dir.clone(), today());
    let weather = config
        .weather
        .then(|| weather::spawn_fetch(config.weather_url.clone()));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, weather);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}

fn today() -> String {
    view::iso_date(&Local::now())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    weather: Option<Receiver<String>>,
) -> io::Result<()> {
    loop {
        if let Some(text) = weather.as_ref().and_then(|rx| rx.try_recv().ok()) {
            app.weather = Some(text);
        }
        app.set_today(today());

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if input::handle_key(app, key) == Flow::Quit {
                    return Ok(());
                }
            }
        }
    }
}
