use clap::Parser;
use color_eyre::Result;
use daytoday_tui::{
    AppState, Config, Profile, Store,
    cli::{Cli, Commands},
    logging, utils,
};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = Config::load_with_profile(profile)?;

    // Logs go to a file in the data dir; the handle must outlive the run
    let data_dir = utils::get_data_dir(profile)
        .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine data directory"))?;
    let _logger = logging::init(&config.log_level, &data_dir.join("logs"))?;

    let db_path = config.get_database_path();
    let store = Store::open(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Store path contains invalid UTF-8"))?,
    )?;

    let mut state = AppState::new(store);

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            // A remembered session skips the login screen
            state.restore_session()?;
            let app = daytoday_tui::tui::App::new(config, state);
            daytoday_tui::tui::run_event_loop(app)?;
        }
        Commands::Login { email } => {
            daytoday_tui::cli::handle_login(email, &mut state)?;
        }
        Commands::Logout => {
            daytoday_tui::cli::handle_logout(&mut state)?;
        }
        Commands::AddTask {
            title,
            priority,
            due,
        } => {
            daytoday_tui::cli::handle_add_task(title, priority, due, &mut state)?;
        }
        Commands::AddNote { title, content } => {
            daytoday_tui::cli::handle_add_note(title, content, &mut state)?;
        }
        Commands::Suggest { context, import } => {
            daytoday_tui::cli::handle_suggest(context, import, &mut state)?;
        }
        Commands::Stats => {
            daytoday_tui::cli::handle_stats(&mut state)?;
        }
    }

    Ok(())
}
