//! console-menu demo
//!
//! A main menu leading to a list of tasks, each shown on its own
//! function screen.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use console_menu::logging;
use console_menu::tui::input::ScriptedInput;
use console_menu::tui::run::Application;
use console_menu::tui::surface::CrosstermSurface;

#[derive(Parser)]
#[command(name = "console-menu")]
#[command(about = "Menu-driven console demo")]
#[command(version)]
struct Cli {
    /// Directory for log files (default: platform cache dir)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Delay between task steps, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Drive the UI from a JSON array of key names instead of the keyboard
    #[arg(long)]
    replay: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Screens {
    MainScreen,
    Processes,
    Process1,
    Process2,
    Process3,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = cli.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    // Logging is optional: the demo still runs without it.
    let _logging = match logging::init(&log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Note: logging disabled: {}", e);
            None
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "demo failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let step = Duration::from_millis(cli.delay_ms);
    let mut app = build_app(step).map_err(|e| e.to_string())?;

    let result = match cli.replay {
        Some(path) => {
            let mut input = ScriptedInput::from_json_file(&path)
                .map_err(|e| format!("{}: {}", path.display(), e))?;
            let mut surface = CrosstermSurface::stdout();
            app.run(&mut surface, &mut input).await
        }
        None => app.run_terminal().await,
    };
    result.map_err(|e| e.to_string())
}

// ============================================================================
// SCREENS
// ============================================================================

fn build_app(step: Duration) -> console_menu::Result<Application<Screens>> {
    let mut app = Application::new(Screens::MainScreen);

    app.add_menu_screen(Screens::MainScreen)?
        .with_keyed_menu_option('p', "Select Process to run", Screens::Processes)
        .with_keyed_quit_option('q', "Quit");

    app.add_menu_screen(Screens::Processes)?
        .with_menu_option("Task 1 (long)", Screens::Process1)
        .with_menu_option("Task 2 (short)", Screens::Process2)
        .with_menu_option("Task 3 (switch context)", Screens::Process3);

    app.add_function_screen(Screens::Process1)?
        .set_action(move || long_task(step));

    app.add_function_screen(Screens::Process2)?
        .set_action(|| async {
            println!("[{}] I'm done already!", thread_label());
        });

    app.add_function_screen(Screens::Process3)?
        .set_action(move || switching_task(step));

    Ok(app)
}

// ============================================================================
// TASKS
// ============================================================================

const STEPS: [&str; 3] = ["Running...", "Almost done...", "Just finishing up..."];

/// Three timed steps with a progress bar.
async fn long_task(step: Duration) {
    let pb = ProgressBar::new(STEPS.len() as u64);
    let template = "{spinner:.green} [{bar:20.cyan/blue}] {pos}/{len} {msg}";
    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        pb.set_style(style.progress_chars("█▓░"));
    }

    for msg in STEPS {
        pb.set_message(msg);
        tokio::time::sleep(step).await;
        pb.inc(1);
    }
    pb.finish_with_message("Done!");
}

/// Timed steps that yield to the runtime in between, reporting the
/// thread each step resumed on.
///
/// The demo runs on a current-thread runtime, so every step reports the
/// same thread id.
async fn switching_task(step: Duration) {
    for msg in STEPS {
        println!("[Thread: {}] {}", thread_label(), msg);
        tokio::task::yield_now().await;
        tokio::time::sleep(step).await;
    }
    println!("[Thread: {}] Done!", thread_label());
}

fn thread_label() -> String {
    format!("{:?}", std::thread::current().id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_registry_is_complete() {
        let app = build_app(Duration::ZERO).unwrap();
        assert_eq!(app.len(), 5);
        assert!(app.validate().is_ok());
        assert_eq!(app.start_screen(), &Screens::MainScreen);
    }

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["console-menu"]);
        assert_eq!(cli.delay_ms, 1000);
        assert!(cli.replay.is_none());
        assert!(cli.log_dir.is_none());
    }

    #[test]
    fn cli_parses_replay_and_delay() {
        let cli = Cli::parse_from(["console-menu", "--delay-ms", "5", "--replay", "keys.json"]);
        assert_eq!(cli.delay_ms, 5);
        assert_eq!(cli.replay, Some(PathBuf::from("keys.json")));
    }

    #[tokio::test]
    async fn tasks_complete_with_zero_delay() {
        long_task(Duration::ZERO).await;
        switching_task(Duration::ZERO).await;
    }
}
