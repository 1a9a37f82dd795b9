//! Application: screen registry and the run loop.
//!
//! The only module that sequences effects. Screens are registered up
//! front through builder calls; `run` then alternates between rendering
//! the current screen and feeding it one key, until a menu's termination
//! item is chosen.
//!
//! Everything happens on one task. Suspension points are the key read
//! and a function screen's action; nothing runs concurrently with either.
//! An action that never completes stalls the loop.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::types::ScreenId;

use super::input::{CrosstermInput, InputSource};
use super::state::{FunctionScreen, MenuScreen, Screen, Transition};
use super::surface::{CrosstermSurface, RenderSurface};

/// A set of screens and the id the run loop starts from.
pub struct Application<Id> {
    start: Id,
    screens: HashMap<Id, Screen<Id>>,
}

// ============================================================================
// REGISTRATION
// ============================================================================

impl<Id: ScreenId> Application<Id> {
    pub fn new(start: Id) -> Self {
        Application {
            start,
            screens: HashMap::new(),
        }
    }

    /// Register a menu under `id` and return it for configuration.
    ///
    /// # Errors
    /// `DuplicateScreenId` if `id` is taken; the registry is unchanged.
    pub fn add_menu_screen(&mut self, id: Id) -> Result<&mut MenuScreen<Id>> {
        let screen = self.register(Screen::Menu(MenuScreen::new(id)))?;
        match screen {
            Screen::Menu(menu) => Ok(menu),
            Screen::Function(_) => unreachable!("just registered a menu"),
        }
    }

    /// Register a function screen under `id` and return it for configuration.
    ///
    /// Its next screen defaults to the start screen.
    ///
    /// # Errors
    /// `DuplicateScreenId` if `id` is taken; the registry is unchanged.
    pub fn add_function_screen(&mut self, id: Id) -> Result<&mut FunctionScreen<Id>> {
        let next = self.start.clone();
        let screen = self.register(Screen::Function(FunctionScreen::new(id, next)))?;
        match screen {
            Screen::Function(function) => Ok(function),
            Screen::Menu(_) => unreachable!("just registered a function screen"),
        }
    }

    fn register(&mut self, screen: Screen<Id>) -> Result<&mut Screen<Id>> {
        use std::collections::hash_map::Entry;

        match self.screens.entry(screen.id().clone()) {
            Entry::Occupied(entry) => {
                tracing::debug!(screen = ?entry.key(), "duplicate screen registration");
                Err(AppError::duplicate(entry.key()))
            }
            Entry::Vacant(entry) => {
                tracing::debug!(screen = ?entry.key(), "registered screen");
                Ok(entry.insert(screen))
            }
        }
    }

    pub fn start_screen(&self) -> &Id {
        &self.start
    }

    pub fn screen(&self, id: &Id) -> Option<&Screen<Id>> {
        self.screens.get(id)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Check that the start screen and every transition target exist.
    ///
    /// # Errors
    /// `UnknownScreenId` naming the first missing id found.
    pub fn validate(&self) -> Result<()> {
        if !self.screens.contains_key(&self.start) {
            return Err(AppError::unknown(&self.start));
        }
        for screen in self.screens.values() {
            if let Some(missing) = screen
                .targets()
                .into_iter()
                .find(|target| !self.screens.contains_key(*target))
            {
                return Err(AppError::unknown(missing));
            }
        }
        Ok(())
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

impl<Id: ScreenId> Application<Id> {
    /// Run against the real terminal on stdout.
    pub async fn run_terminal(&mut self) -> Result<()> {
        let mut surface = CrosstermSurface::stdout();
        let mut input = CrosstermInput::new();
        self.run(&mut surface, &mut input).await
    }

    /// Render the start screen, then dispatch keys until a termination
    /// item is chosen.
    ///
    /// # Errors
    /// `UnknownScreenId` before the first render if the registry is
    /// incomplete. Input or surface failures abort the loop.
    pub async fn run<S, I>(&mut self, surface: &mut S, input: &mut I) -> Result<()>
    where
        S: RenderSurface + ?Sized,
        I: InputSource + ?Sized,
    {
        if let Err(err) = self.validate() {
            tracing::debug!(error = %err, "refusing to start");
            return Err(err);
        }

        let mut current = self.start.clone();
        tracing::info!(start = ?current, screens = self.screens.len(), "run loop started");

        self.lookup(&current)?.render(&mut *surface).await?;

        loop {
            let key = input.read_key(true)?;

            let transition = self.lookup_mut(&current)?.handle_key(key);
            match transition {
                Transition::Screen(next) => {
                    if next != current {
                        tracing::debug!(from = ?current, to = ?next, "transition");
                    }
                    current = next;
                }
                Transition::Quit => {
                    tracing::info!(last = ?current, "run loop terminated");
                    return Ok(());
                }
            }

            self.lookup(&current)?.render(&mut *surface).await?;
        }
    }

    fn lookup(&self, id: &Id) -> Result<&Screen<Id>> {
        self.screens.get(id).ok_or_else(|| AppError::unknown(id))
    }

    fn lookup_mut(&mut self, id: &Id) -> Result<&mut Screen<Id>> {
        self.screens.get_mut(id).ok_or_else(|| AppError::unknown(id))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::ScriptedInput;
    use crate::tui::surface::GridSurface;
    use crate::tui::view::CONTINUE_PROMPT;
    use crate::types::KeyEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Screens {
        MainScreen,
        Processes,
        Process1,
        Process2,
    }

    /// The demo layout, with actions recording into `log`.
    fn demo_app(log: Rc<RefCell<Vec<&'static str>>>) -> Application<Screens> {
        let mut app = Application::new(Screens::MainScreen);

        app.add_menu_screen(Screens::MainScreen)
            .unwrap()
            .with_keyed_menu_option('p', "Select Process to run", Screens::Processes)
            .with_keyed_quit_option('q', "Quit");

        app.add_menu_screen(Screens::Processes)
            .unwrap()
            .with_menu_option("Task 1", Screens::Process1)
            .with_menu_option("Task 2", Screens::Process2);

        let log1 = log.clone();
        app.add_function_screen(Screens::Process1)
            .unwrap()
            .set_action(move || {
                let log = log1.clone();
                async move { log.borrow_mut().push("task1"); }
            });

        let log2 = log;
        app.add_function_screen(Screens::Process2)
            .unwrap()
            .set_action(move || {
                let log = log2.clone();
                async move { log.borrow_mut().push("task2"); }
            });

        app
    }

    fn keys(names: &[&str]) -> ScriptedInput {
        ScriptedInput::new(names.iter().map(|n| n.parse::<KeyEvent>().unwrap()))
    }

    // -- Registration --

    #[test]
    fn duplicate_menu_id_is_rejected() {
        let mut app = Application::new(Screens::MainScreen);
        app.add_menu_screen(Screens::MainScreen)
            .unwrap()
            .with_quit_option("Quit");

        let err = app.add_menu_screen(Screens::MainScreen).unwrap_err();
        assert!(matches!(err, AppError::DuplicateScreenId { ref id } if id == "MainScreen"));

        // Original registration untouched.
        match app.screen(&Screens::MainScreen) {
            Some(Screen::Menu(menu)) => assert_eq!(menu.items().len(), 1),
            other => panic!("Expected original menu, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_across_screen_kinds_is_rejected() {
        let mut app = Application::new(Screens::MainScreen);
        app.add_function_screen(Screens::Process1).unwrap();
        assert!(matches!(
            app.add_menu_screen(Screens::Process1),
            Err(AppError::DuplicateScreenId { .. })
        ));
        assert_eq!(app.len(), 1);
    }

    #[test]
    fn function_screen_defaults_next_to_start() {
        let mut app = Application::new(Screens::MainScreen);
        let screen = app.add_function_screen(Screens::Process1).unwrap();
        assert_eq!(screen.next_screen(), &Screens::MainScreen);
    }

    #[test]
    fn validate_reports_missing_start() {
        let app: Application<Screens> = Application::new(Screens::MainScreen);
        assert!(app.is_empty());
        assert!(matches!(
            app.validate(),
            Err(AppError::UnknownScreenId { ref id }) if id == "MainScreen"
        ));
    }

    #[test]
    fn validate_reports_missing_target() {
        let mut app = Application::new(Screens::MainScreen);
        app.add_menu_screen(Screens::MainScreen)
            .unwrap()
            .with_menu_option("Go", Screens::Processes);
        assert!(matches!(
            app.validate(),
            Err(AppError::UnknownScreenId { ref id }) if id == "Processes"
        ));
    }

    #[test]
    fn validate_accepts_complete_registry() {
        let app = demo_app(Rc::default());
        assert!(app.validate().is_ok());
    }

    // -- Run loop --

    #[tokio::test]
    async fn quit_shortcut_ends_run() {
        let mut app = demo_app(Rc::default());
        let mut grid = GridSurface::new(60, 12);
        let mut input = keys(&["q"]);

        app.run(&mut grid, &mut input).await.unwrap();
        assert_eq!(input.remaining(), 0);
        assert_eq!(grid.row(3), "    q Quit");
    }

    #[tokio::test]
    async fn down_then_enter_on_quit_ends_run() {
        let mut app = demo_app(Rc::default());
        let mut grid = GridSurface::new(60, 12);
        let mut input = keys(&["down", "enter", "p"]);

        app.run(&mut grid, &mut input).await.unwrap();
        assert_eq!(input.remaining(), 1);
    }

    #[tokio::test]
    async fn navigates_into_task_and_back_to_start() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = demo_app(log.clone());
        let mut grid = GridSurface::new(60, 12);
        // Processes → Task 2 → any key → main → quit
        let mut input = keys(&["p", "down", "enter", "x", "q"]);

        app.run(&mut grid, &mut input).await.unwrap();
        assert_eq!(*log.borrow(), vec!["task2"]);
        assert_eq!(input.remaining(), 0);
    }

    #[tokio::test]
    async fn function_screen_shows_prompt_after_action() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut app = demo_app(log.clone());
        let mut grid = GridSurface::new(60, 12);
        // Stop while the task screen is displayed: the script runs dry.
        let mut input = keys(&["enter", "enter"]);

        let err = app.run(&mut grid, &mut input).await.unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(*log.borrow(), vec!["task1"]);
        assert!(grid.contents().contains(CONTINUE_PROMPT));
    }

    #[tokio::test]
    async fn menu_selection_survives_round_trip() {
        let mut app = demo_app(Rc::default());
        let mut grid = GridSurface::new(60, 12);
        // Move to Task 2, run it, return to main, reopen Processes.
        let mut input = keys(&["p", "down", "enter", "x", "p"]);

        let _ = app.run(&mut grid, &mut input).await;
        assert_eq!(grid.row(3), "  >   Task 2");
    }

    #[tokio::test]
    async fn missing_action_is_rendered_and_loop_continues() {
        let mut app = Application::new(Screens::MainScreen);
        app.add_menu_screen(Screens::MainScreen)
            .unwrap()
            .with_keyed_menu_option('r', "Run", Screens::Process1)
            .with_keyed_quit_option('q', "Quit");
        app.add_function_screen(Screens::Process1).unwrap();

        let mut grid = GridSurface::new(60, 12);
        let mut input = keys(&["r"]);
        let _ = app.run(&mut grid, &mut input).await;
        assert!(grid.row(0).contains("'Process1'"));

        // Any key from there lands back on the start screen.
        let mut input = keys(&["r", "x", "q"]);
        app.run(&mut grid, &mut input).await.unwrap();
        assert_eq!(input.remaining(), 0);
    }

    #[tokio::test]
    async fn overridden_next_screen_is_followed() {
        let mut app = Application::new(Screens::MainScreen);
        app.add_menu_screen(Screens::MainScreen)
            .unwrap()
            .with_keyed_menu_option('r', "Run", Screens::Process1);
        app.add_function_screen(Screens::Process1)
            .unwrap()
            .set_action(|| async {})
            .set_next_screen(Screens::Processes);
        app.add_menu_screen(Screens::Processes)
            .unwrap()
            .with_keyed_quit_option('q', "Quit");

        let mut grid = GridSurface::new(60, 12);
        let mut input = keys(&["r", "x", "q"]);
        app.run(&mut grid, &mut input).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_start_fails_before_rendering() {
        let mut app = Application::new(Screens::Processes);
        app.add_menu_screen(Screens::MainScreen)
            .unwrap()
            .with_quit_option("Quit");

        let mut grid = GridSurface::new(60, 12);
        let mut input = keys(&["enter"]);
        let err = app.run(&mut grid, &mut input).await.unwrap_err();

        assert!(matches!(err, AppError::UnknownScreenId { ref id } if id == "Processes"));
        assert_eq!(grid.contents(), "");
        assert_eq!(input.remaining(), 1);
    }

    #[tokio::test]
    async fn unregistered_target_fails_before_rendering() {
        let mut app = Application::new(Screens::MainScreen);
        app.add_menu_screen(Screens::MainScreen)
            .unwrap()
            .with_menu_option("Go", Screens::Process2);

        let mut grid = GridSurface::new(60, 12);
        let err = app.run(&mut grid, &mut keys(&["enter"])).await.unwrap_err();
        assert!(matches!(err, AppError::UnknownScreenId { ref id } if id == "Process2"));
    }

    #[tokio::test]
    async fn runs_through_trait_objects() {
        let mut app = demo_app(Rc::default());
        let mut grid = GridSurface::new(60, 12);
        let mut script = keys(&["p", "down", "enter", "x", "q"]);

        let surface: &mut dyn RenderSurface = &mut grid;
        let input: &mut dyn InputSource = &mut script;
        app.run(surface, input).await.unwrap();
        assert_eq!(script.remaining(), 0);
    }

    #[tokio::test]
    async fn interrupt_from_input_aborts_run() {
        struct CtrlC;
        impl InputSource for CtrlC {
            fn read_key(&mut self, _intercept: bool) -> std::io::Result<KeyEvent> {
                Err(std::io::Error::new(std::io::ErrorKind::Interrupted, "ctrl-c"))
            }
        }

        let mut app = demo_app(Rc::default());
        let mut grid = GridSurface::new(60, 12);
        let err = app.run(&mut grid, &mut CtrlC).await.unwrap_err();
        assert!(matches!(err, AppError::Interrupted));
    }
}
