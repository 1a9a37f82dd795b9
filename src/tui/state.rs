//! Screen state: the types every layer programs against.
//!
//! A [`Screen`] is one state of the navigation machine. Menus carry their
//! items and the selection cursor; function screens carry the action to
//! run and where to go afterwards. Key handling lives in `update`,
//! drawing in `view`.

use std::fmt;
use std::future::Future;

use futures::future::{FutureExt, LocalBoxFuture};

use crate::types::{MenuItem, ScreenId};

// ============================================================================
// ACTIONS
// ============================================================================

/// Work a function screen performs while displayed.
///
/// Called once per display and awaited before the "press any key" prompt.
/// Futures are local: the loop runs on a single thread.
pub type Action = Box<dyn Fn() -> LocalBoxFuture<'static, ()>>;

// ============================================================================
// TRANSITIONS
// ============================================================================

/// What a screen decided after consuming a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<Id> {
    /// Make this screen current (may be the same screen).
    Screen(Id),
    /// End the run loop.
    Quit,
}

// ============================================================================
// SCREENS
// ============================================================================

/// A registered screen.
pub enum Screen<Id> {
    Menu(MenuScreen<Id>),
    Function(FunctionScreen<Id>),
}

impl<Id: ScreenId> Screen<Id> {
    pub fn id(&self) -> &Id {
        match self {
            Screen::Menu(menu) => &menu.id,
            Screen::Function(function) => &function.id,
        }
    }

    /// Screen ids this screen can transition to.
    pub fn targets(&self) -> Vec<&Id> {
        match self {
            Screen::Menu(menu) => menu.items.iter().filter_map(|i| i.target.as_ref()).collect(),
            Screen::Function(function) => vec![&function.next],
        }
    }
}

impl<Id: ScreenId> fmt::Debug for Screen<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Menu(menu) => f.debug_tuple("Menu").field(menu).finish(),
            Screen::Function(function) => f.debug_tuple("Function").field(function).finish(),
        }
    }
}

/// A list of options navigated with the arrow keys or shortcuts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuScreen<Id> {
    pub(crate) id: Id,
    /// Display and navigation order.
    pub(crate) items: Vec<MenuItem<Id>>,
    /// Focused row. Always a valid index once the menu has items.
    pub(crate) selected: usize,
    pub(crate) padding: (u16, u16),
}

/// A screen that runs an action, then continues to `next` on any key.
pub struct FunctionScreen<Id> {
    pub(crate) id: Id,
    pub(crate) action: Option<Action>,
    pub(crate) next: Id,
}

impl<Id: ScreenId> fmt::Debug for FunctionScreen<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionScreen")
            .field("id", &self.id)
            .field("action", &self.action.as_ref().map(|_| "<action>"))
            .field("next", &self.next)
            .finish()
    }
}

// ============================================================================
// CONSTRUCTORS & BUILDERS
// ============================================================================

/// Offset of the first menu row from the top-left corner.
pub const DEFAULT_PADDING: (u16, u16) = (2, 2);

impl<Id: ScreenId> MenuScreen<Id> {
    pub fn new(id: Id) -> Self {
        MenuScreen {
            id,
            items: Vec::new(),
            selected: 0,
            padding: DEFAULT_PADDING,
        }
    }

    /// Option leading to `target`.
    pub fn with_menu_option(&mut self, text: impl Into<String>, target: Id) -> &mut Self {
        self.push(None, text.into(), Some(target))
    }

    /// Option leading to `target`, also selectable with `key`.
    pub fn with_keyed_menu_option(
        &mut self,
        key: char,
        text: impl Into<String>,
        target: Id,
    ) -> &mut Self {
        self.push(Some(key), text.into(), Some(target))
    }

    /// Termination option: choosing it ends the run loop.
    pub fn with_quit_option(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(None, text.into(), None)
    }

    /// Termination option, also selectable with `key`.
    pub fn with_keyed_quit_option(&mut self, key: char, text: impl Into<String>) -> &mut Self {
        self.push(Some(key), text.into(), None)
    }

    pub fn set_padding(&mut self, x: u16, y: u16) -> &mut Self {
        self.padding = (x, y);
        self
    }

    fn push(&mut self, key: Option<char>, text: String, target: Option<Id>) -> &mut Self {
        self.items.push(MenuItem { key, text, target });
        self
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn items(&self) -> &[MenuItem<Id>] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn padding(&self) -> (u16, u16) {
        self.padding
    }
}

impl<Id: ScreenId> FunctionScreen<Id> {
    /// Function screen continuing to `next` once dismissed.
    pub fn new(id: Id, next: Id) -> Self {
        FunctionScreen {
            id,
            action: None,
            next,
        }
    }

    /// Set the work performed each time the screen is displayed.
    ///
    /// The returned future is awaited to completion; it may sleep or
    /// print along the way.
    pub fn set_action<F, Fut>(&mut self, action: F) -> &mut Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        self.action = Some(Box::new(move || action().boxed_local()));
        self
    }

    pub fn set_next_screen(&mut self, next: Id) -> &mut Self {
        self.next = next;
        self
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn next_screen(&self) -> &Id {
        &self.next
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Screens {
        Main,
        Processes,
        Process1,
    }

    #[test]
    fn menu_starts_at_first_item_with_default_padding() {
        let menu = MenuScreen::new(Screens::Main);
        assert_eq!(menu.selected(), 0);
        assert_eq!(menu.padding(), (2, 2));
        assert!(menu.items().is_empty());
    }

    #[test]
    fn builder_preserves_insertion_order() {
        let mut menu = MenuScreen::new(Screens::Main);
        menu.with_keyed_menu_option('p', "Select", Screens::Processes)
            .with_menu_option("Run", Screens::Process1)
            .with_quit_option("Leave")
            .with_keyed_quit_option('q', "Quit");

        let texts: Vec<&str> = menu.items().iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["Select", "Run", "Leave", "Quit"]);

        let keys: Vec<Option<char>> = menu.items().iter().map(|i| i.key).collect();
        assert_eq!(keys, vec![Some('p'), None, None, Some('q')]);

        assert_eq!(menu.items()[1].target, Some(Screens::Process1));
        assert!(menu.items()[2].is_termination());
    }

    #[test]
    fn set_padding_overrides_default() {
        let mut menu = MenuScreen::new(Screens::Main);
        menu.set_padding(4, 1);
        assert_eq!(menu.padding(), (4, 1));
    }

    #[test]
    fn function_screen_builder() {
        let mut screen = FunctionScreen::new(Screens::Process1, Screens::Main);
        assert!(!screen.has_action());
        assert_eq!(screen.next_screen(), &Screens::Main);

        screen.set_action(|| async {}).set_next_screen(Screens::Processes);
        assert!(screen.has_action());
        assert_eq!(screen.next_screen(), &Screens::Processes);
    }

    #[test]
    fn targets_list_every_referenced_id() {
        let mut menu = MenuScreen::new(Screens::Main);
        menu.with_menu_option("a", Screens::Processes)
            .with_quit_option("q")
            .with_menu_option("b", Screens::Process1);
        let screen = Screen::Menu(menu);
        assert_eq!(
            screen.targets(),
            vec![&Screens::Processes, &Screens::Process1]
        );

        let function = Screen::Function(FunctionScreen::new(Screens::Process1, Screens::Main));
        assert_eq!(function.targets(), vec![&Screens::Main]);
        assert_eq!(function.id(), &Screens::Process1);
    }

    #[test]
    fn transition_variants_are_distinguishable() {
        assert_ne!(Transition::Screen(Screens::Main), Transition::Quit);
        assert_ne!(
            Transition::Screen(Screens::Main),
            Transition::Screen(Screens::Processes)
        );
    }
}
