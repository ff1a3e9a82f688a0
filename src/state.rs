use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{nav::MenuState, theme::Theme};

// One writer per field: the theme controller owns the theme, the nav
// coordinator owns the menu and the active section.
#[derive(Debug)]
pub struct PresentationState {
    theme: Cell<Theme>,
    menu: Cell<MenuState>,
    menu_installed: Cell<bool>,
    active_section: RefCell<Option<String>>,
}

impl PresentationState {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            theme: Cell::new(Theme::Dark),
            menu: Cell::new(MenuState::Closed),
            menu_installed: Cell::new(false),
            active_section: RefCell::new(None),
        })
    }

    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    pub fn menu(&self) -> MenuState {
        self.menu.get()
    }

    pub fn menu_installed(&self) -> bool {
        self.menu_installed.get()
    }

    pub fn active_section(&self) -> Option<String> {
        self.active_section.borrow().clone()
    }

    pub(crate) fn set_theme(&self, theme: Theme) {
        self.theme.set(theme);
    }

    pub(crate) fn set_menu(&self, menu: MenuState) {
        self.menu.set(menu);
    }

    pub(crate) fn set_menu_installed(&self, installed: bool) {
        self.menu_installed.set(installed);
    }

    pub(crate) fn set_active_section(&self, section: Option<String>) {
        *self.active_section.borrow_mut() = section;
    }
}
