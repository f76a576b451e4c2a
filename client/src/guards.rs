//! Page routes and the two access guards in front of them.

use std::fmt;

use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Habits,
    NewHabit,
    EditHabit(i64),
    Calendar,
    Stats,
    ExcelLoader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(Route),
}

/// Lets signed-in users through, sends everyone else to the login page.
pub fn require_authenticated(session: &SessionStore) -> GuardOutcome {
    if session.is_authenticated() {
        GuardOutcome::Allow
    } else {
        GuardOutcome::Redirect(Route::Login)
    }
}

/// Keeps signed-in users away from the login and register pages.
pub fn require_anonymous(session: &SessionStore) -> GuardOutcome {
    if session.is_authenticated() {
        GuardOutcome::Redirect(Route::Dashboard)
    } else {
        GuardOutcome::Allow
    }
}

impl Route {
    /// Parses a path such as `habits/edit/3` (leading `#` or `/` allowed).
    /// Empty and unknown paths map to the login page.
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_start_matches('#').trim_matches('/');
        let segments: Vec<&str> = path.split('/').collect();
        match segments.as_slice() {
            ["register"] => Route::Register,
            ["dashboard"] => Route::Dashboard,
            ["habits"] => Route::Habits,
            ["habits", "new"] => Route::NewHabit,
            ["habits", "edit", id] => match id.parse() {
                Ok(id) => Route::EditHabit(id),
                Err(_) => Route::Login,
            },
            ["calendar"] => Route::Calendar,
            ["stats"] => Route::Stats,
            ["excel-loader"] => Route::ExcelLoader,
            _ => Route::Login,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "login".to_string(),
            Route::Register => "register".to_string(),
            Route::Dashboard => "dashboard".to_string(),
            Route::Habits => "habits".to_string(),
            Route::NewHabit => "habits/new".to_string(),
            Route::EditHabit(id) => format!("habits/edit/{}", id),
            Route::Calendar => "calendar".to_string(),
            Route::Stats => "stats".to_string(),
            Route::ExcelLoader => "excel-loader".to_string(),
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    pub fn guard(&self, session: &SessionStore) -> GuardOutcome {
        if self.is_public() {
            require_anonymous(session)
        } else {
            require_authenticated(session)
        }
    }

    /// The route that should actually be shown when navigating here.
    pub fn resolve(self, session: &SessionStore) -> Route {
        match self.guard(session) {
            GuardOutcome::Allow => self,
            GuardOutcome::Redirect(target) => target,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}
