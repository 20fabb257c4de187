//! Front-end route table. Each route is a view of the application; the CLI
//! exposes one subcommand per route.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Register,
    Login,
    CreateTerrain,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Home,
        Route::Register,
        Route::Login,
        Route::CreateTerrain,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Register => "register",
            Route::Login => "login",
            Route::CreateTerrain => "create-terrain",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Register => "/register",
            Route::Login => "/login",
            Route::CreateTerrain => "/terrains/create",
        }
    }

    /// Resolve a path, ignoring any query string and a trailing slash.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|r| r.path() == path)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.path())
    }
}
