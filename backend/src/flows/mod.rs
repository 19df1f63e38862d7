//! The two screens as plain state machines. Handlers feed them the resolved
//! session and the injected backend, then render whatever state comes out.

pub mod auth;
pub mod today;

/// The only navigation targets the app has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Today,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Today => "/today",
        }
    }
}
