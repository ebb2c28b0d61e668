//! Where a view goes next.

use core::fmt;

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Welcome,
    Movies,
    Profile,
    EditProfile,
}

impl Route {
    /// URL path of the screen in the web front-end.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Welcome => "/welcome",
            Self::Movies => "/movies",
            Self::Profile => "/profile",
            Self::EditProfile => "/profile/edit",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a view action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Re-render the current screen.
    Stay,
    /// Move to another screen.
    To(Route),
}

impl Navigation {
    /// Target route, if the action navigates away.
    #[must_use]
    pub const fn route(self) -> Option<Route> {
        match self {
            Self::Stay => None,
            Self::To(route) => Some(route),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Welcome.path(), "/welcome");
        assert_eq!(Route::EditProfile.to_string(), "/profile/edit");
    }

    #[test]
    fn test_navigation_route() {
        assert_eq!(Navigation::Stay.route(), None);
        assert_eq!(Navigation::To(Route::Movies).route(), Some(Route::Movies));
    }
}
