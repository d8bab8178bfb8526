//! Screen navigation.
//!
//! Only "replace current screen" is supported: moving to the practice screen
//! and going back for another word both swap the current route, so there is
//! never anything to go back to.

use tracing::debug;

use super::entry::Word;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Word input
    Entry,
    /// Practicing the given word
    Practice { word: Word },
}

#[derive(Debug)]
pub struct Router {
    current: Route,
}

impl Router {
    /// Start on the entry screen.
    pub fn new() -> Self {
        Self { current: Route::Entry }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Replace the current screen, returning the one that was shown.
    pub fn replace(&mut self, route: Route) -> Route {
        debug!("Navigating {:?} -> {:?}", self.current, route);
        std::mem::replace(&mut self.current, route)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice::validate_word;

    #[test]
    fn test_replace_swaps_route() {
        let mut router = Router::new();
        assert_eq!(router.current(), &Route::Entry);

        let word = validate_word("kit").unwrap();
        let previous = router.replace(Route::Practice { word: word.clone() });
        assert_eq!(previous, Route::Entry);
        assert_eq!(router.current(), &Route::Practice { word });

        router.replace(Route::Entry);
        assert_eq!(router.current(), &Route::Entry);
    }
}
