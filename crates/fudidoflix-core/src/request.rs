use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Screen a request belongs to. Starting a new request for a view
/// supersedes whatever that view was waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    Browse,
    Search,
    Details,
    Player,
    Episodes,
    Sorte,
    MyList,
}

/// Ticket handed out when a request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestToken {
    view: View,
    generation: u64,
}

impl RequestToken {
    pub fn view(&self) -> View {
        self.view
    }
}

/// Per-view generation counters.
///
/// Requests are never aborted mid-flight; a completion whose token is no
/// longer the latest for its view is simply dropped.
#[derive(Debug, Default)]
pub struct RequestScope {
    generations: Mutex<HashMap<View, u64>>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_generations<T>(&self, f: impl FnOnce(&mut HashMap<View, u64>) -> T) -> T {
        let mut guard = self
            .generations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// Start a request for `view`, invalidating earlier tokens of that view.
    pub fn begin(&self, view: View) -> RequestToken {
        let generation = self.with_generations(|generations| {
            let counter = generations.entry(view).or_insert(0);
            *counter += 1;
            *counter
        });
        RequestToken { view, generation }
    }

    /// Invalidate every outstanding token of `view`.
    pub fn cancel(&self, view: View) {
        self.begin(view);
    }

    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.with_generations(|generations| generations.get(&token.view) == Some(&token.generation))
    }

    /// Pass `value` through only if `token` is still current.
    pub fn accept<T>(&self, token: &RequestToken, value: T) -> Option<T> {
        if self.is_current(token) {
            Some(value)
        } else {
            debug!(view = ?token.view, generation = token.generation, "Discarding superseded result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_request_supersedes_older() {
        let scope = RequestScope::new();
        let first = scope.begin(View::Details);
        let second = scope.begin(View::Details);

        assert!(!scope.is_current(&first));
        assert_eq!(scope.accept(&first, "old"), None);
        assert_eq!(scope.accept(&second, "new"), Some("new"));
    }

    #[test]
    fn test_views_are_independent() {
        let scope = RequestScope::new();
        let details = scope.begin(View::Details);
        let _search = scope.begin(View::Search);
        assert!(scope.is_current(&details));

        scope.cancel(View::Details);
        assert!(!scope.is_current(&details));
    }
}
