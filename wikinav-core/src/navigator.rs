use crate::resolver::NavigationTarget;

/// Receiver of navigation effects. In a browser this is the window
/// location; here it is whatever hosts the overlay.
pub trait Navigator {
    fn navigate(&mut self, target: &NavigationTarget);
}

impl<F> Navigator for F
where
    F: FnMut(&NavigationTarget),
{
    fn navigate(&mut self, target: &NavigationTarget) {
        self(target)
    }
}

/// Navigator that records where it was sent, like a browser location bar.
#[derive(Debug, Clone, Default)]
pub struct Location {
    href: Option<String>,
    history: Vec<String>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            history: Vec::new(),
        }
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// Previously visited locations, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Navigator for Location {
    fn navigate(&mut self, target: &NavigationTarget) {
        if let Some(previous) = self.href.replace(target.to_string()) {
            self.history.push(previous);
        }
    }
}
