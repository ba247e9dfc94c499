use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelSource {
    None,
    Primary,
    Fallback,
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::None => write!(f, "none"),
            ModelSource::Primary => write!(f, "primary"),
            ModelSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Load state of the session's detection model.
///
/// Only the model loader mutates it, and only once: after `mark_loaded`
/// the state is frozen for the rest of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelState {
    loaded: bool,
    source: ModelSource,
}

impl ModelState {
    pub fn new() -> Self {
        Self {
            loaded: false,
            source: ModelSource::None,
        }
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Which location the model came from. Diagnostic only.
    pub fn source(&self) -> ModelSource {
        self.source
    }

    pub(crate) fn mark_loaded(&mut self, source: ModelSource) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        self.source = source;
    }
}

impl Default for ModelState {
    fn default() -> Self {
        Self::new()
    }
}
