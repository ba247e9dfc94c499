use crate::detection::domain::detection::Detection;

/// Result of one detection call.
///
/// Misses (`NotLoaded`, `Failed`) read as an empty face list, so a polling
/// loop can treat every outcome uniformly while tests can still tell them
/// apart.
#[derive(Clone, Debug, PartialEq)]
pub enum DetectOutcome {
    Faces(Vec<Detection>),
    NotLoaded,
    Failed(String),
}

impl DetectOutcome {
    pub fn faces(&self) -> &[Detection] {
        match self {
            DetectOutcome::Faces(faces) => faces,
            DetectOutcome::NotLoaded | DetectOutcome::Failed(_) => &[],
        }
    }

    pub fn into_faces(self) -> Vec<Detection> {
        match self {
            DetectOutcome::Faces(faces) => faces,
            DetectOutcome::NotLoaded | DetectOutcome::Failed(_) => Vec::new(),
        }
    }

    pub fn is_miss(&self) -> bool {
        !matches!(self, DetectOutcome::Faces(_))
    }
}
