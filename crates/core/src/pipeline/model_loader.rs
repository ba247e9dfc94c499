use std::cell::Cell;
use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::detection::domain::face_detector::{DetectorFactory, FaceDetector};
use crate::model::domain::model_fetcher::ModelFetcher;
use crate::model::domain::model_state::{ModelSource, ModelState};
use crate::shared::config::ModelLocations;
use crate::shared::notifier::Notifier;

/// Percentage reported once a load attempt has started.
pub const PROGRESS_STARTED: u8 = 25;
pub const PROGRESS_DONE: u8 = 100;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load face detection models";

/// Acquires the session's detection model: primary location first, one
/// fallback attempt, then gives up and notifies.
pub struct ModelLoader {
    locations: ModelLocations,
    fetcher: Box<dyn ModelFetcher>,
    factory: Box<dyn DetectorFactory>,
    notifier: Arc<dyn Notifier>,
    state: ModelState,
    detector: Option<Box<dyn FaceDetector>>,
}

impl ModelLoader {
    pub fn new(
        locations: ModelLocations,
        fetcher: Box<dyn ModelFetcher>,
        factory: Box<dyn DetectorFactory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            locations,
            fetcher,
            factory,
            notifier,
            state: ModelState::new(),
            detector: None,
        }
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    /// Loads the model if it is not loaded yet.
    ///
    /// Percentages sent on `progress` never decrease and end with 100 on
    /// success. Returns `false` when both locations fail; the failure is
    /// reported through the notifier, once per call.
    pub fn load(&mut self, progress: Option<&Sender<u8>>) -> bool {
        if self.state.loaded() {
            return true;
        }

        let reporter = ProgressReporter::new(progress);
        reporter.report(PROGRESS_STARTED);

        let attempts = [
            (ModelSource::Primary, self.locations.primary.clone()),
            (ModelSource::Fallback, self.locations.fallback.clone()),
        ];
        for (source, location) in attempts {
            match self.try_load(&location, &reporter) {
                Ok(detector) => {
                    self.state.mark_loaded(source);
                    self.detector = Some(detector);
                    reporter.report(PROGRESS_DONE);
                    log::info!("Loaded face model from {source} location {location}");
                    return true;
                }
                Err(e) => {
                    log::warn!("Failed to load face model from {source} location {location}: {e}");
                }
            }
        }

        self.notifier.error(LOAD_FAILED_MESSAGE);
        false
    }

    /// Hands over the detector built by the last successful load.
    pub fn take_detector(&mut self) -> Option<Box<dyn FaceDetector>> {
        self.detector.take()
    }

    fn try_load(
        &self,
        location: &str,
        reporter: &ProgressReporter<'_>,
    ) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
        let bytes = self
            .fetcher
            .fetch(location, &|done: u64, total: u64| reporter.bytes(done, total))?;
        self.factory.build(&bytes)
    }
}

/// Maps byte progress into the 25..=99 band and drops anything that would
/// move backwards (e.g. when the fallback restarts a download).
struct ProgressReporter<'a> {
    sender: Option<&'a Sender<u8>>,
    last: Cell<u8>,
}

impl<'a> ProgressReporter<'a> {
    fn new(sender: Option<&'a Sender<u8>>) -> Self {
        Self {
            sender,
            last: Cell::new(0),
        }
    }

    fn report(&self, percent: u8) {
        let percent = percent.min(PROGRESS_DONE);
        if percent <= self.last.get() {
            return;
        }
        self.last.set(percent);
        if let Some(tx) = self.sender {
            // A dropped receiver just means nobody is watching.
            let _ = tx.send(percent);
        }
    }

    fn bytes(&self, done: u64, total: u64) {
        if total == 0 {
            return;
        }
        let span = (PROGRESS_DONE - 1 - PROGRESS_STARTED) as u64;
        let fraction = done.min(total) * span / total;
        self.report(PROGRESS_STARTED + fraction as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection::RawDetection;
    use crate::detection::domain::detector_options::DetectorOptions;
    use crate::model::domain::model_fetcher::{ByteProgress, ModelFetchError};
    use crate::shared::frame::Frame;
    use crate::shared::notifier::{CollectingNotifier, Severity};
    use std::sync::Mutex;

    const PRIMARY: &str = "/opt/models";
    const FALLBACK: &str = "https://models.example.com/";
    const GOOD_MODEL: &[u8] = b"good";
    const BAD_MODEL: &[u8] = b"bad";

    /// Serves fixed bytes per location and records every call.
    #[derive(Clone)]
    struct ScriptedFetcher {
        primary: Option<&'static [u8]>,
        fallback: Option<&'static [u8]>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedFetcher {
        fn new(primary: Option<&'static [u8]>, fallback: Option<&'static [u8]>) -> Self {
            Self {
                primary,
                fallback,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ModelFetcher for ScriptedFetcher {
        fn fetch(
            &self,
            location: &str,
            progress: ByteProgress<'_>,
        ) -> Result<Vec<u8>, ModelFetchError> {
            self.calls.lock().unwrap().push(location.to_string());
            let bytes = if location == PRIMARY {
                self.primary
            } else {
                self.fallback
            };
            match bytes {
                Some(b) => {
                    progress(b.len() as u64 / 2, b.len() as u64);
                    progress(b.len() as u64, b.len() as u64);
                    Ok(b.to_vec())
                }
                None => {
                    // Partway through before the failure.
                    progress(50, 100);
                    Err(ModelFetchError::Malformed {
                        location: location.to_string(),
                        reason: "scripted failure".to_string(),
                    })
                }
            }
        }
    }

    struct NullDetector;

    impl FaceDetector for NullDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
            _options: &DetectorOptions,
        ) -> Result<Vec<RawDetection>, Box<dyn std::error::Error>> {
            Ok(Vec::new())
        }
    }

    /// Accepts everything except `BAD_MODEL`.
    struct PickyFactory;

    impl DetectorFactory for PickyFactory {
        fn build(
            &self,
            model: &[u8],
        ) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
            if model == BAD_MODEL {
                return Err("unsupported model".into());
            }
            Ok(Box::new(NullDetector))
        }
    }

    fn loader(fetcher: &ScriptedFetcher, notifier: Arc<CollectingNotifier>) -> ModelLoader {
        ModelLoader::new(
            ModelLocations {
                primary: PRIMARY.to_string(),
                fallback: FALLBACK.to_string(),
            },
            Box::new(fetcher.clone()),
            Box::new(PickyFactory),
            notifier,
        )
    }

    #[test]
    fn test_primary_success_skips_fallback() {
        let fetcher = ScriptedFetcher::new(Some(GOOD_MODEL), Some(GOOD_MODEL));
        let mut loader = loader(&fetcher, Arc::new(CollectingNotifier::new()));

        assert!(loader.load(None));
        assert_eq!(fetcher.calls(), vec![PRIMARY]);
        assert!(loader.state().loaded());
        assert_eq!(loader.state().source(), ModelSource::Primary);
    }

    #[test]
    fn test_load_is_idempotent() {
        let fetcher = ScriptedFetcher::new(Some(GOOD_MODEL), None);
        let mut loader = loader(&fetcher, Arc::new(CollectingNotifier::new()));

        assert!(loader.load(None));
        assert!(loader.load(None));
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[test]
    fn test_falls_back_exactly_once() {
        let fetcher = ScriptedFetcher::new(None, Some(GOOD_MODEL));
        let notifier = Arc::new(CollectingNotifier::new());
        let mut loader = loader(&fetcher, notifier.clone());

        assert!(loader.load(None));
        assert_eq!(fetcher.calls(), vec![PRIMARY, FALLBACK]);
        assert_eq!(loader.state().source(), ModelSource::Fallback);
        assert!(notifier.entries().is_empty());
    }

    #[test]
    fn test_rejected_primary_model_falls_back() {
        let fetcher = ScriptedFetcher::new(Some(BAD_MODEL), Some(GOOD_MODEL));
        let mut loader = loader(&fetcher, Arc::new(CollectingNotifier::new()));

        assert!(loader.load(None));
        assert_eq!(loader.state().source(), ModelSource::Fallback);
    }

    #[test]
    fn test_total_failure_notifies_once_per_call() {
        let fetcher = ScriptedFetcher::new(None, Some(BAD_MODEL));
        let notifier = Arc::new(CollectingNotifier::new());
        let mut loader = loader(&fetcher, notifier.clone());

        assert!(!loader.load(None));
        assert_eq!(notifier.count(Severity::Error), 1);
        assert_eq!(notifier.entries()[0].1, LOAD_FAILED_MESSAGE);
        assert!(!loader.state().loaded());
        assert_eq!(loader.state().source(), ModelSource::None);
        assert!(loader.take_detector().is_none());

        assert!(!loader.load(None));
        assert_eq!(notifier.count(Severity::Error), 2);
        assert_eq!(fetcher.calls().len(), 4);
    }

    #[test]
    fn test_progress_is_monotonic_and_ends_at_100() {
        let fetcher = ScriptedFetcher::new(None, Some(GOOD_MODEL));
        let mut loader = loader(&fetcher, Arc::new(CollectingNotifier::new()));
        let (tx, rx) = crossbeam_channel::unbounded();

        assert!(loader.load(Some(&tx)));
        drop(tx);
        let values: Vec<u8> = rx.iter().collect();

        // Primary got halfway (62%) before failing; the fallback's own
        // halfway mark must not be reported again.
        assert_eq!(values.first(), Some(&PROGRESS_STARTED));
        assert_eq!(values.last(), Some(&PROGRESS_DONE));
        assert_eq!(values.iter().filter(|&&v| v == 62).count(), 1, "{values:?}");
        assert!(values.windows(2).all(|w| w[0] < w[1]), "{values:?}");
    }

    #[test]
    fn test_bogus_content_length_fails_load_without_panicking() {
        use crate::model::infrastructure::model_resolver::ResolvingFetcher;
        use crate::test_support::{unreachable_url, StubServer};

        let server = StubServer::raw(
            b"HTTP/1.1 200 OK\r\nContent-Length: 18446744073709551000\r\nConnection: close\r\n\r\n\x08\x01",
        );
        let notifier = Arc::new(CollectingNotifier::new());
        let mut loader = ModelLoader::new(
            ModelLocations {
                primary: format!("{}/m.onnx", server.base_url()),
                fallback: unreachable_url(),
            },
            Box::new(ResolvingFetcher),
            Box::new(PickyFactory),
            notifier.clone(),
        );

        assert!(!loader.load(None));
        assert!(!loader.state().loaded());
        assert_eq!(notifier.count(Severity::Error), 1);
    }

    #[test]
    fn test_progress_survives_dropped_receiver() {
        let fetcher = ScriptedFetcher::new(Some(GOOD_MODEL), None);
        let mut loader = loader(&fetcher, Arc::new(CollectingNotifier::new()));
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);

        assert!(loader.load(Some(&tx)));
    }

    #[test]
    fn test_take_detector_hands_over_once() {
        let fetcher = ScriptedFetcher::new(Some(GOOD_MODEL), None);
        let mut loader = loader(&fetcher, Arc::new(CollectingNotifier::new()));
        assert!(loader.load(None));

        assert!(loader.take_detector().is_some());
        assert!(loader.take_detector().is_none());
        assert!(loader.load(None));
    }
}
