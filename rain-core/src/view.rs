//! Four-state view model for front ends.
//!
//! [`reduce`] is the whole state machine; [`Session`] owns the current state,
//! feeds pipeline callbacks through the reducer and hands every new state to
//! a [`ViewRenderer`].

use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};
use tracing::debug;

use crate::{
    error::RequestError,
    model::Verdict,
    pipeline::{PipelineObserver, RainPipeline},
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Input,
    Loading,
    Answer(Verdict),
    Error(RequestError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Dispatched,
    Succeeded(Verdict),
    Failed(RequestError),
    Reset,
}

pub fn reduce(state: ViewState, event: ViewEvent) -> ViewState {
    match (state, event) {
        (ViewState::Loading, ViewEvent::Reset) => ViewState::Loading,
        (_, ViewEvent::Reset) => ViewState::Input,
        (_, ViewEvent::Dispatched) => ViewState::Loading,
        (ViewState::Loading, ViewEvent::Succeeded(verdict)) => ViewState::Answer(verdict),
        (ViewState::Input | ViewState::Loading, ViewEvent::Failed(err)) => ViewState::Error(err),
        // late result for a check nobody is waiting on
        (state, _) => state,
    }
}

pub trait ViewRenderer: Send + Sync {
    fn render(&self, state: &ViewState);
}

/// One front-end session: at most one rain check in flight at a time.
pub struct Session<R: ViewRenderer> {
    pipeline: RainPipeline,
    renderer: R,
    state: Mutex<ViewState>,
    in_flight: AtomicBool,
}

impl<R: ViewRenderer> Session<R> {
    pub fn new(pipeline: RainPipeline, renderer: R) -> Self {
        Self {
            pipeline,
            renderer,
            state: Mutex::new(ViewState::Input),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ViewState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Show the initial input state.
    pub fn start(&self) {
        self.apply(ViewEvent::Reset);
    }

    /// Check the city typed by the user.
    ///
    /// Returns `None` without touching the network when the text is blank or
    /// another check is still running.
    pub async fn submit_city(&self, text: &str) -> Option<Result<Verdict, RequestError>> {
        let city = text.trim();
        if city.is_empty() {
            debug!("Ignoring blank city input");
            return None;
        }

        let _guard = self.begin()?;
        Some(self.pipeline.resolve_and_classify(city, self).await)
    }

    /// Check the host's current position. `None` if another check is running.
    pub async fn use_current_location(&self) -> Option<Result<Verdict, RequestError>> {
        let _guard = self.begin()?;
        Some(self.pipeline.classify_current_location(self).await)
    }

    /// Back to input after an answer or an error.
    pub fn reset(&self) {
        self.apply(ViewEvent::Reset);
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Rain check already in flight, ignoring trigger");
            return None;
        }
        Some(InFlight(&self.in_flight))
    }

    fn apply(&self, event: ViewEvent) {
        let next = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let next = reduce(std::mem::take(&mut *state), event);
            *state = next.clone();
            next
        };
        self.renderer.render(&next);
    }
}

impl<R: ViewRenderer> PipelineObserver for Session<R> {
    fn on_dispatch(&self) {
        self.apply(ViewEvent::Dispatched);
    }

    fn on_success(&self, verdict: &Verdict) {
        self.apply(ViewEvent::Succeeded(verdict.clone()));
    }

    fn on_failure(&self, error: &RequestError) {
        self.apply(ViewEvent::Failed(error.clone()));
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::Geolocator;
    use crate::model::{Coordinates, Location, WeatherObservation};
    use crate::provider::{LocationResolver, WeatherSource};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn verdict(is_raining: bool) -> Verdict {
        Verdict {
            is_raining,
            label: "Tokyo, JP".into(),
            precipitation: None,
            observed_at: None,
        }
    }

    #[test]
    fn happy_path_transitions() {
        let s = reduce(ViewState::Input, ViewEvent::Dispatched);
        assert_eq!(s, ViewState::Loading);

        let s = reduce(s, ViewEvent::Succeeded(verdict(true)));
        assert_eq!(s, ViewState::Answer(verdict(true)));

        let s = reduce(s, ViewEvent::Reset);
        assert_eq!(s, ViewState::Input);
    }

    #[test]
    fn failure_then_retry() {
        let s = reduce(ViewState::Loading, ViewEvent::Failed(RequestError::location_not_found()));
        assert_eq!(s, ViewState::Error(RequestError::location_not_found()));

        assert_eq!(reduce(s, ViewEvent::Reset), ViewState::Input);
    }

    #[test]
    fn failure_straight_from_input() {
        let err = RequestError::geolocation_unsupported();
        assert_eq!(reduce(ViewState::Input, ViewEvent::Failed(err.clone())), ViewState::Error(err));
    }

    #[test]
    fn reset_is_ignored_while_loading() {
        assert_eq!(reduce(ViewState::Loading, ViewEvent::Reset), ViewState::Loading);
    }

    #[test]
    fn stale_results_are_ignored() {
        let answer = ViewState::Answer(verdict(false));
        assert_eq!(reduce(ViewState::Input, ViewEvent::Succeeded(verdict(true))), ViewState::Input);
        assert_eq!(
            reduce(answer.clone(), ViewEvent::Failed(RequestError::network("late"))),
            answer
        );
    }

    #[derive(Default)]
    struct Frames(Mutex<Vec<ViewState>>);

    impl ViewRenderer for Frames {
        fn render(&self, state: &ViewState) {
            self.0.lock().unwrap().push(state.clone());
        }
    }

    /// Resolves any city to Tokyo's coordinates, optionally waiting on `gate` first.
    #[derive(Debug, Default)]
    struct GatedResolver {
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl LocationResolver for GatedResolver {
        async fn resolve(&self, city: &str) -> Result<Location, RequestError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(Location {
                latitude: 35.68,
                longitude: 139.69,
                display_name: city.to_string(),
                country_code: "JP".into(),
            })
        }
    }

    #[derive(Debug)]
    struct Drizzle;

    #[async_trait]
    impl WeatherSource for Drizzle {
        async fn current_weather(&self, _at: Coordinates) -> Result<WeatherObservation, RequestError> {
            Ok(WeatherObservation { weather_code: 51, observed_at: None })
        }
    }

    fn session(resolver: GatedResolver) -> Session<Frames> {
        let pipeline = RainPipeline::new(
            Box::new(resolver),
            Box::new(Drizzle),
            None::<Box<dyn Geolocator>>,
        );
        Session::new(pipeline, Frames::default())
    }

    #[tokio::test]
    async fn blank_input_is_a_noop() {
        let session = session(GatedResolver::default());

        assert!(session.submit_city("").await.is_none());
        assert!(session.submit_city("   \t\n").await.is_none());

        assert_eq!(session.state(), ViewState::Input);
        assert!(session.renderer().0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn submit_renders_loading_then_answer() {
        let session = session(GatedResolver::default());

        let verdict = session.submit_city("  Tokyo  ").await.unwrap().unwrap();

        assert!(verdict.is_raining);
        assert_eq!(verdict.label, "Tokyo, JP");
        let frames = session.renderer().0.lock().unwrap().clone();
        assert_eq!(frames, vec![ViewState::Loading, ViewState::Answer(verdict)]);

        session.reset();
        assert_eq!(session.state(), ViewState::Input);
    }

    #[tokio::test]
    async fn unsupported_location_goes_straight_to_error() {
        let session = session(GatedResolver::default());

        let err = session.use_current_location().await.unwrap().unwrap_err();

        assert_eq!(err, RequestError::geolocation_unsupported());
        let frames = session.renderer().0.lock().unwrap().clone();
        assert_eq!(frames, vec![ViewState::Error(err)]);
    }

    #[tokio::test]
    async fn second_trigger_while_in_flight_is_ignored() {
        let gate = Arc::new(Notify::new());
        let session = session(GatedResolver { gate: Some(gate.clone()) });

        let first = session.submit_city("Tokyo");
        let second = async {
            tokio::task::yield_now().await;
            let ignored = session.submit_city("Osaka").await;
            gate.notify_one();
            ignored
        };

        let (first, second) = tokio::join!(first, second);

        assert!(first.unwrap().is_ok());
        assert!(second.is_none());

        // guard released: a new check goes through
        gate.notify_one();
        assert!(session.submit_city("Kyoto").await.is_some());
    }
}
