use tracing::{debug, info};

use crate::{
    classify::{Precipitation, classify},
    error::RequestError,
    geolocation::{Geolocator, locate},
    model::{CURRENT_LOCATION_LABEL, Coordinates, Verdict},
    provider::{LocationResolver, WeatherSource},
};

/// Receives loading-state transitions of a single rain check.
pub trait PipelineObserver: Send + Sync {
    fn on_dispatch(&self) {}
    fn on_success(&self, _verdict: &Verdict) {}
    fn on_failure(&self, _error: &RequestError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Resolve → fetch → classify, stopping at the first failure.
#[derive(Debug)]
pub struct RainPipeline {
    resolver: Box<dyn LocationResolver>,
    weather: Box<dyn WeatherSource>,
    geolocator: Option<Box<dyn Geolocator>>,
}

impl RainPipeline {
    pub fn new(
        resolver: Box<dyn LocationResolver>,
        weather: Box<dyn WeatherSource>,
        geolocator: Option<Box<dyn Geolocator>>,
    ) -> Self {
        Self { resolver, weather, geolocator }
    }

    /// By-city path. `city` is expected to be trimmed and non-empty.
    pub async fn resolve_and_classify(
        &self,
        city: &str,
        observer: &dyn PipelineObserver,
    ) -> Result<Verdict, RequestError> {
        observer.on_dispatch();

        let result = async {
            let location = self.resolver.resolve(city).await?;
            self.verdict_at(location.coordinates(), location.label()).await
        }
        .await;

        report(result, observer)
    }

    /// By-location path. Fails straight away, without a dispatch, when the
    /// host has no geolocation.
    pub async fn classify_current_location(
        &self,
        observer: &dyn PipelineObserver,
    ) -> Result<Verdict, RequestError> {
        let Some(geolocator) = self.geolocator.as_deref() else {
            let err = RequestError::geolocation_unsupported();
            debug!(error = %err, "No geolocation capability on this host");
            observer.on_failure(&err);
            return Err(err);
        };

        observer.on_dispatch();

        let result = async {
            let position = locate(geolocator).await?;
            self.verdict_at(position, CURRENT_LOCATION_LABEL.to_string()).await
        }
        .await;

        report(result, observer)
    }

    async fn verdict_at(&self, at: Coordinates, label: String) -> Result<Verdict, RequestError> {
        let observation = self.weather.current_weather(at).await?;
        let is_raining = classify(&observation);

        Ok(Verdict {
            is_raining,
            label,
            precipitation: Precipitation::from_wmo_code(observation.weather_code),
            observed_at: observation.observed_at,
        })
    }
}

fn report(
    result: Result<Verdict, RequestError>,
    observer: &dyn PipelineObserver,
) -> Result<Verdict, RequestError> {
    match &result {
        Ok(verdict) => {
            info!("{}: raining = {}", verdict.label, verdict.is_raining);
            observer.on_success(verdict);
        }
        Err(err) => {
            // expected outcome; the front end shows the message itself
            debug!(error = %err, "Rain check failed");
            observer.on_failure(err);
        }
    }
    result
}
