use std::{sync::Arc, time::Duration};

use crate::{
    Config,
    catalog::CountryCatalog,
    error::{LookupError, PipelineError},
    model::{CountryDetails, WeatherForecast},
    provider::{CountrySource, ForecastSource, sources_from_config},
    render::{PageView, RenderOptions},
};

/// Everything produced by one successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub country: CountryDetails,
    pub forecast: WeatherForecast,
    pub page: PageView,
}

/// Load, resolve, fetch weather, render.
#[derive(Debug, Clone)]
pub struct Pipeline {
    catalog: CountryCatalog,
    countries: Arc<dyn CountrySource>,
    forecasts: Arc<dyn ForecastSource>,
    options: RenderOptions,
    dataset_wait: Duration,
}

impl Pipeline {
    pub fn new(
        countries: Arc<dyn CountrySource>,
        forecasts: Arc<dyn ForecastSource>,
        options: RenderOptions,
        dataset_wait: Duration,
    ) -> Self {
        Self {
            catalog: CountryCatalog::new(),
            countries,
            forecasts,
            options,
            dataset_wait,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, LookupError> {
        let (countries, forecasts) = sources_from_config(config)?;
        let options = RenderOptions {
            day_labels: config.day_labels,
            icons: config.icons.clone(),
        };

        Ok(Self::new(countries.into(), forecasts.into(), options, config.dataset_wait()))
    }

    pub fn catalog(&self) -> &CountryCatalog {
        &self.catalog
    }

    pub fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.options
    }

    /// Start loading the dataset in the background. Requires a tokio runtime.
    pub fn spawn_load(&self) -> tokio::task::JoinHandle<()> {
        let catalog = self.catalog.clone();
        let source = Arc::clone(&self.countries);
        tokio::spawn(async move { catalog.load_from(source.as_ref()).await })
    }

    /// Load the dataset in the current task.
    pub async fn load(&self) {
        self.catalog.load_from(self.countries.as_ref()).await;
    }

    /// Handle one submitted country name.
    ///
    /// Any failure is logged once here; callers only show
    /// [`PipelineError::user_message`].
    pub async fn submit(&self, input: &str) -> Result<Submission, PipelineError> {
        let result = self.run(input).await;
        if let Err(e) = &result {
            log::error!("Lookup for '{}' failed: {e}", input.trim());
        }
        result
    }

    async fn run(&self, input: &str) -> Result<Submission, PipelineError> {
        let query = input.trim().to_lowercase();
        if query.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let country = self.catalog.resolve(&query, self.dataset_wait).await?;
        log::debug!("Resolved '{query}' to {}", country.name);

        let (lat, lon) = country
            .coordinates()
            .ok_or_else(|| LookupError::MissingCoordinates(country.name.clone()))?;

        let forecast = self.forecasts.get_forecast(lat, lon).await?;

        let mut page = PageView::default();
        page.render_country(&country);
        page.render_weather(&forecast, &self.options);
        page.render_tip(&forecast);

        Ok(Submission {
            country,
            forecast,
            page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Coordinate, CountryRecord, Currency},
        tip::{TIP_FREEZING, TIP_LADDER},
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FakeCountries(Vec<CountryRecord>);

    #[async_trait]
    impl CountrySource for FakeCountries {
        async fn fetch_all(&self) -> Result<Vec<CountryRecord>, LookupError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Debug, Default)]
    struct FakeForecasts {
        calls: AtomicUsize,
        fail_with_status: Option<u16>,
    }

    #[async_trait]
    impl ForecastSource for FakeForecasts {
        async fn get_forecast(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<WeatherForecast, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.fail_with_status {
                return Err(LookupError::WeatherStatus {
                    status,
                    body: "upstream".into(),
                });
            }

            let start = NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date");
            let dates = (0..7).map(|i| start + chrono::Duration::days(i)).collect();
            WeatherForecast::new(
                dates,
                vec![22.0, 24.5, 19.0, 17.2, 21.0, 23.3, 25.0],
                vec![12.0, 13.5, 10.0, 9.1, 11.0, 12.7, 14.0],
                vec![0, 1, 2, 3, 61, 80, 95],
            )
        }
    }

    fn dataset() -> Vec<CountryRecord> {
        vec![
            CountryRecord {
                name: "France".into(),
                flag_url: "https://flagcdn.com/w320/fr.png".into(),
                latitude: Coordinate::Known(46.0),
                longitude: Coordinate::Known(2.0),
                currencies: vec![Currency {
                    code: "EUR".into(),
                    name: Some("Euro".into()),
                    symbol: Some("€".into()),
                }],
            },
            CountryRecord {
                name: "Nowhere".into(),
                flag_url: "N/A".into(),
                latitude: Coordinate::NotAvailable,
                longitude: Coordinate::NotAvailable,
                currencies: vec![],
            },
        ]
    }

    fn pipeline(forecasts: Arc<FakeForecasts>) -> Pipeline {
        Pipeline::new(
            Arc::new(FakeCountries(dataset())),
            forecasts,
            RenderOptions::default(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn france_end_to_end() {
        let forecasts = Arc::new(FakeForecasts::default());
        let pipeline = pipeline(forecasts.clone());
        pipeline.spawn_load();

        let submission = pipeline.submit("France").await.expect("France must succeed");

        assert_eq!(submission.country.name, "France");
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 1);

        let country = submission.page.country.as_ref().expect("country region");
        let html = country.to_html();
        assert!(html.contains("<h2>France</h2>"));
        assert!(html.contains("https://flagcdn.com/w320/fr.png"));

        let weather = submission.page.weather.as_ref().expect("weather region");
        let mut days = Vec::new();
        weather.find_by_class("weather-day", &mut days);
        assert_eq!(days.len(), 7);

        let tip = submission.page.tip.as_ref().expect("tip region").text_content();
        let all_tips = TIP_LADDER.iter().map(|(_, m)| *m).chain([TIP_FREEZING]);
        assert_eq!(all_tips.filter(|m| tip.contains(m)).count(), 1);
    }

    #[tokio::test]
    async fn lookup_ignores_case() {
        let forecasts = Arc::new(FakeForecasts::default());
        let pipeline = pipeline(forecasts.clone());
        pipeline.load().await;

        for input in ["France", "france", "FRANCE"] {
            let submission = pipeline.submit(input).await.expect("must resolve");
            assert_eq!(submission.country.name, "France");
        }
    }

    #[tokio::test]
    async fn unknown_country_issues_no_weather_fetch() {
        let forecasts = Arc::new(FakeForecasts::default());
        let pipeline = pipeline(forecasts.clone());
        pipeline.load().await;

        let err = pipeline.submit("Atlantis").await.unwrap_err();

        assert!(matches!(err, PipelineError::Lookup(LookupError::NotFound(_))));
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_coordinates_issue_no_weather_fetch() {
        let forecasts = Arc::new(FakeForecasts::default());
        let pipeline = pipeline(forecasts.clone());
        pipeline.load().await;

        let err = pipeline.submit("nowhere").await.unwrap_err();

        assert!(matches!(err, PipelineError::Lookup(LookupError::MissingCoordinates(_))));
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_input_is_rejected_before_lookup() {
        let pipeline = pipeline(Arc::new(FakeForecasts::default()));

        let err = pipeline.submit("   ").await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
        assert_eq!(err.user_message(), "Please enter a valid country.");
    }

    #[tokio::test]
    async fn weather_failure_is_terminal() {
        let forecasts = Arc::new(FakeForecasts {
            fail_with_status: Some(502),
            ..Default::default()
        });
        let pipeline = pipeline(forecasts.clone());
        pipeline.load().await;

        let err = pipeline.submit("France").await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Lookup(LookupError::WeatherStatus { status: 502, .. })
        ));
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 1);
        assert!(err.user_message().starts_with("Something went wrong"));
    }
}
