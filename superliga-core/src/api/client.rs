use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::api::types::{CompetitionsResponse, MatchDaysResponse, ScheduleResponse};
use crate::api::ScheduleSource;
use crate::competition::Competition;
use crate::config::League;
use crate::error::{SuperligaError, SuperligaResult};
use crate::plan::FetchWindow;

const ORIGIN: &str = "https://en.volleyballworld.com";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36";

/// Immutable request settings shared by every call.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Offset segment the match-days endpoint expects, e.g. `-04:00`.
    pub utc_offset: String,
    pub timeout: Duration,
    pub headers: HeaderMap,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "https://en.volleyballworld.com/api/v1/".to_string(),
            utc_offset: "-04:00".to_string(),
            timeout: Duration::from_secs(15),
            headers: default_headers(),
        }
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9,pt-BR;q=0.8,pt;q=0.7"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::ORIGIN, HeaderValue::from_static(ORIGIN));
    headers.insert(
        header::REFERER,
        HeaderValue::from_static("https://en.volleyballworld.com/"),
    );
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers
}

impl ApiConfig {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn competitions_url(&self, year: i32) -> String {
        self.url(&format!("globalschedule/competitions/{year}/"))
    }

    pub fn match_days_url(&self, tournament_id: &str, year: i32) -> String {
        self.url(&format!(
            "volley-tournament/matchdays/{year}/{}/{tournament_id}",
            self.utc_offset
        ))
    }

    pub fn schedule_url(&self, tournament_id: &str, window: FetchWindow) -> String {
        self.url(&format!(
            "volley-tournament/{}/{}/{tournament_id}",
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d")
        ))
    }
}

/// HTTP client for the Volleyball World schedule API.
pub struct VolleyballWorldClient<S = TokioSleeper> {
    http: reqwest::Client,
    config: ApiConfig,
    retry: RetryPolicy,
    sleeper: S,
}

impl VolleyballWorldClient {
    pub fn new(config: ApiConfig, retry: RetryPolicy) -> SuperligaResult<Self> {
        Self::with_sleeper(config, retry, TokioSleeper)
    }
}

impl<S: Sleeper> VolleyballWorldClient<S> {
    pub fn with_sleeper(config: ApiConfig, retry: RetryPolicy, sleeper: S) -> SuperligaResult<Self> {
        let http = reqwest::Client::builder()
            .default_headers(config.headers.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| SuperligaError::Api(e.to_string()))?;

        Ok(VolleyballWorldClient {
            http,
            config,
            retry,
            sleeper,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SuperligaResult<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SuperligaError::Api(e.to_string()))?
            .error_for_status()
            .map_err(|e| SuperligaError::Api(e.to_string()))?;

        response
            .json::<T>()
            .await
            .map_err(|e| SuperligaError::Api(format!("Invalid response body: {e}")))
    }

    async fn fetch_with_retries<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        debug!("GET {}", url);
        self.retry.run(&self.sleeper, || self.get_json::<T>(url)).await
    }

    /// Discover the tracked leagues' competitions from the listing for `year`.
    pub async fn competitions(&self, year: i32, leagues: &[League]) -> Vec<Competition> {
        let url = self.config.competitions_url(year);
        let Some(response) = self.fetch_with_retries::<CompetitionsResponse>(&url).await else {
            warn!("Could not fetch competitions listing for {}", year);
            return Vec::new();
        };

        Competition::from_listing(&response.competitions, leagues)
    }
}

impl<S: Sleeper> ScheduleSource for VolleyballWorldClient<S> {
    async fn match_days(&self, tournament_id: &str, year: i32) -> Vec<NaiveDate> {
        let url = self.config.match_days_url(tournament_id, year);
        let Some(response) = self.fetch_with_retries::<MatchDaysResponse>(&url).await else {
            return Vec::new();
        };

        parse_match_days(&response.match_days)
    }

    async fn schedule(&self, tournament_id: &str, window: FetchWindow) -> Option<ScheduleResponse> {
        let url = self.config.schedule_url(tournament_id, window);
        self.fetch_with_retries(&url).await
    }
}

/// Parse `YYYY-MM-DD` strings, dropping anything else.
pub(crate) fn parse_match_days(days: &[String]) -> Vec<NaiveDate> {
    days.iter()
        .filter_map(|day| match NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                warn!("Ignoring malformed match day '{}'", day);
                None
            }
        })
        .collect()
}
