//! OpenWeatherMap current-weather client. One fetch per call: no retry, no
//! cache; the caller decides what to show when this fails.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::weather::WeatherSnapshot;

const API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("weather service returned status {0}")]
    Status(StatusCode),

    #[error("weather payload has no condition block")]
    MissingCondition,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    name: String,
    weather: Vec<ConditionDto>,
    main: ReadingsDto,
}

#[derive(Debug, Deserialize)]
struct ConditionDto {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ReadingsDto {
    temp: f64,
}

pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, api_key })
    }

    pub async fn fetch_current(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!(
            "{API_URL}?lat={lat}&lon={lon}&appid={}&units=metric",
            self.api_key
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status()));
        }

        let body: CurrentWeatherResponse = response.json().await?;
        snapshot_from_response(body)
    }
}

fn snapshot_from_response(body: CurrentWeatherResponse) -> Result<WeatherSnapshot, WeatherError> {
    let condition = body
        .weather
        .into_iter()
        .next()
        .ok_or(WeatherError::MissingCondition)?;

    Ok(WeatherSnapshot {
        location_name: body.name,
        condition_main: condition.main,
        description: condition.description,
        temperature_c: body.main.temp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_current_weather_payload() {
        let payload = serde_json::json!({
            "name": "Lagos",
            "weather": [{"main": "Rain", "description": "light rain"}],
            "main": {"temp": 27.3, "feels_like": 29.1, "humidity": 84},
            "wind": {"speed": 3.4, "deg": 220},
            "visibility": 10000
        });

        let response: CurrentWeatherResponse = serde_json::from_value(payload).unwrap();
        let snapshot = snapshot_from_response(response).unwrap();

        assert_eq!(snapshot.location_name, "Lagos");
        assert_eq!(snapshot.condition_main, "Rain");
        assert_eq!(snapshot.description, "light rain");
        assert_eq!(snapshot.temperature_c, 27.3);
    }

    #[test]
    fn empty_condition_block_is_an_error() {
        let payload = serde_json::json!({
            "name": "Lagos",
            "weather": [],
            "main": {"temp": 27.3}
        });

        let response: CurrentWeatherResponse = serde_json::from_value(payload).unwrap();
        let error = snapshot_from_response(response).unwrap_err();
        assert!(matches!(error, WeatherError::MissingCondition));
    }
}
