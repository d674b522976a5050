use std::sync::OnceLock;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct WeatherSettings {
    pub api_key: String,
    // One fixed location per session, the config-file analog of a one-shot
    // geolocation lookup.
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize, Debug)]
pub struct ReminderSettings {
    /// Daily notification time in 24-hour "HH:MM" form.
    pub time: String,
}

#[derive(Deserialize, Debug)]
pub struct AppSettings {
    pub weather: WeatherSettings,
    pub reminder: ReminderSettings,
}

impl AppSettings {
    fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("appsettings").required(true))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

pub fn get() -> anyhow::Result<&'static AppSettings> {
    static APPSETTINGS: OnceLock<AppSettings> = OnceLock::new();
    if APPSETTINGS.get().is_none() {
        let settings = AppSettings::new()?;
        let _ = APPSETTINGS.set(settings);
    }
    Ok(APPSETTINGS.get().expect("Settings were just initialized."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_layered_sources() {
        let settings: AppSettings = Config::builder()
            .add_source(config::File::from_str(
                r#"
                [weather]
                api_key = "test-key"
                latitude = 6.5244
                longitude = 3.3792

                [reminder]
                time = "08:30"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.weather.api_key, "test-key");
        assert_eq!(settings.reminder.time, "08:30");
    }
}
