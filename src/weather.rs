/// Current-weather observation for the user's location. Produced by the
/// OpenWeatherMap client, only ever read by the scheduler.
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub condition_main: String,
    pub description: String,
    pub temperature_c: f64,
}

/// True when the primary condition calls for an umbrella.
pub fn needs_umbrella(snapshot: &WeatherSnapshot) -> bool {
    let condition = snapshot.condition_main.to_lowercase();
    condition.contains("rain") || condition.contains("drizzle")
}

pub fn umbrella_message(snapshot: &WeatherSnapshot) -> String {
    if needs_umbrella(snapshot) {
        format!(
            "🌂 It's raining today in {}. Take your umbrella!",
            snapshot.location_name
        )
    } else {
        format!("☀️ No rain today in {}.", snapshot.location_name)
    }
}

#[cfg(test)]
pub(crate) fn snapshot_with_condition(location: &str, condition: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        location_name: location.to_owned(),
        condition_main: condition.to_owned(),
        description: condition.to_lowercase(),
        temperature_c: 21.0,
    }
}
