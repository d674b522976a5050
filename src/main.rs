mod appsettings;
mod notification;
mod openweather;
mod reminder;
mod scheduling;
mod weather;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;

use crate::notification::ConsoleNotificationSink;
use crate::openweather::OpenWeatherClient;
use crate::reminder::ReminderTime;
use crate::scheduling::ReminderScheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = appsettings::get()?;

    // Optional overrides: an "HH:MM" argument replaces the configured time,
    // "--now" additionally sends one notification immediately.
    let args: Vec<String> = std::env::args().skip(1).collect();
    let trigger_immediately = args.iter().any(|arg| arg == "--now");
    let time_input = args
        .iter()
        .find(|arg| *arg != "--now")
        .map(String::as_str)
        .unwrap_or(settings.reminder.time.as_str());
    let reminder_time: ReminderTime = time_input
        .parse()
        .with_context(|| format!("Invalid reminder time {time_input:?}, expected HH:MM"))?;

    let client = OpenWeatherClient::new(settings.weather.api_key.clone())?;
    let snapshot = client
        .fetch_current(settings.weather.latitude, settings.weather.longitude)
        .await
        .context("Could not fetch current weather")?;

    log::info!(
        "Current weather. [location = {}, condition = {}, temp = {:.1}°C]",
        snapshot.location_name,
        snapshot.condition_main,
        snapshot.temperature_c
    );
    println!("{}", weather::umbrella_message(&snapshot));

    let sink = Arc::new(ConsoleNotificationSink);
    let mut scheduler = ReminderScheduler::new(sink);
    let mut countdown = scheduler.countdown();

    scheduler.set_target(reminder_time, Some(snapshot)).await;
    println!("Daily reminder scheduled at {reminder_time}. Press Ctrl-C to quit.");

    if trigger_immediately {
        scheduler.trigger_now(None).await;
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = countdown.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(countdown) = *countdown.borrow_and_update() {
                    print!("\rNext notification in {countdown}        ");
                    let _ = std::io::stdout().flush();
                }
            }
        }
    }

    println!();
    scheduler.cancel().await;

    Ok(())
}
