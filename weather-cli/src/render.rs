use chrono::Local;
use weather_core::{WeatherModel, WeatherResult};

/// Text for one display state. `None` is the "nothing searched yet" card.
pub fn render(state: Option<&WeatherResult>) -> String {
    match state {
        None => "Search for a city to see current conditions.".to_string(),
        Some(WeatherResult::Loading) => "Loading...".to_string(),
        Some(WeatherResult::Error(message)) => format!("Error: {message}"),
        Some(WeatherResult::Success(model)) => render_model(model),
    }
}

fn render_model(model: &WeatherModel) -> String {
    let current = &model.current;
    let mut lines = vec![
        model.location_label(),
        format!("  now            {} °C", current.temp_c),
        format!("  feels like     {} °C", current.feelslike_c),
        format!("  condition      {}", current.condition.text),
        format!("  precipitation  {} mm", current.precip_mm),
        format!("  humidity       {}%", current.humidity),
        format!("  wind           {} km/h {}", current.wind_kph, current.wind_dir),
        format!("  air pressure   {} mb", current.pressure_mb),
        format!("  icon           {}", current.condition.icon_url_large()),
    ];

    if let Some(localtime) = model.location.localtime.as_deref() {
        lines.push(format!("  local time     {localtime}"));
    }
    if let Some(at) = current.observed_at() {
        lines.push(format!("  updated        {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{Condition, Current, FETCH_FAILED, Location};

    fn model() -> WeatherModel {
        WeatherModel {
            location: Location {
                name: "Oslo".into(),
                region: None,
                country: Some("Norway".into()),
                localtime: None,
            },
            current: Current {
                temp_c: -3.5,
                feelslike_c: -8.0,
                precip_mm: 0.4,
                humidity: 86,
                wind_kph: 14.4,
                wind_dir: "NNE".into(),
                pressure_mb: 1002.0,
                condition: Condition {
                    text: "Light snow".into(),
                    icon: "//cdn.weatherapi.com/weather/64x64/day/326.png".into(),
                },
                last_updated_epoch: None,
            },
        }
    }

    #[test]
    fn renders_empty_loading_and_error_states() {
        assert!(render(None).contains("Search for a city"));
        assert_eq!(render(Some(&WeatherResult::Loading)), "Loading...");
        assert_eq!(
            render(Some(&WeatherResult::error(FETCH_FAILED))),
            "Error: Failed to fetch data"
        );
    }

    #[test]
    fn renders_every_reading_on_success() {
        let out = render(Some(&WeatherResult::Success(model())));

        assert!(out.starts_with("Oslo, Norway"));
        assert!(out.contains("-3.5 °C"));
        assert!(out.contains("-8 °C"));
        assert!(out.contains("Light snow"));
        assert!(out.contains("0.4 mm"));
        assert!(out.contains("86%"));
        assert!(out.contains("14.4 km/h NNE"));
        assert!(out.contains("1002 mb"));
        assert!(out.contains("https://cdn.weatherapi.com/weather/128x128/day/326.png"));
        assert!(!out.contains("updated"));
        assert!(!out.contains("local time"));
    }

    #[test]
    fn shows_region_and_local_time_when_known() {
        let mut m = model();
        m.location.region = Some("Oslo County".into());
        m.location.localtime = Some("2024-01-15 08:05".into());

        let out = render(Some(&WeatherResult::Success(m)));
        assert!(out.starts_with("Oslo, Oslo County, Norway"));
        assert!(out.contains("local time     2024-01-15 08:05"));
    }

    #[test]
    fn shows_update_time_when_known() {
        let mut m = model();
        m.current.last_updated_epoch = Some(1_714_569_300);

        let out = render(Some(&WeatherResult::Success(m)));
        assert!(out.contains("updated"));
    }
}
