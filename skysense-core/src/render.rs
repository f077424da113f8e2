//! Plain-text views of the controller state.

use crate::{
    controller::Controller,
    model::{HistoryEntry, Unit, WeatherSnapshot},
};

const LOADING_TEXT: &str = "Syncing with atmospheric data...";
const WELCOME_TEXT: &str =
    "Welcome to SkySense AI. Enter a city to receive real-time weather and AI-powered insights.";

/// Round `value` to `1 / scale` steps; a result of negative zero becomes
/// positive zero so `-0.3` shows as `0`.
fn round_to(value: f64, scale: f64) -> f64 {
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Temperature in the display unit with one decimal, e.g. `57.2°F`.
pub fn format_temperature(celsius: f64, unit: Unit) -> String {
    format!("{:.1}{}", round_to(unit.convert(celsius), 10.0), unit.symbol())
}

/// Whole-degree temperature for compact lists.
fn format_rounded(celsius: f64, unit: Unit) -> String {
    format!("{:.0}{}", round_to(unit.convert(celsius), 1.0), unit.symbol())
}

pub fn render_weather(snapshot: &WeatherSnapshot, unit: Unit) -> String {
    let mut out = format!(
        "{}\n{}  {}\n",
        snapshot.city,
        format_temperature(snapshot.temperature, unit),
        snapshot.condition
    );

    if !snapshot.description.is_empty() {
        out.push_str(&format!("{}\n", snapshot.description));
    }
    out.push_str(&format!(
        "Feels like {}  |  H {}  L {}\n",
        format_temperature(snapshot.feels_like, unit),
        format_temperature(snapshot.high, unit),
        format_temperature(snapshot.low, unit),
    ));
    out.push_str(&format!(
        "Humidity {:.0}%  |  Wind {:.1} km/h\n",
        snapshot.humidity, snapshot.wind_speed
    ));
    out.push_str(&format!("Updated {}\n", snapshot.timestamp));

    if !snapshot.ai_insights.is_empty() {
        out.push_str(&format!("\nAI insights\n{}\n", snapshot.ai_insights));
    }

    if !snapshot.sources.is_empty() {
        out.push_str("\nSources\n");
        for (i, source) in snapshot.sources.iter().enumerate() {
            out.push_str(&format!("  [{}] {} <{}>\n", i + 1, source.title, source.uri));
        }
    }

    out
}

pub fn render_history(history: &[HistoryEntry], unit: Unit) -> String {
    if history.is_empty() {
        return "No recent searches.\n".to_string();
    }

    let mut out = String::from("Recent searches\n");
    for (i, entry) in history.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {}  {}  {}\n",
            i + 1,
            entry.city,
            format_rounded(entry.temperature, unit),
            entry.condition
        ));
    }

    out
}

/// Everything the user should currently see, in page order.
pub fn render_view(controller: &Controller) -> String {
    let mut out = String::new();

    if let Some(error) = controller.error() {
        out.push_str(&format!("! {error}\n\n"));
    }

    match controller.weather() {
        Some(snapshot) => {
            if controller.is_loading() {
                out.push_str(&format!("{LOADING_TEXT}\n\n"));
            }
            out.push_str(&format!(
                "[{}]\n{}\n",
                controller.theme(),
                render_weather(snapshot, controller.unit())
            ));
            out.push_str(&render_history(controller.history(), controller.unit()));
        }
        None if controller.is_loading() => {
            out.push_str(&format!("{LOADING_TEXT}\n"));
        }
        None if controller.error().is_none() => {
            out.push_str(&format!("{WELCOME_TEXT}\n"));
        }
        None => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        controller::tests::snapshot,
        gateway::{GatewayError, WeatherGateway},
        history::HistoryStore,
        model::Source,
        storage::MemoryStore,
    };
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl WeatherGateway for Unreachable {
        async fn fetch_weather(&self, _city: &str) -> Result<WeatherSnapshot, GatewayError> {
            Err(GatewayError::NotFoundOrUnavailable("offline".into()))
        }
    }

    fn controller() -> Controller {
        Controller::new(
            Box::new(Unreachable),
            HistoryStore::new(Box::new(MemoryStore::new())),
            "London",
        )
    }

    #[test]
    fn temperatures_convert_only_for_display() {
        let snap = snapshot("Boston", 10.0, "Clear");

        let text = render_weather(&snap, Unit::Fahrenheit);
        assert!(text.contains("50.0°F"));
        assert!(text.contains("Feels like 48.2°F"));
        assert_eq!(snap.temperature, 10.0);

        let text = render_weather(&snap, Unit::Celsius);
        assert!(text.contains("10.0°C"));
        assert!(text.contains("H 13.0°C  L 6.0°C"));
    }

    #[test]
    fn sources_are_numbered() {
        let mut snap = snapshot("Rome", 24.0, "Sunny");
        snap.sources = vec![
            Source {
                title: "Meteo".into(),
                uri: "https://meteo.example".into(),
            },
            Source {
                title: "News".into(),
                uri: "https://news.example".into(),
            },
        ];

        let text = render_weather(&snap, Unit::Celsius);
        assert!(text.contains("[1] Meteo <https://meteo.example>"));
        assert!(text.contains("[2] News <https://news.example>"));
    }

    #[test]
    fn history_lists_in_stored_order() {
        let history = vec![
            HistoryEntry {
                city: "Oslo".into(),
                temperature: -1.6,
                condition: "Snow".into(),
            },
            HistoryEntry {
                city: "Rome".into(),
                temperature: 24.0,
                condition: "Sunny".into(),
            },
        ];

        let text = render_history(&history, Unit::Fahrenheit);
        let oslo = text.find("1. Oslo  29°F  Snow").unwrap();
        let rome = text.find("2. Rome  75°F  Sunny").unwrap();
        assert!(oslo < rome);

        assert_eq!(render_history(&[], Unit::Celsius), "No recent searches.\n");
    }

    #[test]
    fn values_just_below_zero_show_as_zero() {
        assert_eq!(format_temperature(-0.04, Unit::Celsius), "0.0°C");
        assert_eq!(format_temperature(-0.06, Unit::Celsius), "-0.1°C");
        assert_eq!(format_temperature(-17.8, Unit::Fahrenheit), "0.0°F");

        let history = vec![HistoryEntry {
            city: "Oslo".into(),
            temperature: -0.3,
            condition: "Snow".into(),
        }];
        assert_eq!(
            render_history(&history, Unit::Celsius),
            "Recent searches\n  1. Oslo  0°C  Snow\n"
        );
    }

    #[test]
    fn idle_view_shows_welcome() {
        let ctl = controller();
        assert!(render_view(&ctl).contains("Welcome to SkySense AI"));
    }

    #[test]
    fn loading_without_data_shows_loading() {
        let mut ctl = controller();
        ctl.begin_search("Paris").unwrap();
        assert_eq!(render_view(&ctl).trim(), LOADING_TEXT);
    }

    #[tokio::test]
    async fn error_banner_keeps_previous_card() {
        let mut ctl = controller();
        let pending = ctl.begin_search("Lima").unwrap();
        ctl.complete_search(pending, Ok(snapshot("Lima", 19.0, "Cloudy")));
        ctl.search("Nowhere").await;

        let text = render_view(&ctl);
        assert!(text.starts_with("! We couldn't find that city"));
        assert!(text.contains("[cloudy]"));
        assert!(text.contains("Lima"));
        assert!(text.contains("1. Lima"));
    }

    #[tokio::test]
    async fn error_without_data_shows_only_banner() {
        let mut ctl = controller();
        ctl.search("Nowhere").await;

        let text = render_view(&ctl);
        assert!(text.starts_with("! "));
        assert!(!text.contains("Welcome"));
    }
}
