//! Pure rendering of lookup results into the three page regions.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{
    config::IconPaths,
    model::{CountryDetails, WeatherForecast},
    tip::{TempBand, travel_tip},
    view::Node,
    weather_code,
};

pub const COUNTRY_REGION_ID: &str = "countryInfo";
pub const WEATHER_REGION_ID: &str = "weatherInfo";
pub const TIP_REGION_ID: &str = "travelTip";

/// How grid cells are labelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayLabels {
    /// Weekday name of `dates[0] + index`.
    #[default]
    Weekday,
    /// "Day 1", "Day 2", ...
    Ordinal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub day_labels: DayLabels,
    pub icons: IconPaths,
}

/// The three output regions. Each render call replaces its region entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    pub country: Option<Node>,
    pub weather: Option<Node>,
    pub tip: Option<Node>,
}

impl PageView {
    pub fn render_country(&mut self, details: &CountryDetails) {
        self.country = Some(country_block(details));
    }

    pub fn render_weather(&mut self, forecast: &WeatherForecast, options: &RenderOptions) {
        self.weather = Some(weather_grid(forecast, options));
    }

    pub fn render_tip(&mut self, forecast: &WeatherForecast) {
        self.tip = Some(tip_block(forecast));
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Regions paired with their element ids, in page order.
    pub fn regions(&self) -> impl Iterator<Item = (&'static str, &Node)> {
        [
            (COUNTRY_REGION_ID, self.country.as_ref()),
            (WEATHER_REGION_ID, self.weather.as_ref()),
            (TIP_REGION_ID, self.tip.as_ref()),
        ]
        .into_iter()
        .filter_map(|(id, node)| node.map(|n| (id, n)))
    }

    pub fn to_html(&self) -> String {
        self.regions()
            .map(|(id, node)| format!("<div id=\"{id}\">{}</div>", node.to_html()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_text(&self) -> String {
        self.regions().map(|(_, node)| node.to_text()).collect::<Vec<_>>().join("\n")
    }
}

/// Name heading, flag image and currency line.
pub fn country_block(details: &CountryDetails) -> Node {
    let mut section = Node::element("section")
        .class("country-info")
        .child(Node::with_text("h2", details.name.as_str()))
        .child(
            Node::element("img")
                .class("country-flag")
                .attr("src", details.flag.as_str())
                .attr("alt", format!("Flag of {}", details.name)),
        );

    if !details.currencies.is_empty() {
        let list = details
            .currencies
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        section = section
            .child(Node::with_text("p", format!("Currencies: {list}")).class("currencies"));
    }

    section
}

pub fn day_label(forecast: &WeatherForecast, index: usize, labels: DayLabels) -> String {
    match (labels, forecast.dates().first()) {
        (DayLabels::Weekday, Some(first)) => {
            let day = *first + Duration::days(index as i64);
            day.format("%A").to_string()
        }
        _ => format!("Day {}", index + 1),
    }
}

/// One cell per forecast day.
pub fn weather_grid(forecast: &WeatherForecast, options: &RenderOptions) -> Node {
    let cells = forecast
        .daily_max()
        .iter()
        .zip(forecast.daily_min())
        .zip(forecast.weather_codes())
        .enumerate()
        .map(|(index, ((max, min), code))| {
            let band = TempBand::for_temperature(*max);
            let label = day_label(forecast, index, options.day_labels);
            Node::element("div")
                .class("weather-day")
                .attr("data-band", band.as_str())
                .child(Node::with_text("p", label).class("weather-day-text"))
                .child(
                    Node::element("img")
                        .class("weather-icon")
                        .attr("src", band.icon(&options.icons))
                        .attr("alt", band.as_str()),
                )
                .child(
                    Node::with_text("p", weather_code::describe(*code)).class("weather-condition"),
                )
                .child(Node::with_text("p", format!("Max: {max}°C")))
                .child(Node::with_text("p", format!("Min: {min}°C")))
        });

    Node::element("section")
        .class("weather")
        .child(Node::with_text("h3", "Weather Forecast:"))
        .child(Node::element("div").class("weather-grid").children(cells))
}

/// Travel tip for the first forecast day; empty section when there is no forecast.
pub fn tip_block(forecast: &WeatherForecast) -> Node {
    let section = Node::element("section").class("travel-tip");
    match forecast.first_day_max() {
        Some(max) => section
            .child(Node::with_text("h3", "Travel Tip:"))
            .child(Node::with_text("p", travel_tip(max))),
        None => section,
    }
}
