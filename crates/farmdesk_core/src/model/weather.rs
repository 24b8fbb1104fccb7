//! Weather snapshot shown on the dashboard.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub location: String,
    pub temperature: f64,
    pub condition: String,
    pub humidity: u8,
    /// km/h
    pub wind_speed: f64,
    pub icon: String,
    #[serde(default)]
    pub forecast: Vec<DailyForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub day: String,
    pub icon: String,
    pub temp: f64,
}
