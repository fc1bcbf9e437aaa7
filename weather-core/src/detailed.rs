//! Shapes of the structured (`format=j1`) weather payload.
//!
//! The service encodes every scalar as text, so fields stay `String` here.
//! Individual fields missing from an element default to empty strings, while
//! a field of the wrong JSON type still fails the whole document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DAY_LABELS: [&str; 3] = ["Today", "Tomorrow", "Day After Tomorrow"];
const UPCOMING_HOURS: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedWeather {
    #[serde(default)]
    pub current_condition: Vec<CurrentCondition>,
    pub weather: Vec<WeatherDay>,
    #[serde(default)]
    pub nearest_area: Option<Vec<NearestArea>>,
    #[serde(default)]
    pub astronomy: Option<Vec<Astronomy>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextValue {
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentCondition {
    #[serde(rename = "temp_C")]
    pub temp_c: String,
    #[serde(rename = "temp_F")]
    pub temp_f: String,
    #[serde(rename = "FeelsLikeC")]
    pub feels_like_c: String,
    #[serde(rename = "weatherDesc")]
    pub weather_desc: Vec<TextValue>,
    pub humidity: String,
    #[serde(rename = "windspeedKmph")]
    pub windspeed_kmph: String,
    #[serde(rename = "winddirDegree")]
    pub winddir_degree: String,
    #[serde(rename = "winddir16Point")]
    pub winddir_16_point: String,
    pub pressure: String,
    pub visibility: String,
    #[serde(rename = "uvIndex")]
    pub uv_index: String,
    pub cloudcover: String,
    #[serde(rename = "precipMM")]
    pub precip_mm: String,
    #[serde(rename = "weatherCode")]
    pub weather_code: String,
}

impl CurrentCondition {
    pub fn description(&self) -> Option<&str> {
        self.weather_desc.first().map(|d| d.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: String,
    #[serde(rename = "maxtempC")]
    pub max_temp_c: String,
    #[serde(rename = "mintempC")]
    pub min_temp_c: String,
    #[serde(default)]
    pub hourly: Vec<HourlyWeather>,
    #[serde(default)]
    pub astronomy: Option<Vec<AstroData>>,
}

impl WeatherDay {
    /// Calendar date, when the service sent a well-formed `YYYY-MM-DD`.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyWeather {
    pub time: String,
    #[serde(rename = "tempC")]
    pub temp_c: String,
    #[serde(rename = "weatherDesc")]
    pub weather_desc: Vec<TextValue>,
    pub humidity: String,
    #[serde(rename = "windspeedKmph")]
    pub windspeed_kmph: String,
    #[serde(rename = "weatherCode")]
    pub weather_code: String,
}

impl HourlyWeather {
    pub fn description(&self) -> Option<&str> {
        self.weather_desc.first().map(|d| d.value.as_str())
    }

    /// Render the service's `hmm` time ("0", "300", "1200") as `HH:00`.
    pub fn clock_label(&self) -> String {
        let time = self.time.trim();
        if let Ok(n) = time.parse::<u32>() {
            if n < 100 {
                return format!("{n:02}:00");
            }
        }
        match time.len().checked_sub(2).and_then(|end| time.get(..end)) {
            Some(hours) if time.len() >= 3 => format!("{hours:0>2}:00"),
            _ => format!("{time}:00"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearestArea {
    #[serde(rename = "areaName")]
    pub area_name: Vec<TextValue>,
    pub country: Vec<TextValue>,
    pub region: Vec<TextValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Astronomy {
    pub astronomy: Vec<AstroData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AstroData {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    pub moon_illumination: String,
}

/// One row of the short-range forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast<'a> {
    pub label: &'static str,
    pub day: &'a WeatherDay,
    pub condition: &'a str,
    pub weather_code: &'a str,
}

impl DetailedWeather {
    /// Parse a structured payload. Any malformed input is a single error.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn current(&self) -> Option<&CurrentCondition> {
        self.current_condition.first()
    }

    /// Weather code of the current conditions, empty if absent at any level.
    pub fn weather_code(&self) -> &str {
        self.current().map(|c| c.weather_code.as_str()).unwrap_or_default()
    }

    /// Name of the area the service matched, used to label GPS searches.
    pub fn nearest_area_name(&self) -> Option<&str> {
        self.nearest_area
            .as_ref()?
            .first()?
            .area_name
            .first()
            .map(|v| v.value.as_str())
            .filter(|name| !name.trim().is_empty())
    }

    /// Sun and moon data for today: the first day's block, else the top-level one.
    pub fn today_astronomy(&self) -> Option<&AstroData> {
        let from_day = self
            .weather
            .first()
            .and_then(|day| day.astronomy.as_ref())
            .and_then(|list| list.first());

        from_day.or_else(|| {
            self.astronomy
                .as_ref()
                .and_then(|list| list.first())
                .and_then(|a| a.astronomy.first())
        })
    }

    /// The next hours of today, in service order.
    pub fn upcoming_hours(&self) -> &[HourlyWeather] {
        match self.weather.first() {
            Some(day) => &day.hourly[..day.hourly.len().min(UPCOMING_HOURS)],
            None => &[],
        }
    }

    /// Up to three labelled days, headlined by each day's first hourly slot.
    pub fn forecast_days(&self) -> Vec<DayForecast<'_>> {
        self.weather
            .iter()
            .zip(DAY_LABELS)
            .map(|(day, label)| {
                let first = day.hourly.first();
                DayForecast {
                    label,
                    day,
                    condition: first.and_then(HourlyWeather::description).unwrap_or("Clear"),
                    weather_code: first.map(|h| h.weather_code.as_str()).unwrap_or_default(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> serde_json::Value {
        serde_json::json!({
            "current_condition": [{
                "temp_C": "18",
                "temp_F": "64",
                "FeelsLikeC": "17",
                "weatherDesc": [{"value": "Partly cloudy"}],
                "humidity": "60",
                "windspeedKmph": "11",
                "winddirDegree": "200",
                "winddir16Point": "SSW",
                "pressure": "1015",
                "visibility": "10",
                "uvIndex": "4",
                "cloudcover": "25",
                "precipMM": "0.0",
                "weatherCode": "116"
            }],
            "weather": [
                {
                    "date": "2026-10-16",
                    "maxtempC": "20",
                    "mintempC": "11",
                    "astronomy": [{
                        "sunrise": "07:31 AM",
                        "sunset": "06:40 PM",
                        "moonrise": "03:02 AM",
                        "moonset": "05:10 PM",
                        "moon_phase": "Waning Crescent",
                        "moon_illumination": "21"
                    }],
                    "hourly": [
                        {"time": "0", "tempC": "12", "weatherDesc": [{"value": "Clear"}],
                         "humidity": "80", "windspeedKmph": "6", "weatherCode": "113"},
                        {"time": "300", "tempC": "11", "weatherDesc": [{"value": "Mist"}],
                         "humidity": "85", "windspeedKmph": "5", "weatherCode": "143"}
                    ]
                },
                {"date": "2026-10-17", "maxtempC": "19", "mintempC": "10", "hourly": []},
                {"date": "2026-10-18", "maxtempC": "17", "mintempC": "9",
                 "hourly": [{"time": "0", "tempC": "10", "weatherDesc": [{"value": "Light rain"}],
                             "humidity": "90", "windspeedKmph": "14"}]}
            ],
            "nearest_area": [{
                "areaName": [{"value": "Amsterdam"}],
                "country": [{"value": "Netherlands"}],
                "region": [{"value": "North Holland"}]
            }]
        })
    }

    #[test]
    fn parses_full_payload() {
        let detailed = DetailedWeather::from_json(&sample().to_string()).unwrap();

        let current = detailed.current().unwrap();
        assert_eq!(current.temp_c, "18");
        assert_eq!(current.description(), Some("Partly cloudy"));
        assert_eq!(detailed.weather_code(), "116");
        assert_eq!(detailed.nearest_area_name(), Some("Amsterdam"));
        assert_eq!(detailed.weather.len(), 3);
        assert_eq!(
            detailed.weather[0].parsed_date(),
            NaiveDate::from_ymd_opt(2026, 10, 16)
        );
    }

    #[test]
    fn missing_astronomy_and_nearest_area_are_absent() {
        let raw = r#"{"current_condition": [], "weather": []}"#;
        let detailed = DetailedWeather::from_json(raw).unwrap();

        assert!(detailed.astronomy.is_none());
        assert!(detailed.nearest_area.is_none());
        assert_eq!(detailed.nearest_area_name(), None);
        assert!(detailed.today_astronomy().is_none());
    }

    #[test]
    fn weather_code_is_empty_when_current_condition_missing() {
        let detailed = DetailedWeather::from_json(r#"{"weather": []}"#).unwrap();
        assert_eq!(detailed.weather_code(), "");

        let detailed =
            DetailedWeather::from_json(r#"{"current_condition": [{}], "weather": []}"#).unwrap();
        assert_eq!(detailed.weather_code(), "");
    }

    #[test]
    fn malformed_payloads_fail() {
        assert!(DetailedWeather::from_json("not json").is_err());
        assert!(DetailedWeather::from_json(r#"{"weather": "sunny"}"#).is_err());
        assert!(DetailedWeather::from_json(r#"{"current_condition": []}"#).is_err());
    }

    #[test]
    fn today_astronomy_prefers_day_block() {
        let detailed = DetailedWeather::from_json(&sample().to_string()).unwrap();
        let astro = detailed.today_astronomy().unwrap();
        assert_eq!(astro.moon_phase, "Waning Crescent");
        assert_eq!(astro.sunrise, "07:31 AM");
    }

    #[test]
    fn today_astronomy_falls_back_to_top_level() {
        let raw = r#"{
            "weather": [{"date": "2026-10-16", "maxtempC": "20", "mintempC": "11"}],
            "astronomy": [{"astronomy": [{"sunrise": "06:00 AM", "moon_phase": "Full Moon"}]}]
        }"#;
        let detailed = DetailedWeather::from_json(raw).unwrap();
        let astro = detailed.today_astronomy().unwrap();
        assert_eq!(astro.sunrise, "06:00 AM");
        assert_eq!(astro.moon_phase, "Full Moon");
        assert_eq!(astro.sunset, "");
    }

    #[test]
    fn forecast_days_are_labelled_and_headlined() {
        let detailed = DetailedWeather::from_json(&sample().to_string()).unwrap();
        let days = detailed.forecast_days();

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].label, "Today");
        assert_eq!(days[0].condition, "Clear");
        assert_eq!(days[0].weather_code, "113");
        assert_eq!(days[1].label, "Tomorrow");
        assert_eq!(days[1].condition, "Clear");
        assert_eq!(days[1].weather_code, "");
        assert_eq!(days[2].label, "Day After Tomorrow");
        assert_eq!(days[2].condition, "Light rain");
        assert_eq!(days[2].day.max_temp_c, "17");
    }

    #[test]
    fn upcoming_hours_come_from_first_day() {
        let detailed = DetailedWeather::from_json(&sample().to_string()).unwrap();
        let hours = detailed.upcoming_hours();
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[1].description(), Some("Mist"));

        assert!(DetailedWeather::default().upcoming_hours().is_empty());
    }

    #[test]
    fn clock_label_formats_service_times() {
        let hour = |time: &str| HourlyWeather {
            time: time.to_string(),
            ..Default::default()
        };

        assert_eq!(hour("0").clock_label(), "00:00");
        assert_eq!(hour("300").clock_label(), "03:00");
        assert_eq!(hour("1200").clock_label(), "12:00");
        assert_eq!(hour("2100").clock_label(), "21:00");
        assert_eq!(hour("").clock_label(), ":00");
    }
}
