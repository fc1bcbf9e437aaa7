//! Parsing of the compact `condition|temperature|humidity|wind` response.

use crate::model::NOT_AVAILABLE;

/// The four fields of a compact weather response, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFields {
    pub condition: String,
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
}

/// Split a pipe-delimited summary into its four fields.
///
/// Missing trailing fields become [`NOT_AVAILABLE`]; extra segments are ignored.
/// Empty or blank input yields four placeholders.
pub fn parse_summary(raw: &str) -> SummaryFields {
    let trimmed = raw.trim();
    tracing::debug!(raw = %trimmed, "parsing weather summary");

    let mut parts = trimmed
        .split('|')
        .map(str::trim)
        .filter(|_| !trimmed.is_empty());

    let mut next = || {
        parts
            .next()
            .map(str::to_string)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    SummaryFields {
        condition: next(),
        temperature: next(),
        humidity: next(),
        wind: next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_fields_in_order() {
        let fields = parse_summary("Partly cloudy |+21°C| 64%|↙11km/h\n");
        assert_eq!(fields.condition, "Partly cloudy");
        assert_eq!(fields.temperature, "+21°C");
        assert_eq!(fields.humidity, "64%");
        assert_eq!(fields.wind, "↙11km/h");
    }

    #[test]
    fn missing_fields_fall_back_to_placeholder() {
        let fields = parse_summary("Sunny|21°C");
        assert_eq!(fields.condition, "Sunny");
        assert_eq!(fields.temperature, "21°C");
        assert_eq!(fields.humidity, NOT_AVAILABLE);
        assert_eq!(fields.wind, NOT_AVAILABLE);
    }

    #[test]
    fn empty_input_yields_placeholders() {
        for raw in ["", "   ", "\n"] {
            let fields = parse_summary(raw);
            assert_eq!(fields.condition, NOT_AVAILABLE);
            assert_eq!(fields.temperature, NOT_AVAILABLE);
            assert_eq!(fields.humidity, NOT_AVAILABLE);
            assert_eq!(fields.wind, NOT_AVAILABLE);
        }
    }

    #[test]
    fn surplus_segments_are_ignored() {
        let fields = parse_summary("Rain|10°C|90%|5km/h|extra|more");
        assert_eq!(fields.wind, "5km/h");
    }

    #[test]
    fn inner_whitespace_is_preserved() {
        let fields = parse_summary("Light rain shower|+9 °C|81%|→ 7km/h");
        assert_eq!(fields.condition, "Light rain shower");
        assert_eq!(fields.temperature, "+9 °C");
        assert_eq!(fields.wind, "→ 7km/h");
    }
}
