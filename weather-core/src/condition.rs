//! Coarse condition categories for icons, from weather codes or description text.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Fog,
    Rain,
    HeavyRain,
    Snow,
    Thunder,
    Unknown,
}

impl ConditionKind {
    /// Classify by weather code when one is present, otherwise by description.
    pub fn classify(condition: &str, weather_code: &str) -> Self {
        let code = weather_code.trim();
        if code.is_empty() {
            Self::from_text(condition)
        } else {
            Self::from_code(code)
        }
    }

    /// Map a wttr/WWO weather code. Unknown codes are `Cloudy`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "113" => Self::Sunny,
            "116" => Self::PartlyCloudy,
            "119" | "122" => Self::Cloudy,
            "143" | "248" | "260" => Self::Fog,
            "176" | "263" | "266" | "293" | "296" => Self::Rain,
            "299" | "302" | "305" | "308" | "356" | "359" => Self::HeavyRain,
            "179" | "182" | "185" | "227" | "230" | "281" | "284" | "311" | "314" | "317"
            | "323" | "326" | "329" | "332" | "335" | "338" | "350" | "362" | "365" | "368"
            | "371" | "374" | "377" => Self::Snow,
            "200" | "386" | "389" | "392" | "395" => Self::Thunder,
            _ => Self::Cloudy,
        }
    }

    pub fn from_text(condition: &str) -> Self {
        let text = condition.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| text.contains(w));

        if has(&["sunny", "clear"]) {
            Self::Sunny
        } else if has(&["partly cloud"]) {
            Self::PartlyCloudy
        } else if has(&["cloudy", "overcast"]) {
            Self::Cloudy
        } else if has(&["thunder", "storm"]) {
            Self::Thunder
        } else if has(&["rain", "drizzle", "shower"]) {
            Self::Rain
        } else if has(&["snow", "sleet", "ice", "freezing"]) {
            Self::Snow
        } else if has(&["mist", "fog"]) {
            Self::Fog
        } else {
            Self::Unknown
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Sunny => "☀",
            Self::PartlyCloudy => "⛅",
            Self::Cloudy | Self::Unknown => "☁",
            Self::Fog => "🌫",
            Self::Rain | Self::HeavyRain => "🌧",
            Self::Snow => "❄",
            Self::Thunder => "⛈",
        }
    }
}

/// Glyph for a moon phase name; unrecognised phases get a generic crescent.
pub fn moon_phase_symbol(phase: &str) -> &'static str {
    let phase = phase.to_lowercase();
    let table = [
        ("new moon", "🌑"),
        ("waxing crescent", "🌒"),
        ("first quarter", "🌓"),
        ("waxing gibbous", "🌔"),
        ("full moon", "🌕"),
        ("waning gibbous", "🌖"),
        ("last quarter", "🌗"),
        ("third quarter", "🌗"),
        ("waning crescent", "🌘"),
    ];

    table
        .iter()
        .find(|(name, _)| phase.contains(name))
        .map(|(_, glyph)| *glyph)
        .unwrap_or("🌙")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_takes_precedence_over_text() {
        assert_eq!(ConditionKind::classify("Sunny", "389"), ConditionKind::Thunder);
        assert_eq!(ConditionKind::classify("Sunny", ""), ConditionKind::Sunny);
        assert_eq!(ConditionKind::classify("Light snow", "  "), ConditionKind::Snow);
    }

    #[test]
    fn known_codes() {
        assert_eq!(ConditionKind::from_code("113"), ConditionKind::Sunny);
        assert_eq!(ConditionKind::from_code("143"), ConditionKind::Fog);
        assert_eq!(ConditionKind::from_code("308"), ConditionKind::HeavyRain);
        assert_eq!(ConditionKind::from_code("338"), ConditionKind::Snow);
        assert_eq!(ConditionKind::from_code("999"), ConditionKind::Cloudy);
    }

    #[test]
    fn text_fallback_order() {
        assert_eq!(ConditionKind::from_text("Partly cloudy"), ConditionKind::PartlyCloudy);
        assert_eq!(ConditionKind::from_text("Overcast"), ConditionKind::Cloudy);
        assert_eq!(
            ConditionKind::from_text("Patchy light rain with thunder"),
            ConditionKind::Thunder
        );
        assert_eq!(ConditionKind::from_text("Freezing fog"), ConditionKind::Snow);
        assert_eq!(ConditionKind::from_text("Haze"), ConditionKind::Unknown);
    }

    #[test]
    fn moon_phases() {
        assert_eq!(moon_phase_symbol("Full Moon"), "🌕");
        assert_eq!(moon_phase_symbol("Third Quarter"), "🌗");
        assert_eq!(moon_phase_symbol("waxing crescent"), "🌒");
        assert_eq!(moon_phase_symbol(""), "🌙");
    }
}
