use chrono::Local;
use weather_core::{ConditionKind, FavoriteLocation, WeatherReport, moon_phase_symbol};

pub fn print_report(report: &WeatherReport, saved: bool) {
    let summary = &report.summary;
    let kind = ConditionKind::classify(&summary.condition, &summary.weather_code);
    let marker = if saved { " ★" } else { "" };

    println!("{} {}{}", kind.symbol(), summary.city, marker);
    println!("  {}  {}", summary.temperature, summary.condition);
    println!("  Humidity {}   Wind {}", summary.humidity, summary.wind);

    let detailed = &report.detailed;
    if let Some(current) = detailed.current() {
        println!();
        println!("  Feels like   {}°C", current.feels_like_c);
        println!("  Pressure     {} hPa", current.pressure);
        println!("  Visibility   {} km", current.visibility);
        println!("  UV index     {}", current.uv_index);
        println!("  Cloud cover  {}%", current.cloudcover);
        println!("  Rain         {} mm", current.precip_mm);
        println!(
            "  Wind         {} km/h {} ({}°)",
            current.windspeed_kmph, current.winddir_16_point, current.winddir_degree
        );
    }

    let hours = detailed.upcoming_hours();
    if !hours.is_empty() {
        println!();
        println!("Hourly");
        for hour in hours {
            let desc = hour.description().unwrap_or_default();
            let kind = ConditionKind::classify(desc, &hour.weather_code);
            println!(
                "  {}  {} {:>4}°  {:>3}%  {}",
                hour.clock_label(),
                kind.symbol(),
                hour.temp_c,
                hour.humidity,
                desc
            );
        }
    }

    let days = detailed.forecast_days();
    if !days.is_empty() {
        println!();
        println!("Forecast");
        for day in days {
            let kind = ConditionKind::classify(day.condition, day.weather_code);
            let date = day
                .day
                .parsed_date()
                .map(|d| d.format(" (%a %d %b)").to_string())
                .unwrap_or_default();
            println!(
                "  {:<18} {} {:>3}° / {:>3}°  {}{}",
                day.label,
                kind.symbol(),
                day.day.max_temp_c,
                day.day.min_temp_c,
                day.condition,
                date
            );
        }
    }

    if let Some(astro) = detailed.today_astronomy() {
        println!();
        println!("Sun & Moon");
        println!("  Sunrise {}   Sunset {}", astro.sunrise, astro.sunset);
        println!("  Moonrise {}   Moonset {}", astro.moonrise, astro.moonset);
        println!(
            "  {} {} ({}% illuminated)",
            moon_phase_symbol(&astro.moon_phase),
            astro.moon_phase,
            astro.moon_illumination
        );
    }

    println!();
    println!(
        "Updated {}",
        report.fetched_at.with_timezone(&Local).format("%H:%M")
    );
}

pub fn favorite_label(favorite: &FavoriteLocation) -> String {
    if favorite.is_current_location {
        format!("📍 {}", favorite.display_name)
    } else {
        favorite.display_name.clone()
    }
}

pub fn print_favorites(list: &[FavoriteLocation]) {
    if list.is_empty() {
        println!("No saved locations yet.");
        return;
    }

    for favorite in list {
        match &favorite.coordinates {
            Some(coords) => println!("{}  ({coords})", favorite_label(favorite)),
            None => println!("{}", favorite_label(favorite)),
        }
    }
}
