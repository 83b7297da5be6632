//! The rendering engine: turns one aggregated [`LocationInfo`] into
//! three display-ready tables.
//!
//! Rendering is a pure function of the input record plus a single
//! clock read, so it can be called from any number of concurrent
//! tasks without coordination. It never mutates its input and either
//! produces the whole report or fails before returning any table.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::model::LocationInfo;
use crate::table::{RenderedReport, ReportTable};

/// Typed failures of one render call.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A required field is absent, mis-shaped, or a currency rate is
    /// not parseable as a decimal number. Upstream contract violation.
    #[error("malformed input in `{field}`: {reason}")]
    MalformedInput { field: &'static str, reason: String },

    /// The ambient clock could not be read. Fatal to this render call.
    #[error("system clock unavailable: {0}")]
    ClockUnavailable(String),
}

/// Injectable clock so tests can render against a fixed instant.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> Result<DateTime<Utc>, FormatError>;
}

/// Production clock, reads the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> Result<DateTime<Utc>, FormatError> {
        Ok(Utc::now())
    }
}

/// Presentation constants: row labels and unit suffixes.
///
/// Kept as one substitutable table rather than inline literals, so a
/// caller can swap the display language without touching the engine.
#[derive(Debug, Clone)]
pub struct Units {
    pub country_label: &'static str,
    pub area_label: &'static str,
    pub subregion_label: &'static str,
    pub languages_label: &'static str,
    pub population_label: &'static str,
    pub currency_rates_label: &'static str,
    pub capital_label: &'static str,
    pub latitude_label: &'static str,
    pub longitude_label: &'static str,
    pub timezone_label: &'static str,
    pub local_time_label: &'static str,
    pub temperature_label: &'static str,
    pub weather_label: &'static str,
    pub humidity_label: &'static str,
    pub visibility_label: &'static str,
    pub wind_speed_label: &'static str,

    pub area_unit: &'static str,
    pub population_unit: &'static str,
    /// Display unit of the base currency all rates are expressed in.
    pub base_currency_unit: &'static str,
    pub temperature_unit: &'static str,
    pub humidity_unit: &'static str,
    pub wind_speed_unit: &'static str,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            country_label: "Country",
            area_label: "Area",
            subregion_label: "Subregion",
            languages_label: "Languages",
            population_label: "Population",
            currency_rates_label: "Currency rates",
            capital_label: "Capital",
            latitude_label: "Latitude",
            longitude_label: "Longitude",
            timezone_label: "Timezone",
            local_time_label: "Local time",
            temperature_label: "Temperature",
            weather_label: "Weather",
            humidity_label: "Humidity",
            visibility_label: "Visibility",
            wind_speed_label: "Wind speed",

            area_unit: "km²",
            population_unit: "people",
            base_currency_unit: "RUB",
            temperature_unit: "°C",
            humidity_unit: "%",
            wind_speed_unit: "m/s",
        }
    }
}

/// Render the three report tables with the default English labels.
pub fn render(info: &LocationInfo, clock: &dyn Clock) -> Result<RenderedReport, FormatError> {
    render_with_units(info, clock, &Units::default())
}

/// Render the three report tables with caller-supplied labels/units.
pub fn render_with_units(
    info: &LocationInfo,
    clock: &dyn Clock,
    units: &Units,
) -> Result<RenderedReport, FormatError> {
    require_non_empty("location.name", &info.location.name)?;
    require_non_empty("location.capital", &info.location.capital)?;

    // Fallible sub-computations first, so a failure yields no table.
    let rates = format_currency_rates(info, units)?;
    let now = clock.now_utc()?;

    let country = ReportTable::new(vec![
        (units.country_label.into(), info.location.name.clone()),
        (
            units.area_label.into(),
            format!("{} {}", info.location.area, units.area_unit),
        ),
        (units.subregion_label.into(), info.location.subregion.clone()),
        (units.languages_label.into(), format_languages(info)),
        (
            units.population_label.into(),
            format!(
                "{} {}",
                group_thousands(info.location.population),
                units.population_unit
            ),
        ),
        (units.currency_rates_label.into(), rates),
    ]);

    let capital = ReportTable::new(vec![
        (units.capital_label.into(), info.location.capital.clone()),
        (units.latitude_label.into(), info.location.latitude.to_string()),
        (units.longitude_label.into(), info.location.longitude.to_string()),
        (
            units.timezone_label.into(),
            format_timezone(info.weather.timezone_offset_seconds),
        ),
        (
            units.local_time_label.into(),
            format_local_time(now, info.weather.timezone_offset_seconds),
        ),
    ]);

    let weather = ReportTable::new(vec![
        (
            units.temperature_label.into(),
            format!("{} {}", info.weather.temperature_c, units.temperature_unit),
        ),
        (units.weather_label.into(), info.weather.description.clone()),
        (
            units.humidity_label.into(),
            format!("{}{}", info.weather.humidity_pct, units.humidity_unit),
        ),
        (units.visibility_label.into(), info.weather.visibility.to_string()),
        (
            units.wind_speed_label.into(),
            format!("{} {}", info.weather.wind_speed_mps, units.wind_speed_unit),
        ),
    ]);

    Ok(RenderedReport { country, capital, weather })
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), FormatError> {
    if value.is_empty() {
        return Err(FormatError::MalformedInput {
            field,
            reason: "required field is empty".to_string(),
        });
    }
    Ok(())
}

/// `"<name> (<native_name>)"` per language, comma-separated, input order.
fn format_languages(info: &LocationInfo) -> String {
    info.location
        .languages
        .iter()
        .map(|lang| format!("{} ({})", lang.name, lang.native_name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Group an integer in triples with `,`. The period stays reserved
/// for decimal points in currency amounts.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// `"<code> = <amount> <unit>"` per rate, comma-separated, input order.
fn format_currency_rates(info: &LocationInfo, units: &Units) -> Result<String, FormatError> {
    let mut parts = Vec::with_capacity(info.currency_rates.len());
    for entry in &info.currency_rates {
        let amount = round_half_up(&entry.rate).ok_or_else(|| FormatError::MalformedInput {
            field: "currency_rates",
            reason: format!("rate for {} is not a decimal number: {:?}", entry.code, entry.rate),
        })?;
        parts.push(format!("{} = {} {}", entry.code, amount, units.base_currency_unit));
    }
    Ok(parts.join(", "))
}

/// Round a decimal string to exactly 2 fractional digits, half-up
/// (ties away from zero: 0.125 → 0.13, never 0.12).
///
/// Works on the decimal digits directly; going through an f64 would
/// misround inputs like 73.005, which have no exact binary form.
/// Accepts exponent notation (`9.0e+1`): JSON permits it, and with
/// arbitrary-precision numbers the upstream text reaches us verbatim.
fn round_half_up(raw: &str) -> Option<String> {
    // Exponents outside this window cannot be real exchange rates;
    // bounding them also bounds the digit expansion below.
    const MAX_EXPONENT: i32 = 64;

    let (neg, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    let (mantissa, exponent) = match body.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().ok()?),
        None => (body, 0),
    };
    if exponent.abs() > MAX_EXPONENT {
        return None;
    }

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    // One digit vector scaled by 10^-scale; the exponent only moves
    // the decimal point.
    let mut digits: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).map(|b| b - b'0').collect();
    let mut scale = i64::try_from(frac_part.len()).ok()? - i64::from(exponent);
    if scale < 0 {
        digits.resize(digits.len() + usize::try_from(-scale).ok()?, 0);
        scale = 0;
    }
    let scale = usize::try_from(scale).ok()?;
    if digits.len() < scale {
        let mut padded = vec![0u8; scale - digits.len()];
        padded.append(&mut digits);
        digits = padded;
    }

    let (int_digits, frac) = digits.split_at(digits.len() - scale);
    let d1 = u32::from(frac.first().copied().unwrap_or(0));
    let d2 = u32::from(frac.get(1).copied().unwrap_or(0));
    // Remainder past the second place is >= half a cent exactly when
    // the third digit is >= 5.
    let round_up = frac.get(2).is_some_and(|d| *d >= 5);

    let mut cents = d1 * 10 + d2 + u32::from(round_up);
    let mut int_digits = int_digits.to_vec();
    if cents == 100 {
        cents = 0;
        carry_increment(&mut int_digits);
    }

    let int_text: String = int_digits.iter().map(|d| char::from(b'0' + d)).collect();
    let int_text = int_text.trim_start_matches('0');
    let int_text = if int_text.is_empty() { "0" } else { int_text };
    let sign = if neg { "-" } else { "" };

    Some(format!("{sign}{int_text}.{cents:02}"))
}

fn carry_increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d < 9 {
            *d += 1;
            return;
        }
        *d = 0;
    }
    digits.insert(0, 1);
}

/// `UTC±H:MM` from a UTC offset in seconds. Hours truncate toward
/// zero and always carry an explicit sign; minutes are the absolute
/// fractional remainder, so -19800 renders `UTC-5:30`, not `UTC-5:-30`.
fn format_timezone(offset_seconds: i32) -> String {
    let total_minutes = offset_seconds / 60;
    let hours = total_minutes / 60;
    let minutes = (total_minutes % 60).abs();
    format!("UTC{hours:+}:{minutes:02}")
}

/// Wall-clock time at the capital: current UTC shifted by the offset.
fn format_local_time(now: DateTime<Utc>, offset_seconds: i32) -> String {
    let local = now + Duration::seconds(i64::from(offset_seconds));
    local.format("%H:%M:%S, %m/%d/%y").to_string()
}
