/// AEMET municipal forecast indexing.
///
/// The hourly endpoint (`/prediccion/especifica/municipio/horaria/{ine}`)
/// returns, per day, a set of parallel arrays that are each periodized on
/// their own schedule:
///
/// - `temperatura`, `sensTermica`, `humedadRelativa`, `precipitacion`,
///   `estadoCielo`, `viento`: one entry per hour, `periodo = "07"`;
/// - `probPrecipitacion`, `rachaMax`: ranges, `periodo = "0208"` or
///   `"02-08"` (upper bound exclusive), occasionally a single hour.
///
/// The live service also merges wind and gusts into one `vientoAndRachaMax`
/// array; both layouts are accepted.
///
/// This module flattens all of that into one `HourlyForecast` per hour that
/// has a temperature. The daily endpoint gets a simpler one-record-per-day
/// treatment.
///
/// Nothing here fails: structurally invalid input produces an empty
/// forecast, because a missing forecast is a normal condition for a batch
/// over many municipalities.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{DailyForecast, HourlyForecast, MunicipalityForecast};

/// Trace-precipitation marker ("inapreciable").
const TRACE_PRECIPITATION: &str = "Ip";

/// Period label AEMET uses for a whole-day value in the daily forecast.
const WHOLE_DAY_PERIOD: &str = "00-24";

// ============================================================================
// AEMET Response Structures
// ============================================================================

/// One municipality entry of the top-level response array.
#[derive(Debug, Default, Deserialize)]
struct MunicipalityPrediction {
    #[serde(default)]
    nombre: String,
    #[serde(default)]
    provincia: String,
    #[serde(default)]
    elaborado: String,
    #[serde(default)]
    prediccion: Prediction,
}

#[derive(Debug, Default, Deserialize)]
struct Prediction {
    #[serde(default)]
    dia: Vec<Value>,
}

/// One day of the hourly forecast.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HourlyDay {
    #[serde(default)]
    fecha: String,
    #[serde(default)]
    temperatura: Vec<PeriodEntry>,
    #[serde(default)]
    sens_termica: Vec<PeriodEntry>,
    #[serde(default)]
    humedad_relativa: Vec<PeriodEntry>,
    #[serde(default)]
    precipitacion: Vec<PeriodEntry>,
    #[serde(default)]
    estado_cielo: Vec<PeriodEntry>,
    #[serde(default)]
    prob_precipitacion: Vec<PeriodEntry>,
    #[serde(default)]
    viento: Vec<PeriodEntry>,
    #[serde(default)]
    racha_max: Vec<PeriodEntry>,
    #[serde(default)]
    viento_and_racha_max: Vec<PeriodEntry>,
}

/// One day of the daily forecast.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyDay {
    #[serde(default)]
    fecha: String,
    #[serde(default)]
    temperatura: TemperatureRange,
    #[serde(default)]
    estado_cielo: Vec<PeriodEntry>,
    #[serde(default)]
    prob_precipitacion: Vec<PeriodEntry>,
    #[serde(default)]
    viento: Vec<PeriodEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct TemperatureRange {
    #[serde(default)]
    maxima: Option<Value>,
    #[serde(default)]
    minima: Option<Value>,
}

/// A periodized array element. Values arrive as strings, numbers or
/// one-element arrays depending on the field, so they stay untyped here.
#[derive(Debug, Default, Clone, Deserialize)]
struct PeriodEntry {
    #[serde(default)]
    periodo: Option<String>,
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    descripcion: Option<String>,
    #[serde(default)]
    direccion: Option<Value>,
    #[serde(default)]
    velocidad: Option<Value>,
}

/// Sky state for one hour: AEMET code (e.g. `"12n"`) and its description.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkyState {
    pub code: Option<String>,
    pub description: Option<String>,
}

// ============================================================================
// Public entry points
// ============================================================================

/// Builds the hourly forecast from the raw response body.
pub fn parse_hourly_forecast_bytes(data: &[u8]) -> MunicipalityForecast {
    match serde_json::from_slice::<Value>(data) {
        Ok(json) => parse_hourly_forecast(&json),
        Err(_) => MunicipalityForecast::empty(""),
    }
}

/// Builds the hourly forecast from decoded JSON.
///
/// Days are concatenated in upstream order; within a day, hours follow the
/// order of the `temperatura` array. Returns an empty forecast for
/// anything that does not look like an AEMET municipal prediction.
pub fn parse_hourly_forecast(json: &Value) -> MunicipalityForecast {
    let Some(municipality) = first_municipality(json) else {
        return MunicipalityForecast::empty("");
    };

    let mut hours = Vec::new();
    for raw_day in &municipality.prediccion.dia {
        let Ok(day) = HourlyDay::deserialize(raw_day) else {
            return MunicipalityForecast::empty("");
        };
        if let Some(date) = parse_day_date(&day.fecha) {
            hours.extend(index_hourly_day(&day, date));
        }
    }

    MunicipalityForecast {
        name: municipality.nombre,
        province: municipality.provincia,
        issued: municipality.elaborado,
        hours,
        daily: Vec::new(),
    }
}

/// Builds the daily forecast list from the raw response body.
pub fn parse_daily_forecast_bytes(data: &[u8]) -> Vec<DailyForecast> {
    match serde_json::from_slice::<Value>(data) {
        Ok(json) => parse_daily_forecast(&json),
        Err(_) => Vec::new(),
    }
}

/// One `DailyForecast` per `dia` entry with a valid date.
pub fn parse_daily_forecast(json: &Value) -> Vec<DailyForecast> {
    let Some(municipality) = first_municipality(json) else {
        return Vec::new();
    };

    let mut days = Vec::new();
    for raw_day in &municipality.prediccion.dia {
        let Ok(day) = DailyDay::deserialize(raw_day) else {
            return Vec::new();
        };
        if let Some(date) = parse_day_date(&day.fecha) {
            days.push(index_daily_day(&day, date));
        }
    }
    days
}

// ============================================================================
// Period handling
// ============================================================================

/// Hours covered by a period label.
///
/// ```text
/// "07"     → [7]
/// "0208"   → [2, 3, 4, 5, 6, 7]      first two digits start, next two end
/// "02-08"  → [2, 3, 4, 5, 6, 7]
/// "2002"   → [20, 21, 22, 23]        wraps past midnight: rest of this day
/// ```
///
/// Upper bounds are exclusive and capped at 24. Unparseable labels cover
/// nothing.
pub fn expand_period(label: &str) -> Vec<u32> {
    let label = label.trim();

    let (start, end) = if let Some((start, end)) = label.split_once('-') {
        (start, end)
    } else if label.len() > 2 {
        match (label.get(..2), label.get(2..4)) {
            (Some(start), Some(end)) => (start, end),
            _ => return Vec::new(),
        }
    } else {
        return single_hour(label).into_iter().collect();
    };

    let (Ok(start), Ok(end)) = (start.trim().parse::<u32>(), end.trim().parse::<u32>()) else {
        return Vec::new();
    };
    if start >= 24 {
        return Vec::new();
    }

    let end = if end <= start { 24 } else { end.min(24) };
    (start..end).collect()
}

/// A single two-digit hour label, `"00"`..`"23"`.
pub fn single_hour(label: &str) -> Option<u32> {
    let label = label.trim();
    if label.is_empty() || label.len() > 2 {
        return None;
    }
    label.parse::<u32>().ok().filter(|h| *h < 24)
}

/// `"Ip"` (trace) and blank amounts read as `"0"`.
pub fn normalize_precip_amount(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw == TRACE_PRECIPITATION {
        "0".to_string()
    } else {
        raw.to_string()
    }
}

// ============================================================================
// Hourly indexing
// ============================================================================

fn index_hourly_day(day: &HourlyDay, date: NaiveDate) -> Vec<HourlyForecast> {
    let temperature = ordered_int_map(&day.temperatura);
    let feels_like = int_map(&day.sens_termica);
    let humidity = int_map(&day.humedad_relativa);
    let precip_amount = precip_amount_map(&day.precipitacion);
    let sky = sky_map(&day.estado_cielo);
    let precip_prob = probability_map(&day.prob_precipitacion);

    let wind_entries = day.viento.iter().chain(
        day.viento_and_racha_max
            .iter()
            .filter(|e| e.direccion.is_some() || e.velocidad.is_some()),
    );
    let wind = wind_map(wind_entries);

    let gust_entries = day.racha_max.iter().chain(
        day.viento_and_racha_max
            .iter()
            .filter(|e| e.direccion.is_none() && e.value.is_some()),
    );
    let gust = gust_map(gust_entries);

    temperature
        .into_iter()
        .filter_map(|(hour, temp)| {
            let datetime = date.and_hms_opt(hour, 0, 0)?.format("%Y-%m-%dT%H:%M:%S").to_string();
            let prob = precip_prob.get(&hour).copied();
            let amount = match prob {
                Some(p) if p > 0 => precip_amount.get(&hour).cloned(),
                _ => None,
            };
            let (wind_dir, wind_speed) = wind.get(&hour).cloned().unwrap_or((None, None));
            let sky_state = sky.get(&hour).cloned().unwrap_or_default();

            Some(HourlyForecast {
                datetime,
                temperature: Some(temp),
                feels_like: feels_like.get(&hour).copied(),
                humidity: humidity.get(&hour).copied(),
                precip_prob: prob,
                precip_amount: amount,
                wind_dir,
                wind_speed,
                wind_gust: gust.get(&hour).copied(),
                sky_description: sky_state.description,
                sky_code: sky_state.code,
            })
        })
        .collect()
}

/// Hour → integer in array order, first occurrence wins. Anchors the day.
fn ordered_int_map(entries: &[PeriodEntry]) -> Vec<(u32, i32)> {
    let mut out: Vec<(u32, i32)> = Vec::new();
    for entry in entries {
        let (Some(hour), Some(value)) = (entry_hour(entry), entry.value.as_ref().and_then(value_int))
        else {
            continue;
        };
        if !out.iter().any(|(h, _)| *h == hour) {
            out.push((hour, value));
        }
    }
    out
}

fn int_map(entries: &[PeriodEntry]) -> HashMap<u32, i32> {
    ordered_int_map(entries).into_iter().collect()
}

fn precip_amount_map(entries: &[PeriodEntry]) -> HashMap<u32, String> {
    let mut out = HashMap::new();
    for entry in entries {
        let Some(hour) = entry_hour(entry) else {
            continue;
        };
        let raw = entry.value.as_ref().and_then(value_text).unwrap_or_default();
        out.entry(hour).or_insert_with(|| normalize_precip_amount(&raw));
    }
    out
}

fn sky_map(entries: &[PeriodEntry]) -> HashMap<u32, SkyState> {
    let mut out = HashMap::new();
    for entry in entries {
        let Some(hour) = entry_hour(entry) else {
            continue;
        };
        let state = SkyState {
            code: entry.value.as_ref().and_then(value_text).filter(|c| !c.is_empty()),
            description: non_blank(entry.descripcion.as_deref()),
        };
        if state.code.is_some() || state.description.is_some() {
            out.entry(hour).or_insert(state);
        }
    }
    out
}

/// Range-expanded probability; blank values count as 0 %.
fn probability_map(entries: &[PeriodEntry]) -> HashMap<u32, i32> {
    let mut out = HashMap::new();
    for entry in entries {
        let value = entry.value.as_ref().and_then(value_int).unwrap_or(0);
        for hour in expand_period(entry.periodo.as_deref().unwrap_or("")) {
            out.entry(hour).or_insert(value);
        }
    }
    out
}

/// Range-expanded gusts; blank values cover nothing.
fn gust_map<'a>(entries: impl Iterator<Item = &'a PeriodEntry>) -> HashMap<u32, i32> {
    let mut out = HashMap::new();
    for entry in entries {
        let Some(value) = entry.value.as_ref().and_then(value_int) else {
            continue;
        };
        for hour in expand_period(entry.periodo.as_deref().unwrap_or("")) {
            out.entry(hour).or_insert(value);
        }
    }
    out
}

type Wind = (Option<String>, Option<i32>);

fn wind_map<'a>(entries: impl Iterator<Item = &'a PeriodEntry>) -> HashMap<u32, Wind> {
    let mut out = HashMap::new();
    for entry in entries {
        let Some(hour) = entry_hour(entry) else {
            continue;
        };
        let direction = entry.direccion.as_ref().and_then(value_text).filter(|d| !d.is_empty());
        let speed = entry.velocidad.as_ref().and_then(value_int);
        if direction.is_some() || speed.is_some() {
            out.entry(hour).or_insert((direction, speed));
        }
    }
    out
}

fn entry_hour(entry: &PeriodEntry) -> Option<u32> {
    single_hour(entry.periodo.as_deref()?)
}

// ============================================================================
// Daily indexing
// ============================================================================

fn index_daily_day(day: &DailyDay, date: NaiveDate) -> DailyForecast {
    let sky_description = pick_whole_day(&day.estado_cielo, |e| non_blank(e.descripcion.as_deref()));
    let precip_prob = pick_whole_day(&day.prob_precipitacion, |e| e.value.as_ref().and_then(value_int));
    let wind = pick_whole_day(&day.viento, |e| {
        let direction = e.direccion.as_ref().and_then(value_text).filter(|d| !d.is_empty());
        let speed = e.velocidad.as_ref().and_then(value_int);
        if direction.is_some() || speed.is_some() {
            Some((direction, speed))
        } else {
            None
        }
    });
    let (wind_dir, wind_speed) = wind.unwrap_or((None, None));

    DailyForecast {
        date: date.format("%Y-%m-%d").to_string(),
        temp_min: day.temperatura.minima.as_ref().and_then(value_int),
        temp_max: day.temperatura.maxima.as_ref().and_then(value_int),
        sky_description,
        precip_prob,
        wind_dir,
        wind_speed,
    }
}

/// The whole-day entry's value if it has one, else the first entry that
/// yields a value.
fn pick_whole_day<T>(entries: &[PeriodEntry], extract: impl Fn(&PeriodEntry) -> Option<T>) -> Option<T> {
    let is_whole_day = |e: &&PeriodEntry| match e.periodo.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(p) => p == WHOLE_DAY_PERIOD,
    };

    entries
        .iter()
        .filter(is_whole_day)
        .find_map(&extract)
        .or_else(|| entries.iter().find_map(&extract))
}

// ============================================================================
// Value helpers
// ============================================================================

/// The municipality object: first element of the top-level array, or the
/// object itself.
fn first_municipality(json: &Value) -> Option<MunicipalityPrediction> {
    let entry = match json {
        Value::Array(items) => items.first()?,
        Value::Object(_) => json,
        _ => return None,
    };
    MunicipalityPrediction::deserialize(entry).ok()
}

/// `"2024-02-01T00:00:00"` or `"2024-02-01"` → date.
fn parse_day_date(fecha: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(fecha.trim().get(..10)?, "%Y-%m-%d").ok()
}

/// Scalar as trimmed text; one-element arrays (`"direccion": ["NE"]`) unwrap.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.first().and_then(value_text),
        _ => None,
    }
}

fn value_int(value: &Value) -> Option<i32> {
    let text = value_text(value)?;
    text.parse::<i32>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().map(|f| f.round() as i32))
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hourly_response(days: Value) -> Value {
        json!([{
            "origen": { "productor": "Agencia Estatal de Meteorología - AEMET" },
            "elaborado": "2024-02-01T10:05:12",
            "nombre": "Chipiona",
            "provincia": "Cádiz",
            "prediccion": { "dia": days },
            "id": "11016",
            "version": "1.0"
        }])
    }

    fn hours_of(forecast: &MunicipalityForecast) -> Vec<&str> {
        forecast.hours.iter().map(|h| h.datetime.as_str()).collect()
    }

    #[test]
    fn test_expand_single_hour() {
        assert_eq!(expand_period("07"), vec![7]);
        assert_eq!(expand_period("7"), vec![7]);
        assert!(expand_period("24").is_empty());
        assert!(expand_period("").is_empty());
        assert!(expand_period("xx").is_empty());
    }

    #[test]
    fn test_expand_concatenated_range_excludes_upper_bound() {
        assert_eq!(expand_period("0006"), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(expand_period("1224"), (12..24).collect::<Vec<_>>());
    }

    #[test]
    fn test_expand_hyphenated_range() {
        assert_eq!(expand_period("00-06"), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(expand_period("14-20"), vec![14, 15, 16, 17, 18, 19]);
    }

    #[test]
    fn test_expand_wrapping_range_covers_rest_of_day() {
        assert_eq!(expand_period("2002"), vec![20, 21, 22, 23]);
        assert_eq!(expand_period("00-30"), (0..24).collect::<Vec<_>>());
    }

    #[test]
    fn test_normalize_precip_amount() {
        assert_eq!(normalize_precip_amount("Ip"), "0");
        assert_eq!(normalize_precip_amount(""), "0");
        assert_eq!(normalize_precip_amount(" 0.4 "), "0.4");
    }

    #[test]
    fn test_one_record_per_temperature_hour() {
        let json = hourly_response(json!([{
            "fecha": "2024-02-01T00:00:00",
            "temperatura": [
                { "value": "12", "periodo": "00" },
                { "value": "11", "periodo": "01" },
                { "value": "11", "periodo": "02" }
            ],
            "humedadRelativa": [
                { "value": "80", "periodo": "00" },
                { "value": "82", "periodo": "05" }
            ]
        }]));
        let forecast = parse_hourly_forecast(&json);
        assert_eq!(
            hours_of(&forecast),
            vec!["2024-02-01T00:00:00", "2024-02-01T01:00:00", "2024-02-01T02:00:00"]
        );
        assert_eq!(forecast.hours[0].humidity, Some(80));
        assert_eq!(forecast.hours[1].humidity, None);
        assert_eq!(forecast.name, "Chipiona");
        assert_eq!(forecast.province, "Cádiz");
        assert_eq!(forecast.issued, "2024-02-01T10:05:12");
    }

    #[test]
    fn test_range_probability_expands_to_each_hour() {
        let temps: Vec<Value> = (0..8)
            .map(|h| json!({ "value": "15", "periodo": format!("{:02}", h) }))
            .collect();
        let json = hourly_response(json!([{
            "fecha": "2024-02-01T00:00:00",
            "temperatura": temps,
            "probPrecipitacion": [{ "value": "40", "periodo": "0006" }]
        }]));
        let forecast = parse_hourly_forecast(&json);
        for hour in &forecast.hours[..6] {
            assert_eq!(hour.precip_prob, Some(40), "hour {} should carry 40%", hour.datetime);
        }
        assert_eq!(forecast.hours[6].precip_prob, None, "hour 06 is outside 0006");
        assert_eq!(forecast.hours[7].precip_prob, None);
    }

    #[test]
    fn test_blank_probability_defaults_to_zero_and_suppresses_amount() {
        let json = hourly_response(json!([{
            "fecha": "2024-02-01T00:00:00",
            "temperatura": [{ "value": "15", "periodo": "03" }, { "value": "15", "periodo": "09" }],
            "precipitacion": [{ "value": "Ip", "periodo": "03" }, { "value": "1.2", "periodo": "09" }],
            "probPrecipitacion": [{ "value": "", "periodo": "02-08" }, { "value": "55", "periodo": "08-14" }]
        }]));
        let forecast = parse_hourly_forecast(&json);
        assert_eq!(forecast.hours[0].precip_prob, Some(0));
        assert_eq!(forecast.hours[0].precip_amount, None, "amount hidden at 0%");
        assert_eq!(forecast.hours[1].precip_prob, Some(55));
        assert_eq!(forecast.hours[1].precip_amount.as_deref(), Some("1.2"));
    }

    #[test]
    fn test_trace_precipitation_reads_as_zero() {
        let json = hourly_response(json!([{
            "fecha": "2024-02-01T00:00:00",
            "temperatura": [{ "value": "15", "periodo": "10" }],
            "precipitacion": [{ "value": "Ip", "periodo": "10" }],
            "probPrecipitacion": [{ "value": "20", "periodo": "0814" }]
        }]));
        let hour = &parse_hourly_forecast(&json).hours[0];
        assert_eq!(hour.precip_amount.as_deref(), Some("0"));
    }

    #[test]
    fn test_sky_keeps_code_and_description() {
        let json = hourly_response(json!([{
            "fecha": "2024-02-01T00:00:00",
            "temperatura": [{ "value": "9", "periodo": "22" }],
            "estadoCielo": [{ "value": "12n", "periodo": "22", "descripcion": "Poco nuboso" }]
        }]));
        let hour = &parse_hourly_forecast(&json).hours[0];
        assert_eq!(hour.sky_code.as_deref(), Some("12n"));
        assert_eq!(hour.sky_description.as_deref(), Some("Poco nuboso"));
    }

    #[test]
    fn test_separate_wind_and_gust_arrays() {
        let json = hourly_response(json!([{
            "fecha": "2024-02-01T00:00:00",
            "temperatura": [{ "value": "14", "periodo": "12" }, { "value": "14", "periodo": "13" }],
            "viento": [
                { "direccion": "SO", "velocidad": "20", "periodo": "12" },
                { "direccion": "", "velocidad": "", "periodo": "13" }
            ],
            "rachaMax": [{ "value": "45", "periodo": "12-14" }]
        }]));
        let forecast = parse_hourly_forecast(&json);
        assert_eq!(forecast.hours[0].wind_dir.as_deref(), Some("SO"));
        assert_eq!(forecast.hours[0].wind_speed, Some(20));
        assert_eq!(forecast.hours[0].wind_gust, Some(45));
        assert_eq!(forecast.hours[1].wind_dir, None, "blank wind entry is omitted");
        assert_eq!(forecast.hours[1].wind_speed, None);
        assert_eq!(forecast.hours[1].wind_gust, Some(45));
    }

    #[test]
    fn test_combined_wind_and_gust_array() {
        let json = hourly_response(json!([{
            "fecha": "2024-02-01T00:00:00",
            "temperatura": [{ "value": "14", "periodo": "07" }, { "value": "14", "periodo": "08" }],
            "vientoAndRachaMax": [
                { "direccion": ["NE"], "velocidad": ["9"], "periodo": "07" },
                { "value": "", "periodo": "07" },
                { "direccion": ["E"], "velocidad": ["12"], "periodo": "08" },
                { "value": "30", "periodo": "08" }
            ]
        }]));
        let forecast = parse_hourly_forecast(&json);
        assert_eq!(forecast.hours[0].wind_dir.as_deref(), Some("NE"));
        assert_eq!(forecast.hours[0].wind_gust, None, "blank gust stays absent");
        assert_eq!(forecast.hours[1].wind_speed, Some(12));
        assert_eq!(forecast.hours[1].wind_gust, Some(30));
    }

    #[test]
    fn test_days_concatenate_in_upstream_order() {
        let json = hourly_response(json!([
            { "fecha": "2024-02-01T00:00:00", "temperatura": [{ "value": "10", "periodo": "23" }] },
            { "fecha": "2024-02-02T00:00:00", "temperatura": [{ "value": "9", "periodo": "00" }] }
        ]));
        assert_eq!(
            hours_of(&parse_hourly_forecast(&json)),
            vec!["2024-02-01T23:00:00", "2024-02-02T00:00:00"]
        );
    }

    #[test]
    fn test_invalid_input_returns_empty_forecast() {
        assert_eq!(parse_hourly_forecast_bytes(b"not json"), MunicipalityForecast::empty(""));
        assert_eq!(parse_hourly_forecast(&json!([])), MunicipalityForecast::empty(""));
        assert_eq!(parse_hourly_forecast(&json!("text")), MunicipalityForecast::empty(""));
        let wrong_shape = hourly_response(json!([{ "fecha": "2024-02-01", "temperatura": "hot" }]));
        assert!(parse_hourly_forecast(&wrong_shape).hours.is_empty());
    }

    #[test]
    fn test_day_with_bad_date_is_skipped() {
        let json = hourly_response(json!([
            { "fecha": "mañana", "temperatura": [{ "value": "10", "periodo": "10" }] },
            { "fecha": "2024-02-02T00:00:00", "temperatura": [{ "value": "9", "periodo": "10" }] }
        ]));
        assert_eq!(hours_of(&parse_hourly_forecast(&json)), vec!["2024-02-02T10:00:00"]);
    }

    #[test]
    fn test_daily_prefers_whole_day_entries() {
        let json = json!([{
            "nombre": "Chipiona",
            "provincia": "Cádiz",
            "prediccion": { "dia": [
                {
                    "fecha": "2024-02-04T00:00:00",
                    "temperatura": { "maxima": 18, "minima": 9 },
                    "probPrecipitacion": [
                        { "value": 0, "periodo": "00-24" },
                        { "value": 10, "periodo": "00-12" }
                    ],
                    "estadoCielo": [
                        { "value": "", "periodo": "00-24", "descripcion": "" },
                        { "value": "14", "periodo": "00-12", "descripcion": "Nuboso" }
                    ],
                    "viento": [{ "direccion": "O", "velocidad": 15, "periodo": "00-24" }]
                },
                {
                    "fecha": "2024-02-05T00:00:00",
                    "temperatura": { "maxima": 20, "minima": 11 },
                    "probPrecipitacion": [{ "value": 35 }],
                    "estadoCielo": [{ "value": "11", "descripcion": "Despejado" }],
                    "viento": [{ "direccion": "C", "velocidad": 0 }]
                }
            ]}
        }]);
        let days = parse_daily_forecast(&json);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-02-04");
        assert_eq!(days[0].temp_max, Some(18));
        assert_eq!(days[0].temp_min, Some(9));
        assert_eq!(days[0].precip_prob, Some(0));
        assert_eq!(days[0].sky_description.as_deref(), Some("Nuboso"), "falls back past blank whole-day sky");
        assert_eq!(days[0].wind_dir.as_deref(), Some("O"));
        assert_eq!(days[0].wind_speed, Some(15));
        assert_eq!(days[1].precip_prob, Some(35));
        assert_eq!(days[1].sky_description.as_deref(), Some("Despejado"));
        assert_eq!(days[1].wind_arrow(), "○");
    }

    #[test]
    fn test_daily_invalid_input_is_empty() {
        assert!(parse_daily_forecast_bytes(b"").is_empty());
        assert!(parse_daily_forecast(&json!({ "prediccion": { "dia": "x" } })).is_empty());
    }
}
