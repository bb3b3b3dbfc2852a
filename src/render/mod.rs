/// Text rendering for the results panel and the detail view
use crate::domain::{FetchMeta, Quake};
use crate::state::ViewState;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt::Write;

/// Stand-in for any missing optional field
pub const PLACEHOLDER: &str = "—";

const UTC_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// One table row of the results list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuakeRow {
    pub id: String,
    pub mag: String,
    pub place: String,
    pub time: String,
    pub depth: String,
}

impl QuakeRow {
    pub fn from_quake(quake: &Quake) -> Self {
        Self {
            id: quake.id.clone(),
            mag: format_mag(quake.mag),
            place: or_placeholder(quake.place.as_deref()),
            time: format_time(quake.time.as_deref()),
            depth: format_opt(quake.depth_km),
        }
    }
}

/// Fields shown in the detail overlay for the selected record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuakeDetail {
    pub title: String,
    pub time: String,
    pub depth: String,
    pub coordinates: String,
    pub significance: String,
    pub felt: String,
    pub tsunami: String,
    pub link: Option<String>,
}

impl QuakeDetail {
    pub fn from_quake(quake: &Quake) -> Self {
        Self {
            title: format!(
                "M {} {} {}",
                format_mag(quake.mag),
                PLACEHOLDER,
                or_placeholder(quake.place.as_deref())
            ),
            time: format_time(quake.time.as_deref()),
            depth: format!("{} km", format_opt(quake.depth_km)),
            coordinates: format_coordinates(quake.latitude, quake.longitude),
            significance: format_opt(quake.sig),
            felt: format_opt(quake.felt),
            tsunami: match quake.tsunami {
                Some(0) => "No".to_string(),
                Some(_) => "Yes".to_string(),
                None => PLACEHOLDER.to_string(),
            },
            link: quake.url.clone(),
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Event details");
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "  Time (UTC):   {}", self.time);
        let _ = writeln!(out, "  Depth:        {}", self.depth);
        let _ = writeln!(out, "  Coordinates:  {}", self.coordinates);
        let _ = writeln!(out, "  Significance: {}", self.significance);
        let _ = writeln!(out, "  Felt reports: {}", self.felt);
        let _ = writeln!(out, "  Tsunami:      {}", self.tsunami);
        if let Some(link) = &self.link {
            let _ = writeln!(out, "  Official record: {}", link);
        }
        out
    }
}

/// One decimal place, exact ties rounded away from zero.
///
/// A tie at one decimal is only exactly representable as an odd number of quarters
/// (x.25, x.75); `{:.1}` would round those to even.
pub fn format_mag(mag: f64) -> String {
    let quarters = mag * 4.0;
    if mag.is_finite() && quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return format!("{:.1}", mag + mag.signum() * 0.025);
    }
    format!("{:.1}", mag)
}

/// Timestamps render in UTC; anything unparseable is shown as received
pub fn format_time(time: Option<&str>) -> String {
    match time {
        Some(raw) => match parse_timestamp(raw) {
            Some(dt) => dt.format(UTC_FORMAT).to_string(),
            None => raw.to_string(),
        },
        None => PLACEHOLDER.to_string(),
    }
}

/// ISO-8601 with an offset, or without one (read as UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ndt| ndt.and_utc())
}

/// Each missing coordinate is replaced independently
pub fn format_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> String {
    format!("{}, {}", format_opt(latitude), format_opt(longitude))
}

/// Summary line above the table; `count` is the server figure, not the row count
pub fn meta_line(meta: &FetchMeta) -> String {
    format!(
        "Showing {} records • generated {}",
        meta.count,
        format_time(Some(&meta.generated_at))
    )
}

/// Text for whichever panel the view state selects
pub fn render_panel(view: &ViewState<'_>) -> String {
    match view {
        ViewState::Error(message) => format!("Data load failed\n{}\n", message),
        ViewState::Loading => "Loading…\n".to_string(),
        ViewState::Empty => "No results match the current filters.\n".to_string(),
        ViewState::Populated(result) => {
            let mut out = String::new();
            let _ = writeln!(out, "{}", meta_line(&result.meta));
            let _ = writeln!(
                out,
                "{:>5}  {:<40}  {:<29}  {:>10}",
                "Mag", "Location", "Time (UTC)", "Depth (km)"
            );
            for row in result.items.iter().map(QuakeRow::from_quake) {
                let _ = writeln!(
                    out,
                    "{:>5}  {:<40}  {:<29}  {:>10}",
                    row.mag, row.place, row.time, row.depth
                );
            }
            out
        }
    }
}

fn or_placeholder(value: Option<&str>) -> String {
    value.unwrap_or(PLACEHOLDER).to_string()
}

fn format_opt<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
