//! Turns a reading and its city's history into the ordered dashboard panels.
//!
//! Everything here is a pure function of its inputs. The browser only draws
//! what these structures describe.

pub mod stats;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{db::models::HistoricalRecord, weather::models::WeatherReading};

use self::stats::{Bin, DensityPoint, HISTOGRAM_BINS};

pub const NOT_AVAILABLE: &str = "N/A";
pub const MAP_ZOOM: u8 = 10;
pub const MAP_TILES: &str = "OpenStreetMap";
/// Bar width of the grouped comparison chart, in category units.
pub const BAR_WIDTH: f64 = 0.3;

// ---------------------------------------------------------------------------
// Metric selector
// ---------------------------------------------------------------------------

/// Historical measurement a chart is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Temperature,
    Humidity,
    WindSpeed,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Humidity, Metric::WindSpeed];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::WindSpeed => "Wind Speed",
        }
    }

    /// Axis / legend label including the unit.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature (°C)",
            Metric::Humidity => "Humidity (%)",
            Metric::WindSpeed => "Wind Speed (m/s)",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Metric::Temperature => "blue",
            Metric::Humidity => "green",
            Metric::WindSpeed => "red",
        }
    }

    fn trend_title(self, city: &str) -> String {
        match self {
            Metric::Temperature => format!("{city} Temperature Trend"),
            Metric::Humidity => format!("{city} Humidity Levels"),
            Metric::WindSpeed => format!("{city} Wind Speed Trends"),
        }
    }

    pub fn value(self, record: &HistoricalRecord) -> Option<f64> {
        match self {
            Metric::Temperature => record.temperature,
            Metric::Humidity => record.humidity,
            Metric::WindSpeed => record.wind_speed,
        }
    }
}

// ---------------------------------------------------------------------------
// Current conditions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MetricPanel {
    pub label: String,
    pub value: Option<f64>,
    pub unit: String,
    /// `"21.5°C"`, or `"N/A"` when the value is absent.
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapPanel {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub tiles: String,
    pub marker: MapMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CurrentPanels {
    pub city: String,
    /// Temperature, wind speed, humidity, pressure, in that order.
    pub metrics: Vec<MetricPanel>,
    /// Absent unless the reading carries both coordinates.
    pub map: Option<MapPanel>,
}

pub fn render_current(reading: &WeatherReading) -> CurrentPanels {
    let metrics = [
        ("Temperature", reading.temperature, "°C"),
        ("Wind Speed", reading.wind_speed, "m/s"),
        ("Humidity", reading.humidity, "%"),
        ("Pressure", reading.pressure, "hPa"),
    ]
    .into_iter()
    .map(|(label, value, unit)| MetricPanel {
        label: label.to_owned(),
        value,
        unit: unit.to_owned(),
        display: value
            .map(|v| format!("{v}{unit}"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
    })
    .collect();

    let map = reading.coordinates().map(|(latitude, longitude)| MapPanel {
        latitude,
        longitude,
        zoom: MAP_ZOOM,
        tiles: MAP_TILES.to_owned(),
        marker: MapMarker {
            latitude,
            longitude,
            popup: format!("{} Weather", reading.city),
        },
    });

    CurrentPanels {
        city: reading.city.clone(),
        metrics,
        map,
    }
}

// ---------------------------------------------------------------------------
// History charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SeriesPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
}

/// Connected-point line plot of one metric against date.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BarSeries {
    pub label: String,
    pub color: String,
    /// Horizontal offset from the category centre.
    pub offset: f64,
    /// One entry per category; `None` leaves a gap.
    pub values: Vec<Option<f64>>,
}

/// Temperature, humidity and wind speed bars side by side per date.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GroupedBarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bar_width: f64,
    pub categories: Vec<DateTime<Utc>>,
    pub series: Vec<BarSeries>,
}

/// Histogram with an optional density curve on the same count axis.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DistributionChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: String,
    pub bins: Vec<Bin>,
    /// `None` when fewer than two distinct values exist.
    pub density: Option<Vec<DensityPoint>>,
}

/// Shown in place of a chart that has nothing to plot.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Placeholder {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Line(LineChart),
    GroupedBar(GroupedBarChart),
    Distribution(DistributionChart),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HistoryPanels {
    pub title: String,
    /// Every record, in store order.
    pub table: Vec<HistoricalRecord>,
    /// Three line charts, one grouped bar chart, three distributions.
    pub charts: Vec<Chart>,
}

pub fn render_history(city: &str, records: &[HistoricalRecord]) -> HistoryPanels {
    let mut charts: Vec<Chart> = Metric::ALL
        .iter()
        .map(|&m| time_series(city, records, m))
        .collect();
    charts.push(grouped_bars(city, records));
    charts.extend(Metric::ALL.iter().map(|&m| distribution(city, records, m)));

    HistoryPanels {
        title: format!("{city} Historical Weather Data"),
        table: records.to_vec(),
        charts,
    }
}

/// Line chart of `metric` over time. Records missing the metric are skipped.
pub fn time_series(city: &str, records: &[HistoricalRecord], metric: Metric) -> Chart {
    let title = metric.trend_title(city);
    let points: Vec<SeriesPoint> = records
        .iter()
        .filter_map(|r| metric.value(r).map(|value| SeriesPoint { date: r.date, value }))
        .collect();

    if points.is_empty() {
        return insufficient(title, metric);
    }

    Chart::Line(LineChart {
        title,
        x_label: "Date".to_owned(),
        y_label: metric.label().to_owned(),
        color: metric.color().to_owned(),
        points,
    })
}

/// Histogram plus density estimate of `metric` across all records.
pub fn distribution(city: &str, records: &[HistoricalRecord], metric: Metric) -> Chart {
    let title = format!("{} Distribution in {city}", metric.name());
    let values: Vec<f64> = records.iter().filter_map(|r| metric.value(r)).collect();

    let bins = stats::histogram(&values, HISTOGRAM_BINS);
    let Some(first) = bins.first() else {
        return insufficient(title, metric);
    };
    let bin_width = first.end - first.start;

    Chart::Distribution(DistributionChart {
        title,
        x_label: metric.label().to_owned(),
        y_label: "Frequency".to_owned(),
        color: metric.color().to_owned(),
        density: stats::density(&values, bin_width),
        bins,
    })
}

pub fn grouped_bars(city: &str, records: &[HistoricalRecord]) -> Chart {
    let title = format!("{city} Weather Metrics Comparison");
    if records.is_empty() {
        return Chart::Placeholder(Placeholder {
            title,
            message: "No historical readings to compare yet.".to_owned(),
        });
    }

    let series = Metric::ALL
        .iter()
        .zip([-BAR_WIDTH, 0.0, BAR_WIDTH])
        .map(|(&m, offset)| BarSeries {
            label: m.label().to_owned(),
            color: m.color().to_owned(),
            offset,
            values: records.iter().map(|r| m.value(r)).collect(),
        })
        .collect();

    Chart::GroupedBar(GroupedBarChart {
        title,
        x_label: "Date".to_owned(),
        y_label: "Values".to_owned(),
        bar_width: BAR_WIDTH,
        categories: records.iter().map(|r| r.date).collect(),
        series,
    })
}

fn insufficient(title: String, metric: Metric) -> Chart {
    Chart::Placeholder(Placeholder {
        title,
        message: format!("No {} values recorded yet.", metric.name().to_lowercase()),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
