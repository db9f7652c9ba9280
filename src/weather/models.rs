use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WeatherReading: normalised observation handed to the store and renderer
// ---------------------------------------------------------------------------

/// One point-in-time observation for one city.
///
/// Every measurement is optional: a field the provider did not return stays
/// `None` and is never defaulted to zero. The timestamp is assigned by the
/// store on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// City exactly as entered by the user.
    pub city: String,
    /// Degrees Celsius
    pub temperature: Option<f64>,
    /// Relative humidity percentage
    pub humidity: Option<f64>,
    /// Metres per second
    pub wind_speed: Option<f64>,
    /// Hectopascals
    pub pressure: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl WeatherReading {
    /// `true` when the provider returned no measurement and no coordinate.
    pub fn is_empty(&self) -> bool {
        [
            self.temperature,
            self.humidity,
            self.wind_speed,
            self.pressure,
            self.latitude,
            self.longitude,
        ]
        .iter()
        .all(Option::is_none)
    }

    /// Both coordinates, or `None` if either is missing.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

// ---------------------------------------------------------------------------
// OpenWeatherMap current weather: GET /data/2.5/weather
//
// Success (abridged):
//   { "coord": {"lon": 2.35, "lat": 48.85},
//     "main":  {"temp": 21.5, "pressure": 1012, "humidity": 60, ...},
//     "wind":  {"speed": 3.2, "deg": 240},
//     "name":  "Paris", "cod": 200, ... }
//
// Failure:
//   { "cod": "404", "message": "city not found" }
//
// `cod` is an integer on success and a string on failure, so it is not
// modelled; the HTTP status is authoritative.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub coord: Option<Coord>,
    pub main: Option<MainBlock>,
    pub wind: Option<Wind>,
    /// Provider's canonical name for the location. Informational only.
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Coord {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MainBlock {
    pub temp: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    pub speed: Option<f64>,
}

/// Body returned alongside a non-success status.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

impl CurrentWeatherResponse {
    /// Map the provider payload onto a reading for `city`.
    pub fn into_reading(self, city: &str) -> WeatherReading {
        let (latitude, longitude) = self
            .coord
            .map(|c| (c.lat, c.lon))
            .unwrap_or((None, None));
        let (temperature, humidity, pressure) = self
            .main
            .map(|m| (m.temp, m.humidity, m.pressure))
            .unwrap_or((None, None, None));

        WeatherReading {
            city: city.to_owned(),
            temperature,
            humidity,
            wind_speed: self.wind.and_then(|w| w.speed),
            pressure,
            latitude,
            longitude,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: &str = r#"{
        "coord": {"lon": 2.35, "lat": 48.85},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "base": "stations",
        "main": {"temp": 21.5, "feels_like": 21.1, "temp_min": 20.0, "temp_max": 23.0,
                 "pressure": 1012, "humidity": 60},
        "visibility": 10000,
        "wind": {"speed": 3.2, "deg": 240},
        "clouds": {"all": 0},
        "dt": 1718000000,
        "name": "Paris",
        "cod": 200
    }"#;

    #[test]
    fn full_response_maps_every_field() {
        let resp: CurrentWeatherResponse = serde_json::from_str(PARIS).unwrap();
        assert_eq!(resp.name.as_deref(), Some("Paris"));

        let r = resp.into_reading("Paris");
        assert_eq!(r.city, "Paris");
        assert_eq!(r.temperature, Some(21.5));
        assert_eq!(r.humidity, Some(60.0));
        assert_eq!(r.wind_speed, Some(3.2));
        assert_eq!(r.pressure, Some(1012.0));
        assert_eq!(r.coordinates(), Some((48.85, 2.35)));
        assert!(!r.is_empty());
    }

    #[test]
    fn missing_blocks_stay_absent_not_zero() {
        let resp: CurrentWeatherResponse =
            serde_json::from_str(r#"{"main": {"temp": 0.0}, "name": "Oslo"}"#).unwrap();
        let r = resp.into_reading("Oslo");
        assert_eq!(r.temperature, Some(0.0));
        assert_eq!(r.humidity, None);
        assert_eq!(r.wind_speed, None);
        assert_eq!(r.pressure, None);
        assert_eq!(r.coordinates(), None);
    }

    #[test]
    fn single_coordinate_yields_no_coordinates() {
        let resp: CurrentWeatherResponse =
            serde_json::from_str(r#"{"coord": {"lat": 10.0}, "wind": {"speed": 1.0}}"#).unwrap();
        let r = resp.into_reading("Somewhere");
        assert_eq!(r.latitude, Some(10.0));
        assert_eq!(r.coordinates(), None);
    }

    #[test]
    fn empty_object_is_an_empty_reading() {
        let resp: CurrentWeatherResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_reading("Nowhere").is_empty());
    }

    #[test]
    fn city_is_kept_as_entered() {
        let resp: CurrentWeatherResponse = serde_json::from_str(PARIS).unwrap();
        let r = resp.into_reading("paris ");
        assert_eq!(r.city, "paris ");
    }

    #[test]
    fn error_body_message_is_read() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"cod": "404", "message": "city not found"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("city not found"));
    }
}
