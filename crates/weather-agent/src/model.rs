//! Domain Models
//!
//! Request and report types. The report's shape doubles as the agent's
//! strict structured-output schema.

use agent_core::schema::{ObjectShape, Shape, Shaped};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WeatherError};

/// Weather for `count` suburbs within `distance` km of `location`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherRequest {
    pub count: u32,

    /// Radius in kilometres
    pub distance: f64,

    pub location: String,
}

impl WeatherRequest {
    pub fn new(count: u32, distance: f64, location: impl Into<String>) -> Self {
        Self {
            count,
            distance,
            location: location.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(WeatherError::InvalidRequest("count must be at least 1".into()));
        }
        if !(self.distance.is_finite() && self.distance > 0.0) {
            return Err(WeatherError::InvalidRequest("distance must be a positive number".into()));
        }
        if self.location.trim().is_empty() {
            return Err(WeatherError::InvalidRequest("location is required".into()));
        }
        Ok(())
    }

    /// The user message sent to the agent
    pub fn prompt(&self) -> String {
        format!(
            "Provide the weather for {} suburbs within {}km of {}",
            self.count, self.distance, self.location
        )
    }
}

/// Weather at one suburb
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputWeather {
    pub country: String,
    pub state: String,
    pub suburb: String,
    pub degrees_c: f64,
}

impl Shaped for OutputWeather {
    fn shape() -> Shape {
        ObjectShape::new("OutputWeather")
            .field("country", Shape::String)
            .field("state", Shape::String)
            .field("suburb", Shape::String)
            .field("degrees_c", Shape::Number)
            .build()
    }
}

/// Final agent output
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub weather: Vec<OutputWeather>,
}

impl WeatherReport {
    pub fn suburbs(&self) -> impl Iterator<Item = &str> {
        self.weather.iter().map(|w| w.suburb.as_str())
    }
}

impl Shaped for WeatherReport {
    fn shape() -> Shape {
        ObjectShape::new("WeatherReport")
            .describe("Details about the weather")
            .described_field(
                "weather",
                Shape::array(OutputWeather::shape()),
                "An array of weather at locations",
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::schema::{check_shape, decode_structured, schema_for};

    #[test]
    fn test_prompt() {
        let request = WeatherRequest::new(3, 15.0, "Testville");
        assert_eq!(
            request.prompt(),
            "Provide the weather for 3 suburbs within 15km of Testville"
        );
    }

    #[test]
    fn test_request_validation() {
        assert!(WeatherRequest::new(3, 15.0, "Testville").validate().is_ok());
        assert!(WeatherRequest::new(0, 15.0, "Testville").validate().is_err());
        assert!(WeatherRequest::new(3, -1.0, "Testville").validate().is_err());
        assert!(WeatherRequest::new(3, 15.0, "  ").validate().is_err());
    }

    #[test]
    fn test_report_schema() {
        let schema = schema_for::<WeatherReport>();
        assert_eq!(schema["required"], serde_json::json!(["weather"]));
        let item = &schema["properties"]["weather"]["items"];
        assert_eq!(
            item["required"],
            serde_json::json!(["country", "state", "suburb", "degrees_c"])
        );
        assert_eq!(item["additionalProperties"], serde_json::json!(false));
    }

    #[test]
    fn test_report_rejects_extra_fields() {
        let payload = r#"{"weather": [{"country": "AU", "state": "VIC", "suburb": "Carlton", "degrees_c": 20, "wind": 3}]}"#;
        assert!(decode_structured::<WeatherReport>(payload).is_err());
    }

    #[test]
    fn test_shapes_match_serde() {
        let carlton = OutputWeather {
            country: "Australia".into(),
            state: "Victoria".into(),
            suburb: "Carlton".into(),
            degrees_c: 21.5,
        };
        check_shape(&carlton).unwrap();
        check_shape(&WeatherReport { weather: vec![carlton] }).unwrap();
        check_shape(&WeatherReport { weather: vec![] }).unwrap();
    }
}
