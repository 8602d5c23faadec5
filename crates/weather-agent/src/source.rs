//! Temperature Sources
//!
//! Where the `GetWeather` tool reads temperatures from. Implement
//! `TemperatureSource` for a real weather service.

use std::collections::HashMap;

use async_trait::async_trait;
use rand::Rng;

use crate::error::{Result, WeatherError};

/// Temperature source trait (Strategy pattern)
#[async_trait]
pub trait TemperatureSource: Send + Sync {
    /// Current temperature at `location`, in degrees Celsius
    async fn temperature(&self, location: &str) -> Result<f64>;

    /// Source name for logs
    fn name(&self) -> &str;
}

/// Uniformly random temperatures in `[min, max)`
#[derive(Clone, Debug)]
pub struct RandomTemperature {
    min: f64,
    max: f64,
}

impl Default for RandomTemperature {
    fn default() -> Self {
        Self { min: 10.0, max: 30.0 }
    }
}

impl RandomTemperature {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(WeatherError::Config(format!(
                "temperature range {}..{} is empty",
                min, max
            )));
        }
        Ok(Self { min, max })
    }
}

#[async_trait]
impl TemperatureSource for RandomTemperature {
    async fn temperature(&self, _location: &str) -> Result<f64> {
        Ok(rand::thread_rng().gen_range(self.min..self.max))
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Fixed temperatures, with an optional fallback for unknown locations
#[derive(Clone, Debug, Default)]
pub struct FixedTemperature {
    readings: HashMap<String, f64>,
    fallback: Option<f64>,
}

impl FixedTemperature {
    /// Every location reads `degrees_c`
    pub fn everywhere(degrees_c: f64) -> Self {
        Self {
            readings: HashMap::new(),
            fallback: Some(degrees_c),
        }
    }

    pub fn with_reading(mut self, location: impl Into<String>, degrees_c: f64) -> Self {
        self.readings.insert(location.into().to_lowercase(), degrees_c);
        self
    }
}

#[async_trait]
impl TemperatureSource for FixedTemperature {
    async fn temperature(&self, location: &str) -> Result<f64> {
        self.readings
            .get(&location.to_lowercase())
            .copied()
            .or(self.fallback)
            .ok_or_else(|| WeatherError::TemperatureUnavailable(location.to_string()))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_random_stays_in_range() {
        let source = RandomTemperature::default();
        for _ in 0..100 {
            let t = source.temperature("Carlton").await.unwrap();
            assert!((10.0..30.0).contains(&t));
        }
    }

    #[test]
    fn test_random_rejects_empty_range() {
        assert!(RandomTemperature::new(20.0, 20.0).is_err());
    }

    #[tokio::test]
    async fn test_fixed_lookup() {
        let source = FixedTemperature::default().with_reading("Carlton", 18.5);
        assert_eq!(source.temperature("carlton").await.unwrap(), 18.5);
        assert!(matches!(
            source.temperature("Fitzroy").await,
            Err(WeatherError::TemperatureUnavailable(_))
        ));

        let everywhere = FixedTemperature::everywhere(21.0);
        assert_eq!(everywhere.temperature("Anywhere").await.unwrap(), 21.0);
    }
}
