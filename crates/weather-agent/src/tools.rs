//! Weather Tools
//!
//! `GetWeather` reads a temperature for one location. `AskOperator` lets the
//! model escalate a question to a person when the request is unclear.

use std::sync::Arc;

use agent_core::schema::{ObjectShape, Shape, Shaped};
use agent_core::tool::ToolRegistry;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::source::TemperatureSource;

pub const GET_WEATHER: &str = "GetWeather";
pub const ASK_OPERATOR: &str = "AskOperator";

/// Arguments of `GetWeather`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetWeatherRequest {
    pub location: String,
}

impl Shaped for GetWeatherRequest {
    fn shape() -> Shape {
        ObjectShape::new("GetWeatherRequest")
            .describe("Get the current temperature in degrees Celsius at a location")
            .described_field("location", Shape::String, "Suburb or town name")
            .build()
    }
}

/// Build the weather tool registry
pub fn weather_tools(source: Arc<dyn TemperatureSource>, escalation: bool) -> Result<ToolRegistry> {
    let mut tools = ToolRegistry::new();

    tools.register_async(GET_WEATHER, move |request: GetWeatherRequest| {
        let source = source.clone();
        async move {
            let degrees = source.temperature(&request.location).await?;
            tracing::debug!(location = %request.location, degrees, source = source.name(), "Temperature read");
            Ok::<_, anyhow::Error>(degrees)
        }
    })?;

    if escalation {
        tools.register_escalation(ASK_OPERATOR)?;
    }

    Ok(tools)
}
