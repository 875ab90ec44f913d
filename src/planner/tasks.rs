//! Task templates for the trip crew

use serde_json::{json, Value};

use super::agents::{
    CITY_SELECTION_EXPERT, EXPERT_TRAVEL_AGENT, LOCAL_TOUR_GUIDE, RESULT_STRUCTURING_EXPERT,
};
use crate::agents::error::AgentResult;
use crate::agents::task::{render_description, Task};
use crate::domain::TripRequest;

pub const TIP: &str = "Deliver detailed, complete responses to qualify for a quality bonus!";

pub const PLAN_ITINERARY: &str = "plan_itinerary";
pub const IDENTIFY_CITY: &str = "identify_city";
pub const GATHER_CITY_INFO: &str = "gather_city_info";
pub const STRUCTURE_INFO: &str = "structure_info";

const PLAN_ITINERARY_TEMPLATE: &str = r#"
    **Task**: Develop a 7-Day Travel Itinerary
    **Description**: Create a full 7-day itinerary for {{ cities_joined }}, including specific recommendations
    for restaurants, accommodations, and attractions that match the traveler's interests ({{ interests }}).
    Detail per-day activities with times and costs.

    **Parameters**:
    - Cities: {{ cities }}
    - Dates: {{ date_range }}
    - Interests: {{ interests }}

    **Note**: {{ tip }}
"#;

const IDENTIFY_CITY_TEMPLATE: &str = r#"
    **Task**: Identify the Best City for the Trip
    **Description**: Evaluate each city in {{ cities }} for weather, seasonal events, and travel expenses
    during {{ date_range }}. Recommend the top city with details on weather, flight costs, and highlights.

    **Parameters**:
    - Origin: {{ origin }}
    - Cities: {{ cities }}
    - Interests: {{ interests }}
    - Dates: {{ date_range }}

    **Note**: {{ tip }}
"#;

const GATHER_CITY_INFO_TEMPLATE: &str = r#"
    **Task**: Gather In-depth City Guide Information
    **Description**: Compile an in-depth city guide with key attractions, local customs,
    hidden gems, and high-level cost estimates in {{ cities }} for travel dates {{ date_range }}.

    **Parameters**:
    - Cities: {{ cities }}
    - Dates: {{ date_range }}
    - Interests: {{ interests }}

    **Note**: {{ tip }}
"#;

const STRUCTURE_INFO_TEMPLATE: &str = r#"
    **Task**: Structure All Trip Information into a Comprehensive Report
    **Description**: Organize all travel information into a single report covering itinerary,
    city guides, logistics, and travel tips. Ensure no placeholders are present, and all data is
    cohesive and complete for easy reading.

    **Parameters**:
    - Itinerary: the 7-day itinerary for {{ cities_joined }} given in the context
    - City Info: the city guide given in the context
    - Identified City: the recommended city given in the context

    **Note**: {{ tip }}
"#;

/// Renders the crew's tasks for one trip request
pub struct TravelTasks {
    values: Value,
}

impl TravelTasks {
    pub fn new(request: &TripRequest) -> Self {
        let quoted: Vec<String> = request.cities.iter().map(|c| format!("\"{}\"", c)).collect();

        Self {
            values: json!({
                "cities": format!("[{}]", quoted.join(", ")),
                "cities_joined": request.cities.join(", "),
                "origin": request.origin,
                "date_range": request.date_range,
                "interests": request.interests,
                "tip": TIP,
            }),
        }
    }

    pub fn plan_itinerary(&self) -> AgentResult<Task> {
        Ok(Task::new(
            PLAN_ITINERARY,
            EXPERT_TRAVEL_AGENT,
            render_description(PLAN_ITINERARY_TEMPLATE, &self.values)?,
            "A complete 7-day itinerary with per-day activities, times, costs, \
             restaurants, accommodations, a budget, packing suggestions and safety tips.",
        ))
    }

    pub fn identify_city(&self) -> AgentResult<Task> {
        Ok(Task::new(
            IDENTIFY_CITY,
            CITY_SELECTION_EXPERT,
            render_description(IDENTIFY_CITY_TEMPLATE, &self.values)?,
            "The recommended city with weather, flight costs, seasonal events and highlights.",
        ))
    }

    pub fn gather_city_info(&self) -> AgentResult<Task> {
        Ok(Task::new(
            GATHER_CITY_INFO,
            LOCAL_TOUR_GUIDE,
            render_description(GATHER_CITY_INFO_TEMPLATE, &self.values)?,
            "An in-depth city guide covering key attractions, local customs, \
             hidden gems and high-level cost estimates.",
        ))
    }

    pub fn structure_info(&self) -> AgentResult<Task> {
        Ok(Task::new(
            STRUCTURE_INFO,
            RESULT_STRUCTURING_EXPERT,
            render_description(STRUCTURE_INFO_TEMPLATE, &self.values)?,
            "A single cohesive travel report with the itinerary, city guide, logistics and travel tips.",
        )
        .with_context([PLAN_ITINERARY, IDENTIFY_CITY, GATHER_CITY_INFO]))
    }
}
