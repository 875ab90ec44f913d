//! The four travel personas

use std::collections::HashMap;

use crate::adapters::{calculator, search};
use crate::agents::config::AgentConfig;

pub const EXPERT_TRAVEL_AGENT: &str = "expert_travel_agent";
pub const CITY_SELECTION_EXPERT: &str = "city_selection_expert";
pub const LOCAL_TOUR_GUIDE: &str = "local_tour_guide";
pub const RESULT_STRUCTURING_EXPERT: &str = "result_structuring_expert";

/// Builds the crew's personas, applying configured overrides by name
#[derive(Debug, Clone)]
pub struct TravelAgents {
    overrides: HashMap<String, AgentConfig>,
    max_iterations: u32,
}

impl TravelAgents {
    pub fn new(overrides: &[AgentConfig], max_iterations: u32) -> Self {
        let builtin = [
            EXPERT_TRAVEL_AGENT,
            CITY_SELECTION_EXPERT,
            LOCAL_TOUR_GUIDE,
            RESULT_STRUCTURING_EXPERT,
        ];

        let overrides = overrides
            .iter()
            .filter(|agent| {
                let known = builtin.contains(&agent.name.as_str());
                if !known {
                    tracing::warn!(agent = %agent.name, "Ignoring override for unknown persona");
                }
                known
            })
            .map(|agent| (agent.name.clone(), agent.clone()))
            .collect();

        Self {
            overrides,
            max_iterations,
        }
    }

    fn resolve(&self, persona: AgentConfig) -> AgentConfig {
        match self.overrides.get(&persona.name) {
            Some(custom) => custom.clone(),
            None => persona.with_max_iterations(self.max_iterations),
        }
    }

    pub fn expert_travel_agent(&self) -> AgentConfig {
        self.resolve(
            AgentConfig::new(
                EXPERT_TRAVEL_AGENT,
                "Expert Travel Agent",
                "Create a 7-day travel itinerary with detailed per-day plans, \
                 including budget, packing suggestions, and safety tips.",
                "Expert in travel planning and logistics. \
                 I have decades of experience making travel itineraries.",
            )
            .with_tools([search::TOOL_NAME, calculator::TOOL_NAME]),
        )
    }

    pub fn city_selection_expert(&self) -> AgentConfig {
        self.resolve(
            AgentConfig::new(
                CITY_SELECTION_EXPERT,
                "City Selection Expert",
                "Select the best cities based on weather, season, prices, and traveler interests",
                "Expert at analyzing travel data to pick ideal destinations",
            )
            .with_tools([search::TOOL_NAME]),
        )
    }

    pub fn local_tour_guide(&self) -> AgentConfig {
        self.resolve(
            AgentConfig::new(
                LOCAL_TOUR_GUIDE,
                "Local Tour Guide",
                "Provide the BEST insights about the selected city",
                "Knowledgeable local guide with extensive information \
                 about the city, its attractions, and customs",
            )
            .with_tools([search::TOOL_NAME]),
        )
    }

    pub fn result_structuring_expert(&self) -> AgentConfig {
        self.resolve(
            AgentConfig::new(
                RESULT_STRUCTURING_EXPERT,
                "Result Structuring Expert",
                "Structure the gathered travel information into a comprehensive report, \
                 including a 7-day itinerary, city details, and recommendations. Ensure the report \
                 is organized, easy to read, and covers all relevant aspects of the trip.",
                "Experienced report writer and travel document organizer. \
                 I have expertise in structuring and presenting information in an easy-to-read, \
                 cohesive format that covers all details and ensures clarity.",
            )
            .with_tools([calculator::TOOL_NAME]),
        )
    }

    /// Every persona in crew order
    pub fn all(&self) -> Vec<AgentConfig> {
        vec![
            self.expert_travel_agent(),
            self.city_selection_expert(),
            self.local_tour_guide(),
            self.result_structuring_expert(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personas_and_tools() {
        let agents = TravelAgents::new(&[], 10);
        let all = agents.all();
        assert_eq!(all.len(), 4);

        let expert = &all[0];
        assert_eq!(expert.role, "Expert Travel Agent");
        assert_eq!(expert.tools, vec!["search_internet", "calculate"]);
        assert_eq!(all[1].tools, vec!["search_internet"]);
        assert_eq!(all[2].tools, vec!["search_internet"]);
        assert_eq!(all[3].tools, vec!["calculate"]);
        assert!(all.iter().all(|a| a.max_iterations == 10));
    }

    #[test]
    fn test_backstory_has_single_spaces() {
        let expert = TravelAgents::new(&[], 10).expert_travel_agent();
        assert_eq!(
            expert.backstory,
            "Expert in travel planning and logistics. I have decades of experience making travel itineraries."
        );
    }

    #[test]
    fn test_override_replaces_persona() {
        let custom = AgentConfig::new(LOCAL_TOUR_GUIDE, "Food Guide", "Find great food", "Chef.")
            .with_tools([search::TOOL_NAME])
            .with_max_iterations(3);
        let unknown = AgentConfig::new("pilot", "Pilot", "Fly", "Pilot.");

        let agents = TravelAgents::new(&[custom, unknown], 10);
        let guide = agents.local_tour_guide();
        assert_eq!(guide.role, "Food Guide");
        assert_eq!(guide.max_iterations, 3);
        assert!(agents.all().iter().all(|a| a.name != "pilot"));
    }
}
