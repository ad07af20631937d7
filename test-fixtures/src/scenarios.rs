use serde::Deserialize;

use standardgpt_core::models::RouteDecision;

/// One golden routing scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingScenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub input: ScenarioInput,
    pub expected_output: ScenarioExpectation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioInput {
    pub question: String,
    #[serde(default)]
    pub turns: Vec<ScenarioTurn>,
    /// Scripted reply of the classify call; `None` means it must not be called.
    #[serde(default)]
    pub classifier_reply: Option<String>,
    /// Scripted reply of the memory extraction call, if it is expected.
    #[serde(default)]
    pub memory_extraction_reply: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioTurn {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioExpectation {
    pub route: RouteDecision,
    /// Effective route after memory resolution.
    pub effective_route: RouteDecision,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub classifier_called: bool,
}
