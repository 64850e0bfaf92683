use crate::oracle::types::DecisionRequest;

pub struct DecisionPrompt {
    pub system: String,
    pub user: String,
}

pub fn build_decision_prompt(request: &DecisionRequest) -> DecisionPrompt {
    let system = concat!(
        "You are the decision layer of an autonomous assistant heartbeat. ",
        "Given the context bundle, answer with a single JSON object: ",
        "{\"reasoning\": string, \"actions\": [{\"kind\": string, \"params\": object}], ",
        "\"goal_changes\": [{\"goal_id\": string, \"change\": {\"type\": string, ...}}]}. ",
        "List actions in priority order; only the affordable prefix will run. ",
        "Use only action kinds from the supplied catalog and stay within the ",
        "available energy. Reply with JSON only."
    )
    .to_string();

    let user = serde_json::to_string_pretty(request)
        .unwrap_or_else(|_| "{\"error\":\"context serialization failed\"}".to_string());

    DecisionPrompt { system, user }
}
