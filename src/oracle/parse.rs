use jsonschema::JSONSchema;
use serde_json::Value;

use crate::oracle::{
    error::{OracleError, malformed, refusal},
    types::Decision,
};

/// Schema the oracle's decision must satisfy before deserialization. Kind
/// names mirror the serde renames on `ActionKind`; the change object mirrors
/// the tagged `GoalChange` union.
pub fn decision_json_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "reasoning": { "type": "string" },
            "actions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "kind": {
                            "type": "string",
                            "enum": [
                                "observe",
                                "remember",
                                "rest",
                                "reflect",
                                "connect",
                                "inquire_shallow",
                                "inquire_deep",
                                "synthesize",
                                "brainstorm",
                                "reprioritize",
                                "reach_out_user",
                                "recalibrate"
                            ]
                        },
                        "params": { "type": "object" }
                    },
                    "required": ["kind"],
                    "additionalProperties": false
                }
            },
            "goal_changes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "goal_id": { "type": "string" },
                        "change": {
                            "type": "object",
                            "properties": {
                                "type": {
                                    "type": "string",
                                    "enum": [
                                        "create",
                                        "promote",
                                        "demote",
                                        "complete",
                                        "abandon",
                                        "log_progress",
                                        "block",
                                        "unblock",
                                        "reparent"
                                    ]
                                }
                            },
                            "required": ["type"]
                        }
                    },
                    "required": ["goal_id", "change"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["reasoning", "actions"],
        "additionalProperties": false
    })
}

/// Parses oracle output into a `Decision`, distinguishing refusals from
/// structural malformation so the scheduler can recover per taxonomy.
pub fn parse_decision(text: &str) -> Result<Decision, OracleError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| malformed(format!("decision is not valid json: {err}")))?;

    if let Some(reason) = value.get("refusal") {
        let message = reason
            .as_str()
            .unwrap_or("oracle declined to decide")
            .to_string();
        return Err(refusal(message));
    }

    let schema = decision_json_schema();
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| malformed(format!("decision schema failed to compile: {err}")))?;

    if let Err(errors) = compiled.validate(&value) {
        let messages: Vec<String> = errors.map(|error| error.to_string()).collect();
        return Err(malformed(format!(
            "decision violates schema: {}",
            messages.join("; ")
        )));
    }

    serde_json::from_value(value)
        .map_err(|err| malformed(format!("decision failed to deserialize: {err}")))
}
