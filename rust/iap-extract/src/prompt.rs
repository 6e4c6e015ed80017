//! Extraction prompt and response schema.
//!
//! Label lists are rendered from the `iap-core` taxonomies, so the labels
//! the model is told to use are exactly the ones the scorer knows.

use iap_core::{ActType, AddressMode, TargetRole};
use serde_json::{Value, json};

use crate::ExtractionRequest;

pub const SCHEMA_NAME: &str = "IAPActExtraction";

fn act_labels() -> Vec<&'static str> {
    ActType::ALL.iter().map(|t| t.as_str()).collect()
}

fn role_labels() -> Vec<&'static str> {
    TargetRole::ALL.iter().map(|r| r.as_str()).collect()
}

fn address_modes() -> Vec<&'static str> {
    [AddressMode::Direct, AddressMode::Reported, AddressMode::Monologue]
        .iter()
        .map(|m| m.as_str())
        .collect()
}

const GUIDANCE: &str = r#"Do NOT invent new labels. If unsure, choose the closest label from the list.

=== ASSERT is the LAST RESORT ===
ASSERT is a generic catch-all. Avoid it when a more specific type fits:
- 'only X / X is the one / no one else / must be X' -> ASSERT_CHOICE
- 'if not X / won't accept / can't have / refuse alternatives / じゃなきゃ' -> CLOSE_ESCAPE
- 'I want / I love / I like / I hate / 好き / 嫌い' -> EXPRESS
- 'No / That's wrong / Not true' -> DENY or DENY_ASSUMPTION
Use ASSERT only for plain factual statements without exclusivity, emotion, or negation.

=== act type examples ===
- 'I love you' / 'I want you' / '好き' / '嫌' -> EXPRESS
- 'Only you will do' / 'It has to be X' / 'Xがいい' -> ASSERT_CHOICE
- 'I refuse anyone else' / 'Xじゃなきゃ嫌' / 'won't have it' -> CLOSE_ESCAPE
- 'If you don't, I'll leave' -> ULTIMATUM
- 'I will always...' / 'I won't ever...' -> COMMIT
- 'No, that's not it' / 'You're wrong' -> DENY_ASSUMPTION
- 'We are friends now' / 'This is over' -> DECLARE

=== Must-include rule ===
If the utterance expresses emotion or desire (want, like, love, hate, 好き, 嫌), include an EXPRESS act even when other acts are present.
'I want you, Subaru-kun' yields BOTH EXPRESS (want) AND ASSERT_CHOICE (exclusive selection).

=== target_role vs target_entity ===
target_role: WHO the act is directed at. target_entity: WHAT or WHO specifically is mentioned or affected.
Someone addressed by name (vocative) is the LISTENER, not THIRD_PARTY:
- 'Subaru-kun, I choose you' -> LISTENER
- 'I told Subaru about it' -> THIRD_PARTY
- Japanese 〜くん/〜さん/〜ちゃん used as direct address -> LISTENER
- LISTENER: directed at the addressee
- SELF: about the speaker themselves
- THIRD_PARTY: about someone mentioned but not addressed
- SITUATION: a state, result or condition ('can't accept it', 'it's over')
- PROPOSITION: a claim, premise or assumption ('No, that's not it')
- ABSTRACT: a value or ideal ('freedom', 'the meaning of adventure')

=== address_mode (utterance level, separate from target_role) ===
- direct: the speaker addresses the listener in second person ('I love you')
- reported: third-person narration ('Rem loves Subaru', 'She wants him')
- monologue: self-talk or audience-less reflection
Judge by how the text SOUNDS in its own language: Japanese self-reference by name in direct speech (レムは〜) is direct, but English 'Rem loves...' reads as reported.

Return ONLY a single JSON object. No markdown, no explanations, no extra keys. The JSON must strictly match the provided schema."#;

/// The system message sent with every extraction.
pub fn system_prompt() -> String {
    format!(
        "You are an expert in pragmatics and speech act theory. \
         Extract the illocutionary acts performed by the utterance.\n\n\
         act type (primary_act and acts[].type) MUST be one of: [{}]\n\
         target_role MUST be one of: [{}]\n\n{}",
        act_labels().join(", "),
        role_labels().join(", "),
        GUIDANCE
    )
}

/// The user message for one request.
pub fn user_prompt(request: &ExtractionRequest) -> String {
    let mut parts = Vec::new();
    if let Some(language) = &request.language_hint {
        parts.push(format!("[language_hint] {language}"));
    }
    if let Some(context) = &request.context_hint {
        parts.push(format!("[context]\n{}", context.trim()));
    }
    parts.push(format!("[utterance]\n{}", request.text.trim()));
    parts.join("\n\n")
}

/// Strict JSON schema for the act set.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "primary_act": { "type": "string", "enum": act_labels() },
            "overall_force": { "type": "string" },
            "address_mode": {
                "type": "string",
                "enum": address_modes(),
                "description": "How the utterance addresses its audience: direct (2nd person), reported (3rd person narration), monologue (self-talk)"
            },
            "acts": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "type": { "type": "string", "enum": act_labels() },
                        "target_role": {
                            "type": "string",
                            "enum": role_labels(),
                            "description": "Who is the act directed at? LISTENER=addressee, SELF=speaker, THIRD_PARTY=someone else mentioned"
                        },
                        "target_entity": {
                            "type": "string",
                            "description": "The specific person/thing the act is about (e.g., 'Subaru-kun', 'alternatives', 'the truth')"
                        },
                        "force": { "type": "string" },
                        "intensity": { "type": "number", "minimum": 0, "maximum": 1 }
                    },
                    "required": ["type", "target_role", "target_entity", "force", "intensity"]
                }
            }
        },
        "required": ["primary_act", "overall_force", "address_mode", "acts"]
    })
}

/// The `response_format` value requesting [`response_schema`].
pub fn response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": SCHEMA_NAME,
            "schema": response_schema(),
            "strict": true
        }
    })
}
