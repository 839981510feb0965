use serde::{Deserialize, Serialize};

use crate::domain::EntityId;

/// A note or todo as it travels over the wire: `{"_id": ..., "text": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "_id")]
    pub id: EntityId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEntityRequest {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_uses_underscore_id_on_the_wire() {
        let entity = Entity {
            id: EntityId::new("abc123"),
            text: "Buy milk".to_string(),
        };
        let json = serde_json::to_value(&entity).expect("json");
        assert_eq!(json, serde_json::json!({ "_id": "abc123", "text": "Buy milk" }));
    }

    #[test]
    fn entity_ignores_extra_server_fields() {
        let parsed: Entity =
            serde_json::from_str(r#"{"_id":"x1","text":"hi","created_at":"2024-01-01"}"#)
                .expect("entity");
        assert_eq!(parsed.id.as_str(), "x1");
        assert_eq!(parsed.text, "hi");
    }
}
