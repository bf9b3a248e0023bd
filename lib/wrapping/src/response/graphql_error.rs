use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<GraphQLErrorLocation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<GraphQLErrorPathSegment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl From<String> for GraphQLError {
    fn from(message: String) -> Self {
        GraphQLError {
            message,
            locations: None,
            path: None,
            extensions: None,
        }
    }
}

impl From<&str> for GraphQLError {
    fn from(message: &str) -> Self {
        message.to_string().into()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphQLErrorLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GraphQLErrorPathSegment {
    String(String),
    Index(usize),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{GraphQLError, GraphQLErrorPathSegment};

    #[test]
    fn deserializes_mixed_path_segments() {
        let error: GraphQLError = serde_json::from_value(json!({
            "message": "boom",
            "path": ["users", 1, "name"]
        }))
        .expect("to deserialize");

        assert_eq!(
            error.path,
            Some(vec![
                GraphQLErrorPathSegment::String("users".to_string()),
                GraphQLErrorPathSegment::Index(1),
                GraphQLErrorPathSegment::String("name".to_string()),
            ])
        );
        assert_eq!(
            serde_json::to_value(&error).expect("to serialize"),
            json!({ "message": "boom", "path": ["users", 1, "name"] })
        );
    }
}
