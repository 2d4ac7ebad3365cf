use super::base::BaseFields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Referenced only by id; other attributes are carried verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub base: BaseFields,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        let mut user = Self::default();
        user.attributes
            .insert("email".to_string(), Value::String(email.into()));
        user
    }
}
