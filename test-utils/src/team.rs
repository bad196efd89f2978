use crate::uuid;
use serde_json::{json, Value};
use std::collections::HashMap;

/// A team whose name and member ids carry a unique suffix, so tests can share
/// one server.
#[derive(Debug, Clone)]
pub struct TestTeam {
    pub name: String,
    members: Vec<(String, String, bool)>,
    ids: HashMap<String, String>,
}

impl TestTeam {
    pub(crate) fn new(members: &[(&str, bool)]) -> Self {
        let suffix = uuid();

        let members: Vec<_> = members
            .iter()
            .map(|&(name, is_active)| (name.to_owned(), format!("{}-{}", name, suffix), is_active))
            .collect();

        let ids = members
            .iter()
            .map(|(name, id, _)| (name.clone(), id.clone()))
            .collect();

        TestTeam {
            name: format!("team-{}", suffix),
            members,
            ids,
        }
    }

    /// Id of the member created as `name`.
    #[track_caller]
    pub fn id(&self, name: &str) -> String {
        self.ids
            .get(name)
            .unwrap_or_else(|| panic!("no member named {}", name))
            .clone()
    }

    pub fn to_json(&self) -> Value {
        let members: Vec<Value> = self
            .members
            .iter()
            .map(|(name, id, is_active)| {
                json!({
                    "user_id": id,
                    "username": name,
                    "is_active": is_active,
                })
            })
            .collect();

        json!({
            "team_name": self.name,
            "members": members,
        })
    }
}
