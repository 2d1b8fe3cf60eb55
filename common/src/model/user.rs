use serde::{Deserialize, Serialize};

/// A registered clinician (pharmacist or prescriber) as exposed by the API.
///
/// Created through `POST /auth/register` and read back through `GET /auth/me`.
/// The password hash lives only in the backend store and never crosses the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub license_number: Option<String>,
    pub specialty: Option<String>,
    pub practice_name: Option<String>,
    pub is_active: bool,
}

impl User {
    /// Up to two initials taken from the display name, used by the layout avatar.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}
