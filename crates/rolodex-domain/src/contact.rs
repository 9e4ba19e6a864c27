use chrono::{DateTime, Utc};
use rolodex_core::{IndexKey, KeyPart};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ContactId = Uuid;

/// One entry in the contact book.
///
/// Contacts sort by surname, then given name; see [`Contact::name_key`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub given_name: String,
    pub surname: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(given_name: String, surname: String, phone: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            given_name,
            surname,
            phone,
            created_at: Utc::now(),
        }
    }

    /// The contact's position in the name index: `[surname, given_name]`.
    ///
    /// The store appends its own tiebreaker part, so two contacts may share
    /// the same name key.
    pub fn name_key(&self) -> IndexKey {
        IndexKey::new(vec![
            KeyPart::Text(self.surname.clone()),
            KeyPart::Text(self.given_name.clone()),
        ])
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.surname)
    }
}
