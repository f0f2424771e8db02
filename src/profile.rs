use serde::{Deserialize, Serialize};

/// Identity claims of the signed-in user, as returned by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub picture: String,
}

impl Profile {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.given_name, self.family_name);
        let name = name.trim();

        if name.is_empty() {
            self.email.to_owned()
        } else {
            name.to_owned()
        }
    }

    pub fn has_picture(&self) -> bool {
        !self.picture.is_empty()
    }
}
