use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    #[serde(rename = "Only Me")]
    OnlyMe,
    #[serde(rename = "Public")]
    Public,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub title: String,
    /// cover image URI
    pub image: String,
    #[serde(default)]
    pub visible_to: Visibility,
}

impl Collection {
    pub fn is_public(&self) -> bool {
        self.visible_to == Visibility::Public
    }
}
