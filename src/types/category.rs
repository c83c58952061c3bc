use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Category ids arrive both as numbers and as numeric strings.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(pub i32);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i32),
    Text(String),
}

impl std::str::FromStr for CategoryId {
    type Err = handle_errors::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse::<i32>()
            .map(CategoryId)
            .map_err(|_| handle_errors::Error::InvalidCategory(raw.to_string()))
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawId::deserialize(deserializer)? {
            RawId::Number(id) => Ok(CategoryId(id)),
            RawId::Text(raw) => raw.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// `{ "1": "Science", "2": "Art" }`, ordered by id.
pub fn category_map(categories: Vec<Category>) -> BTreeMap<i32, String> {
    categories
        .into_iter()
        .map(|category| (category.id.0, category.kind))
        .collect()
}

/// Categories every fresh store starts with.
pub fn stock_categories() -> Vec<Category> {
    ["Science", "Art", "Geography", "History", "Entertainment", "Sports"]
        .iter()
        .zip(1..)
        .map(|(kind, id)| Category {
            id: CategoryId(id),
            kind: kind.to_string(),
        })
        .collect()
}
