use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

impl Scalar {
    pub(crate) fn into_text(self) -> String {
        match self {
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Text(value) => value,
            Self::Other(Value::Null) => String::new(),
            Self::Other(value) => value.to_string(),
        }
    }
}

pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

fn write_raw(f: &mut fmt::Formatter<'_>, raw: &str) -> fmt::Result {
    if raw.trim().is_empty() {
        f.write_str("unset")
    } else {
        f.write_str(raw)
    }
}

pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Scalar>::deserialize(deserializer)?;
    Ok(raw
        .map(Scalar::into_text)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty()))
}

fn ordinal(raw: &str, prefix: &str) -> Option<u8> {
    let trimmed = raw.trim();
    let digits = trimmed
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map_or(trimmed, |_| &trimmed[prefix.len()..]);

    match digits.parse::<u8>() {
        Ok(value @ 1..=4) => Some(value),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ItemKind {
    #[default]
    Problem,
    Opportunity,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Problem => "problem",
            Self::Opportunity => "opportunity",
        }
    }
}

impl<'de> Deserialize<'de> for ItemKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_text);
        Ok(match raw.as_deref().map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("opportunity") => Self::Opportunity,
            _ => Self::Problem,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "Scalar")]
pub enum Category {
    Cat1,
    Cat2,
    Cat3,
    Cat4,
    Unrecognized(String),
}

impl Default for Category {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl From<Scalar> for Category {
    fn from(raw: Scalar) -> Self {
        let text = raw.into_text();
        match ordinal(&text, "cat") {
            Some(1) => Self::Cat1,
            Some(2) => Self::Cat2,
            Some(3) => Self::Cat3,
            Some(4) => Self::Cat4,
            _ => Self::Unrecognized(text),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cat1 => f.write_str("cat1"),
            Self::Cat2 => f.write_str("cat2"),
            Self::Cat3 => f.write_str("cat3"),
            Self::Cat4 => f.write_str("cat4"),
            Self::Unrecognized(raw) => write_raw(f, raw),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "Scalar")]
pub enum Distance {
    Dist1,
    Dist2,
    Dist3,
    Dist4,
    Unrecognized(String),
}

impl Default for Distance {
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

impl From<Scalar> for Distance {
    fn from(raw: Scalar) -> Self {
        let text = raw.into_text();
        match ordinal(&text, "dist") {
            Some(1) => Self::Dist1,
            Some(2) => Self::Dist2,
            Some(3) => Self::Dist3,
            Some(4) => Self::Dist4,
            _ => Self::Unrecognized(text),
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dist1 => f.write_str("dist1"),
            Self::Dist2 => f.write_str("dist2"),
            Self::Dist3 => f.write_str("dist3"),
            Self::Dist4 => f.write_str("dist4"),
            Self::Unrecognized(raw) => write_raw(f, raw),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "Scalar")]
pub enum Level {
    Low,
    Medium,
    High,
    Unrecognized(String),
}

impl From<Scalar> for Level {
    fn from(raw: Scalar) -> Self {
        let text = raw.into_text();
        match text.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Unrecognized(text),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
            Self::Unrecognized(raw) => write_raw(f, raw),
        }
    }
}

pub fn level_label(level: Option<&Level>) -> String {
    level.map_or_else(|| "unset".to_owned(), Level::to_string)
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub distance: Distance,
    #[serde(default)]
    pub impact: Option<Level>,
    #[serde(default)]
    pub cost: Option<Level>,
    #[serde(
        rename = "crossReference",
        alias = "cross_reference",
        alias = "zoom_in",
        default,
        deserialize_with = "optional_id"
    )]
    pub cross_reference: Option<String>,
}

#[cfg(test)]
impl Item {
    pub(crate) fn new(name: &str, category: Category, distance: Distance) -> Self {
        Self {
            id: Some(format!("item-{name}")),
            name: name.to_owned(),
            description: String::new(),
            kind: ItemKind::Problem,
            category,
            distance,
            impact: None,
            cost: None,
            cross_reference: None,
        }
    }

    pub(crate) fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    pub(crate) fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn with_impact(mut self, impact: Level) -> Self {
        self.impact = Some(impact);
        self
    }

    pub(crate) fn with_cost(mut self, cost: Level) -> Self {
        self.cost = Some(cost);
        self
    }

    pub(crate) fn with_cross_reference(mut self, chart_id: &str) -> Self {
        self.cross_reference = Some(chart_id.to_owned());
        self
    }
}
