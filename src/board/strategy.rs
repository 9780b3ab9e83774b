use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::radar::{lenient_text, optional_id};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StrategicElement {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub diagnosis: String,
    #[serde(default, alias = "overallApproach", deserialize_with = "lenient_text")]
    pub overall_approach: String,
    #[serde(
        default,
        alias = "setOfCoherentActions",
        deserialize_with = "lenient_text"
    )]
    pub set_of_coherent_actions: String,
    #[serde(
        default,
        alias = "proximateObjectives",
        deserialize_with = "lenient_text"
    )]
    pub proximate_objectives: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(default, deserialize_with = "tag_list")]
    pub tags: Vec<String>,
    #[serde(
        rename = "fromYear",
        alias = "from_year",
        default,
        deserialize_with = "optional_year"
    )]
    pub from_year: Option<i32>,
    #[serde(
        rename = "toYear",
        alias = "to_year",
        default,
        deserialize_with = "optional_year"
    )]
    pub to_year: Option<i32>,
}

impl StrategicElement {
    pub fn status_label(&self) -> &str {
        match self.status.trim() {
            "" => "unset",
            status => status,
        }
    }

    pub fn period(&self) -> Period {
        Period {
            from: self.from_year,
            to: self.to_year,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    pub from: Option<i32>,
    pub to: Option<i32>,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.to) {
            (Some(from), Some(to)) => write!(f, "{from} to {to}"),
            (Some(from), None) => write!(f, "from {from}"),
            (None, Some(to)) => write!(f, "until {to}"),
            (None, None) => f.write_str("no period"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTag<'a> {
    pub name: &'a str,
    pub item: Option<usize>,
}

// Tags arrive either as a list or as one comma-separated column.
fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|value| match value {
                Value::String(text) => Some(text),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(text) => text.split(',').map(str::to_owned).collect(),
        _ => Vec::new(),
    };

    Ok(raw
        .into_iter()
        .map(|tag| tag.trim().to_owned())
        .filter(|tag| !tag.is_empty())
        .collect())
}

fn optional_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_i64().and_then(|year| i32::try_from(year).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_table_row_with_comma_tags() {
        let element: StrategicElement = serde_json::from_str(
            r#"{
                "id": 3,
                "radar_id": 1,
                "name": "Ship weekly",
                "diagnosis": "Releases are too slow",
                "overall_approach": "Automate the release train",
                "set_of_coherent_actions": "CI, flags",
                "proximate_objectives": "Two releases a month",
                "status": "active",
                "tags": "Slow releases, Flaky CI,,",
                "fromYear": 2024,
                "toYear": "2026"
            }"#,
        )
        .unwrap();

        assert_eq!(element.id.as_deref(), Some("3"));
        assert_eq!(element.tags, ["Slow releases", "Flaky CI"]);
        assert_eq!(element.from_year, Some(2024));
        assert_eq!(element.to_year, Some(2026));
        assert_eq!(element.period().to_string(), "2024 to 2026");
        assert_eq!(element.status_label(), "active");
    }

    #[test]
    fn blank_and_null_columns_fall_back() {
        let element: StrategicElement = serde_json::from_str(
            r#"{"name": "Draft", "diagnosis": null, "tags": null, "fromYear": "", "toYear": 2027}"#,
        )
        .unwrap();

        assert!(element.diagnosis.is_empty());
        assert!(element.tags.is_empty());
        assert_eq!(element.from_year, None);
        assert_eq!(element.period().to_string(), "until 2027");
        assert_eq!(element.status_label(), "unset");
        assert_eq!(StrategicElement::default().period().to_string(), "no period");
    }
}
