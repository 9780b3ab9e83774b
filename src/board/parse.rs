use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::radar::{Item, lenient_text, optional_id};

use super::model::{Board, Chart};
use super::strategy::StrategicElement;

#[derive(Debug, Deserialize)]
struct RawChart {
    #[serde(default, deserialize_with = "optional_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    name: String,
    #[serde(default)]
    items: Vec<Item>,
    #[serde(rename = "strategicElements", alias = "strategic_elements", default)]
    elements: Vec<StrategicElement>,
}

impl RawChart {
    fn into_chart(self, position: usize) -> Result<Chart> {
        let id = self
            .id
            .ok_or_else(|| anyhow!("chart #{position} ({:?}) has no id", self.name))?;
        let name = if self.name.trim().is_empty() {
            id.clone()
        } else {
            self.name
        };

        Ok(Chart {
            id,
            name,
            items: Arc::from(self.items),
            elements: self.elements,
        })
    }
}

/// Accepts either `{"charts": [{.., "items": [..], "strategicElements": [..]}]}` or a table
/// export shaped like `{"radars": [..], "radar_items": [..], "strategic_elements": [..]}`
/// whose rows carry a `radar_id`.
pub(super) fn parse_board(raw: &str) -> Result<Board> {
    let parsed: Value = serde_json::from_str(raw).context("board file is not valid JSON")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("board JSON must be an object"))?;

    let charts = if let Some(rows) = object.get("radar_items") {
        let radars = object
            .get("radars")
            .ok_or_else(|| anyhow!("table export has \"radar_items\" but no \"radars\""))?;
        charts_from_tables(radars, rows, object.get("strategic_elements"))?
    } else {
        let list = object
            .get("charts")
            .or_else(|| object.get("radars"))
            .ok_or_else(|| anyhow!("board JSON has no \"charts\" list"))?;
        Vec::<RawChart>::deserialize(list)
            .context("invalid chart list")?
            .into_iter()
            .enumerate()
            .map(|(position, chart)| chart.into_chart(position))
            .collect::<Result<Vec<_>>>()?
    };

    if charts.is_empty() {
        bail!("board contains no charts");
    }

    let mut seen = HashSet::with_capacity(charts.len());
    for chart in &charts {
        if !seen.insert(chart.id.as_str()) {
            bail!("chart id {} appears more than once", chart.id);
        }
    }

    Ok(Board { charts })
}

fn charts_from_tables(radars: &Value, rows: &Value, elements: Option<&Value>) -> Result<Vec<Chart>> {
    let radars = Vec::<RawChart>::deserialize(radars).context("invalid \"radars\" rows")?;
    let mut items_by_radar = rows_by_radar::<Item>(rows, "radar_items")?;
    let mut elements_by_radar = match elements {
        Some(elements) => rows_by_radar::<StrategicElement>(elements, "strategic_elements")?,
        None => HashMap::new(),
    };

    let mut charts = Vec::with_capacity(radars.len());
    for (position, radar) in radars.into_iter().enumerate() {
        let mut chart = radar.into_chart(position)?;
        if let Some(items) = items_by_radar.remove(&chart.id) {
            chart.items = Arc::from(items);
        }
        if let Some(elements) = elements_by_radar.remove(&chart.id) {
            chart.elements.extend(elements);
        }
        charts.push(chart);
    }

    for (table, mut orphaned) in [
        ("radar_items", items_by_radar.into_keys().collect::<Vec<_>>()),
        ("strategic_elements", elements_by_radar.into_keys().collect()),
    ] {
        orphaned.sort();
        if !orphaned.is_empty() {
            bail!("{table} reference unknown radars: {}", orphaned.join(", "));
        }
    }

    Ok(charts)
}

fn rows_by_radar<T: DeserializeOwned>(rows: &Value, table: &str) -> Result<HashMap<String, Vec<T>>> {
    let rows = rows
        .as_array()
        .ok_or_else(|| anyhow!("\"{table}\" must be an array"))?;

    let mut by_radar: HashMap<String, Vec<T>> = HashMap::new();
    for (position, row) in rows.iter().enumerate() {
        let radar_id = row
            .get("radar_id")
            .cloned()
            .map(optional_id)
            .transpose()
            .with_context(|| format!("invalid radar_id in {table} row #{position}"))?
            .flatten()
            .ok_or_else(|| anyhow!("{table} row #{position} has no radar_id"))?;
        let value = T::deserialize(row).with_context(|| format!("invalid {table} row #{position}"))?;
        by_radar.entry(radar_id).or_default().push(value);
    }
    Ok(by_radar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::{Category, ChartRadius, Distance, layout};

    #[test]
    fn parses_nested_charts() {
        let board = parse_board(
            r#"{"charts": [
                {"id": 1, "name": "Strategy", "items": [
                    {"id": 10, "name": "Churn", "category": "cat2", "distance": "dist3", "crossReference": 2}
                ]},
                {"id": "2", "name": "Ops"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(board.chart_count(), 2);
        let strategy = board.chart("1").unwrap();
        assert_eq!(strategy.items[0].category, Category::Cat2);
        assert_eq!(strategy.items[0].distance, Distance::Dist3);
        assert_eq!(strategy.item_index("10"), Some(0));
        assert!(board.chart("2").unwrap().items.is_empty());
        assert!(board.dangling_references().is_empty());
    }

    #[test]
    fn parses_table_export() {
        let board = parse_board(
            r#"{
                "radars": [{"id": 1, "name": "Strategy"}, {"id": 2, "name": ""}],
                "radar_items": [
                    {"id": 5, "radar_id": 1, "name": "A", "category": "cat1", "distance": "dist1"},
                    {"id": 6, "radar_id": 1, "name": "B", "category": "cat1", "distance": "dist1"},
                    {"id": 7, "radar_id": 2, "name": "C", "category": "cat4", "distance": "dist4", "zoom_in": 9}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(board.chart("1").unwrap().items.len(), 2);
        assert_eq!(board.chart("2").unwrap().name, "2");
        assert_eq!(board.item_count(), 3);
        assert_eq!(
            board.dangling_references(),
            [("2".to_owned(), "9".to_owned())]
        );
    }

    #[test]
    fn null_and_boolean_ordinals_keep_the_item_on_the_fallback_ring() {
        let board = parse_board(
            r#"{"charts": [{"id": "a", "items": [
                {"id": 1, "category": "cat1", "distance": "dist1"},
                {"id": 2, "category": null, "distance": true},
                {"id": 3, "category": null, "distance": null, "type": null}
            ]}]}"#,
        )
        .unwrap();

        let items = &board.chart("a").unwrap().items;
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].category, Category::Unrecognized(String::new()));
        assert_eq!(items[1].distance, Distance::Unrecognized("true".to_owned()));

        let markers = layout(items, ChartRadius::new(100.0).unwrap());
        assert_eq!(markers.len(), 3);
        for marker in &markers {
            assert!((marker.position.length() - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn table_export_with_null_columns_still_loads() {
        let board = parse_board(
            r#"{
                "radars": [{"id": 1, "name": null}],
                "radar_items": [{"id": 5, "radar_id": 1, "name": "A", "description": null, "category": null, "distance": null, "impact": null}]
            }"#,
        )
        .unwrap();
        assert_eq!(board.item_count(), 1);
        assert_eq!(board.chart("1").unwrap().name, "1");
    }

    #[test]
    fn attaches_strategic_elements_to_their_radar() {
        let board = parse_board(
            r#"{
                "radars": [{"id": 1, "name": "Strategy"}, {"id": 2, "name": "Ops"}],
                "radar_items": [{"id": 5, "radar_id": 1, "name": "Slow releases", "category": "cat1", "distance": "dist1"}],
                "strategic_elements": [
                    {"id": 9, "radar_id": 1, "name": "Ship weekly", "status": "active", "tags": "Slow releases,Unknown", "fromYear": 2025, "toYear": null}
                ]
            }"#,
        )
        .unwrap();

        let strategy = board.chart("1").unwrap();
        assert_eq!(strategy.elements.len(), 1);
        assert_eq!(strategy.elements[0].name, "Ship weekly");
        assert_eq!(strategy.elements[0].period().to_string(), "from 2025");
        assert_eq!(strategy.unmatched_tags(), ["Unknown"]);
        assert!(board.chart("2").unwrap().elements.is_empty());
        assert_eq!(board.element_count(), 1);
    }

    #[test]
    fn nested_charts_carry_strategic_elements() {
        let board = parse_board(
            r#"{"charts": [{"id": "a", "items": [{"name": "X"}], "strategicElements": [{"name": "Plan", "tags": ["X"]}]}]}"#,
        )
        .unwrap();
        let chart = board.chart("a").unwrap();
        assert_eq!(chart.resolve_tags(&chart.elements[0])[0].item, Some(0));
    }

    #[test]
    fn rejects_elements_for_unknown_radars() {
        let error = parse_board(
            r#"{"radars": [{"id": 1}], "radar_items": [], "strategic_elements": [{"radar_id": 4, "name": "x"}]}"#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("strategic_elements reference unknown radars: 4"));
    }

    #[test]
    fn rejects_items_for_unknown_radars() {
        let error = parse_board(
            r#"{"radars": [{"id": 1}], "radar_items": [{"radar_id": 3, "name": "x"}]}"#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("unknown radars: 3"));
    }

    #[test]
    fn rejects_duplicate_and_missing_ids() {
        assert!(parse_board(r#"{"charts": [{"id": 1}, {"id": "1"}]}"#).is_err());
        assert!(parse_board(r#"{"charts": [{"name": "anonymous"}]}"#).is_err());
        assert!(parse_board(r#"{"charts": []}"#).is_err());
        assert!(parse_board(r#"[1, 2]"#).is_err());
        assert!(parse_board("not json").is_err());
    }
}
