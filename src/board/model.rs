use std::sync::Arc;

use crate::radar::Item;

use super::strategy::{ResolvedTag, StrategicElement};

#[derive(Clone, Debug)]
pub struct Chart {
    pub id: String,
    pub name: String,
    pub items: Arc<[Item]>,
    pub elements: Vec<StrategicElement>,
}

impl Chart {
    pub fn item_index(&self, item_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.id.as_deref() == Some(item_id))
    }

    pub fn resolve_tags<'a>(&self, element: &'a StrategicElement) -> Vec<ResolvedTag<'a>> {
        element
            .tags
            .iter()
            .map(|tag| ResolvedTag {
                name: tag,
                item: self.items.iter().position(|item| item.name.trim() == tag),
            })
            .collect()
    }

    /// Element tags that name no item of this chart.
    pub fn unmatched_tags(&self) -> Vec<&str> {
        self.elements
            .iter()
            .flat_map(|element| self.resolve_tags(element))
            .filter(|tag| tag.item.is_none())
            .map(|tag| tag.name)
            .collect()
    }

    pub fn linked_chart_ids(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter_map(|item| item.cross_reference.as_deref())
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    pub charts: Vec<Chart>,
}

impl Board {
    pub fn chart(&self, id: &str) -> Option<&Chart> {
        self.charts.iter().find(|chart| chart.id == id)
    }

    pub fn chart_count(&self) -> usize {
        self.charts.len()
    }

    pub fn item_count(&self) -> usize {
        self.charts.iter().map(|chart| chart.items.len()).sum()
    }

    pub fn element_count(&self) -> usize {
        self.charts.iter().map(|chart| chart.elements.len()).sum()
    }

    /// Cross-references that point at charts missing from this board.
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        let mut dangling = self
            .charts
            .iter()
            .flat_map(|chart| {
                chart
                    .linked_chart_ids()
                    .filter(|target| self.chart(target).is_none())
                    .map(|target| (chart.id.clone(), target.to_owned()))
            })
            .collect::<Vec<_>>();
        dangling.sort();
        dangling.dedup();
        dangling
    }
}
