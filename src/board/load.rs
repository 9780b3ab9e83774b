use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::model::Board;
use super::parse::parse_board;

const DEMO_BOARD: &str = include_str!("../../demo/board.json");

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardSource {
    Demo,
    File(PathBuf),
}

impl fmt::Display for BoardSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Demo => f.write_str("bundled demo board"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub fn load_board(source: &BoardSource) -> Result<Board> {
    let raw = match source {
        BoardSource::Demo => Cow::Borrowed(DEMO_BOARD),
        BoardSource::File(path) => Cow::Owned(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read board file {}", path.display()))?,
        ),
    };

    let board = parse_board(&raw).with_context(|| format!("failed to load {source}"))?;

    info!(
        %source,
        charts = board.chart_count(),
        items = board.item_count(),
        elements = board.element_count(),
        "loaded radar board"
    );
    for (chart, target) in board.dangling_references() {
        warn!(%chart, %target, "item cross-references a chart that is not on the board");
    }
    for chart in &board.charts {
        for tag in chart.unmatched_tags() {
            warn!(chart = %chart.id, tag, "strategic element tag names no item of its chart");
        }
    }

    Ok(board)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn demo_board_loads_without_dangling_links() {
        let board = load_board(&BoardSource::Demo).unwrap();
        assert!(board.chart_count() >= 2);
        assert!(board.item_count() > 0);
        assert!(board.dangling_references().is_empty());
        assert!(board.element_count() > 0);
        assert!(board.charts.iter().all(|chart| chart.unmatched_tags().is_empty()));
    }

    #[test]
    fn loads_board_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"charts": [{{"id": "a", "name": "Alpha", "items": [{{"name": "x", "category": "cat1", "distance": "dist1"}}]}}]}}"#
        )
        .unwrap();

        let board = load_board(&BoardSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(board.chart("a").unwrap().name, "Alpha");
    }

    #[test]
    fn reports_missing_file_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let error = load_board(&BoardSource::File(path.clone())).unwrap_err();
        assert!(format!("{error:#}").contains("absent.json"));
    }
}
