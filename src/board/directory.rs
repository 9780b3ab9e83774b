use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use tracing::trace;

use crate::radar::{EntityLookup, LookupError};

use super::model::Board;

/// Chart-name lookup backed by a loaded board. `latency` simulates a remote store.
pub struct BoardDirectory {
    names: HashMap<String, String>,
    latency: Duration,
}

impl BoardDirectory {
    pub fn new(board: &Board, latency: Duration) -> Self {
        let names = board
            .charts
            .iter()
            .map(|chart| (chart.id.clone(), chart.name.clone()))
            .collect();
        Self { names, latency }
    }
}

impl EntityLookup for BoardDirectory {
    fn lookup_name(&self, id: &str) -> Result<String, LookupError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        trace!(id, "looking up chart name");
        self.names
            .get(id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(id.to_owned()))
    }
}
