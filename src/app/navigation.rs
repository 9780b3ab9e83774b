use std::sync::mpsc::{self, Receiver, Sender};

use tracing::warn;

use crate::radar::{Navigator, Route};

pub(super) struct ChannelNavigator {
    tx: Sender<Route>,
}

impl ChannelNavigator {
    pub(super) fn new() -> (Self, Receiver<Route>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate_to(&self, route: Route) {
        if let Err(error) = self.tx.send(route) {
            warn!(route = %error.0, "navigation intent dropped; view is gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_arrive_in_order() {
        let (navigator, rx) = ChannelNavigator::new();
        navigator.navigate_to(Route::Chart {
            chart_id: "a".to_owned(),
        });
        navigator.navigate_to(Route::Item {
            chart_id: "a".to_owned(),
            item_id: "1".to_owned(),
        });

        let routes = rx.try_iter().map(|route| route.to_string()).collect::<Vec<_>>();
        assert_eq!(routes, ["/radar/a", "/radar/a/items/1"]);
    }

    #[test]
    fn sending_after_the_view_is_gone_does_not_panic() {
        let (navigator, rx) = ChannelNavigator::new();
        drop(rx);
        navigator.navigate_to(Route::Chart {
            chart_id: "a".to_owned(),
        });
    }
}
