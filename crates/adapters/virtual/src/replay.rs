//! Route replay: moves the virtual device along a scripted route.
//!
//! [`RouteReplay`] walks the waypoints in order, one per interval, and moves
//! the device to each of them. The device decides what that produces:
//! location updates while they are running, region entry and exit for
//! monitored regions.

use std::time::Duration;

use tokio::task::JoinHandle;

use locport_domain::location::{Coordinate, Location};
use locport_domain::time::now;

use crate::VirtualLocationHardware;

/// Horizontal accuracy attached to replayed fixes, in metres.
const REPLAY_ACCURACY: f64 = 5.0;

/// Background task replaying a route on a [`VirtualLocationHardware`].
pub struct RouteReplay {
    hardware: VirtualLocationHardware,
    route: Vec<Coordinate>,
    interval: Duration,
}

impl RouteReplay {
    /// Spawn the replay. The task finishes after the last waypoint.
    #[must_use]
    pub fn start(
        hardware: VirtualLocationHardware,
        route: Vec<Coordinate>,
        interval: Duration,
    ) -> JoinHandle<()> {
        let replay = Self {
            hardware,
            route,
            interval,
        };

        tokio::spawn(replay.run())
    }

    async fn run(self) {
        tracing::info!(
            waypoints = self.route.len(),
            interval_ms = self.interval.as_millis(),
            "route replay started"
        );
        for (index, coordinate) in self.route.into_iter().enumerate() {
            tokio::time::sleep(self.interval).await;
            tracing::debug!(
                index,
                latitude = coordinate.latitude,
                longitude = coordinate.longitude,
                "replaying waypoint"
            );
            self.hardware.move_to(fix(coordinate));
        }
        tracing::info!("route replay finished");
    }
}

fn fix(coordinate: Coordinate) -> Location {
    Location {
        horizontal_accuracy: REPLAY_ACCURACY,
        ..Location::new(coordinate, now())
    }
}
