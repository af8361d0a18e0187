//! Thread-safe handle over a [`WorldStreamer`].

use std::sync::Arc;

use parking_lot::Mutex;

use crate::streamer::{TickReport, WorldStreamer};
use crate::tile::{Tile, TileCoord};

/// Clonable handle that serializes every tick and query behind one lock.
#[derive(Clone)]
pub struct SharedWorld {
    inner: Arc<Mutex<WorldStreamer>>,
}

impl SharedWorld {
    /// Wraps a streamer.
    #[must_use]
    pub fn new(streamer: WorldStreamer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(streamer)),
        }
    }

    /// Ticks the wrapped streamer around `focus`.
    pub fn tick(&self, focus: (f32, f32)) -> TickReport {
        self.inner.lock().tick(focus)
    }

    /// Tile at `coord`, `None` if not materialized yet.
    #[must_use]
    pub fn query_tile(&self, coord: TileCoord) -> Option<Tile> {
        self.inner.lock().query_tile(coord)
    }

    /// Runs `f` with exclusive access to the streamer.
    pub fn with<R>(&self, f: impl FnOnce(&mut WorldStreamer) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}
