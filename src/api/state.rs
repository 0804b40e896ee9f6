use crate::infrastructure::bluetooth::{BleLink, BulbClient};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The one bulb client shared by all requests. The lock serializes them at
/// the client boundary, so overlapping requests queue instead of
/// interleaving on connection state.
pub type SharedBulb = Arc<Mutex<BulbClient<BleLink>>>;

#[derive(Clone)]
pub struct AppState {
    pub bulb: SharedBulb,
}

impl AppState {
    pub fn new(client: BulbClient<BleLink>) -> Self {
        Self {
            bulb: Arc::new(Mutex::new(client)),
        }
    }
}
