pub mod bluetooth;
pub mod hand_tracker;
pub mod logging;
pub mod volume;
