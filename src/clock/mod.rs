pub mod adapter;
pub mod simulated;
pub mod surface;

pub use adapter::{MediaClock, PositionUpdate};
pub use simulated::SimulatedSurface;
pub use surface::MediaSurface;
