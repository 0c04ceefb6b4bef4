pub mod coachmark;
pub mod events;
pub mod gate;
pub mod geometry;
pub mod logging;
pub mod manager;
pub mod mask;
pub mod step;

pub use coachmark::{Coachmark, CoachmarkResponse};
pub use events::TourEvent;
pub use manager::TourManager;
pub use step::{TourSequence, TourStep};
