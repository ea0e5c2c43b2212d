//! Meeting lifecycle.
//!
//! Creating a meeting and uploading its recording, following the server-side
//! processing pipeline until it settles, and loading what it produced.

pub mod aggregator;
pub mod clock;
pub mod status;
pub mod tracker;
pub mod upload;

pub use aggregator::{MeetingResources, ResourceAggregator, Slot};
pub use clock::{Clock, ManualClock, TokioClock};
pub use status::MeetingStatus;
pub use tracker::{MeetingStatusTracker, PollPhase};
pub use upload::UploadCoordinator;
