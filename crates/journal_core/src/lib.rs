pub mod clock;
pub mod compose;
pub mod domain;
pub mod gate;
pub mod journal;
pub mod memory;
pub mod ports;
pub mod timeline;
pub mod view;

pub use clock::{WorldClock, DEFAULT_EPOCH};
pub use compose::{display_author, WriteMode, DEFAULT_AUTHOR};
pub use domain::{NewRecord, Record, User, UserCredentials};
pub use gate::{normalize, GateDecision, GatePolicy, GateReason, SubmissionGate};
pub use journal::{Journal, Submission, SubmitError};
pub use memory::{MemoryStore, ScopedStore};
pub use ports::{AuthStore, GateStore, PortError, PortResult, RecordStore};
pub use timeline::{build_timeline, DayGroup, SortOrder, Timeline};
pub use view::ViewState;
