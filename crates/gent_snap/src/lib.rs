//! gent snapshot harness
//!
//! Golden-file snapshot testing for event-driven view components. A test
//! supplies a [`Model`], an event script next to its golden files, and an
//! equality assertion; the [`ReplayEngine`] drives the model through the
//! script and checks the rendered view after every settle point.
//!
//! ```ignore
//! let suite = SnapshotSuite::new("testdata/snapshots");
//! let equal = |expected: &str, actual: &str, name: &str| {
//!     assert_eq!(expected, actual, "{}", name)
//! };
//! run_snapshots(&suite, Form::default(), SnapshotMode::from_env(), "signup", &equal);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod error;
pub mod event;
pub mod model;
pub mod sanitize;
pub mod script;
pub mod snapshot;

pub use engine::{run_snapshots, snapshot_name, ReplayConfig, ReplayEngine, ReplayReport};
pub use error::{SnapError, SnapResult};
pub use event::{decode, KeyEvent};
pub use model::{Effect, Model};
pub use sanitize::sanitize;
pub use script::{load_script, script_path, EventGroup, Script};
pub use snapshot::{
    Snapshot, SnapshotMode, SnapshotOutcome, SnapshotState, SnapshotSuite, VerifyFn,
};
