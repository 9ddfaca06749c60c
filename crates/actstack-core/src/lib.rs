//! Activity stack manager.
//!
//! Keeps a stack of activities, launches them according to their
//! [`LaunchMode`], and drives each one through its lifecycle:
//!
//! ```text
//! New -> Create -> Start -> Resume <-> Pause -> Stop -> Destroy
//! ```
//!
//! Activities are opaque: the manager only sequences their optional
//! [`Activity`] callbacks and never renders anything.
//!
//! # Components
//!
//! - [`ActivityManager`]: the stack, launch-mode resolution and transition
//!   engine
//! - [`Activity`]: optional lifecycle callbacks, all no-ops by default
//! - [`Context`]: handed to callbacks, queues reentrant requests
//! - [`Navigator`]: restricted facade for client code
//!
//! # Example
//!
//! ```
//! use actstack_core::{Activity, ActivityManager, LaunchMode, LifecycleState};
//!
//! struct Screen;
//! impl Activity<&'static str, ()> for Screen {}
//!
//! fn build(_kind: &&'static str) -> Box<dyn Activity<&'static str, ()>> {
//!     Box::new(Screen)
//! }
//!
//! let mut manager = ActivityManager::new(build);
//! let home = manager.start("home", None, None)?;
//! let detail = manager.start("detail", None, None)?;
//! assert_eq!(manager.state(home), Some(LifecycleState::Pause));
//!
//! let again = manager.start("home", Some(LaunchMode::SINGLE_INSTANCE), None)?;
//! assert_eq!(again, home);
//! assert_eq!(manager.state(detail), Some(LifecycleState::Pause));
//!
//! manager.finish(home)?;
//! assert_eq!(manager.state(detail), Some(LifecycleState::Resume));
//! # Ok::<(), actstack_core::LifecycleError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod activity;
mod context;
mod error;
mod frame;
mod lifecycle;
mod manager;
mod mode;
mod navigator;

pub use activity::{Activity, ActivityFactory, Completion, Teardown};
pub use context::Context;
pub use error::LifecycleError;
pub use frame::{ActivityId, FrameInfo};
pub use lifecycle::LifecycleState;
pub use manager::{ActivityManager, DEFAULT_LAUNCH_MODE, ManagerConfig};
pub use mode::{CoreMode, LaunchMode};
pub use navigator::Navigator;
