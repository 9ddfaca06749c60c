//! Lifecycle state machine.
//!
//! Every frame on the stack carries a [`LifecycleState`]. States only move
//! along the edges below; the first entry of each edge set is the natural
//! advancement, which the manager follows when asked for a state that is not
//! directly reachable.
//!
//! # State Machine
//!
//! ```text
//! ┌─────┐   ┌────────┐   ┌───────┐   ┌────────┐   ┌───────┐   ┌──────┐   ┌─────────┐
//! │ New │──>│ Create │──>│ Start │──>│ Resume │──>│ Pause │──>│ Stop │──>│ Destroy │
//! └─────┘   └────────┘   └───────┘   └────────┘   └───────┘   └──────┘   └─────────┘
//!                                         ^            │
//!                                         └────────────┘
//!
//!                       ┌──────┐   ┌───────┐
//!                       │ Blur │──>│ Focus │──> Pause
//!                       └──────┘<──└───────┘
//! ```

use std::fmt;

/// Lifecycle state of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Frame exists, no callback has run yet.
    New,
    /// `on_create` has been invoked.
    Create,
    /// `on_start` has been invoked.
    Start,
    /// Foreground. At most one frame is in this state.
    Resume,
    /// Lost focus while remaining visible.
    Blur,
    /// Regained focus after a blur.
    Focus,
    /// Moved out of the foreground.
    Pause,
    /// Being finished.
    Stop,
    /// Terminal. The frame leaves the stack once teardown completes.
    Destroy,
}

impl LifecycleState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::New,
        Self::Create,
        Self::Start,
        Self::Resume,
        Self::Blur,
        Self::Focus,
        Self::Pause,
        Self::Stop,
        Self::Destroy,
    ];

    /// States reachable in one step. The first entry is the natural
    /// advancement.
    pub fn next_states(self) -> &'static [Self] {
        match self {
            Self::New => &[Self::Create],
            Self::Create => &[Self::Start],
            Self::Start => &[Self::Resume],
            Self::Resume => &[Self::Pause],
            Self::Blur => &[Self::Focus],
            Self::Focus => &[Self::Pause, Self::Blur],
            Self::Pause => &[Self::Stop, Self::Resume],
            Self::Stop => &[Self::Destroy],
            Self::Destroy => &[],
        }
    }

    /// Natural advancement from this state. `None` only for [`Self::Destroy`].
    pub fn advancement(self) -> Option<Self> {
        self.next_states().first().copied()
    }

    /// Whether `target` is reachable in a single step.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next_states().contains(&target)
    }

    /// Whether no further transitions exist.
    pub fn is_terminal(self) -> bool {
        self.next_states().is_empty()
    }

    /// Name of the callback invoked when entering this state.
    pub fn callback_name(self) -> &'static str {
        match self {
            Self::New => "onInit",
            Self::Create => "onCreate",
            Self::Start => "onStart",
            Self::Resume => "onResume",
            Self::Blur => "onBlur",
            Self::Focus => "onFocus",
            Self::Pause => "onPause",
            Self::Stop => "onStop",
            Self::Destroy => "onDestroy",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::New => "NEW",
            Self::Create => "CREATE",
            Self::Start => "START",
            Self::Resume => "RESUME",
            Self::Blur => "BLUR",
            Self::Focus => "FOCUS",
            Self::Pause => "PAUSE",
            Self::Stop => "STOP",
            Self::Destroy => "DESTROY",
        };
        f.write_str(name)
    }
}
