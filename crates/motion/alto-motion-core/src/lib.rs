//! alto-motion core (host-agnostic)
//!
//! Declarative reveal animations for the landing page. The presentation layer
//! tags elements with marker classes (`animate-fade-in-up`, ...) and `data-*`
//! configuration; this crate scans a [`Document`] for those markers, binds each
//! element to a motion primitive exactly once, and drives the resulting tweens
//! either immediately or when the element scrolls into view.
//!
//! The crate never touches a real DOM. Hosts (the wasm adapter, tests) mirror the
//! page into a [`Document`], forward insertions/layout/frames/time to a
//! [`MotionScope`], and apply the returned [`Outputs`].

pub mod binding;
pub mod catalog;
pub mod config;
pub mod document;
pub mod ease;
pub mod engine;
pub mod error;
pub mod ids;
pub mod markers;
pub mod outputs;
pub mod scope;
pub mod stagger;
pub mod style;
pub mod tween;
pub mod viewport;
pub mod watcher;

// Re-exports for consumers (adapters)
pub use binding::{BindingOptions, MarkerBinding, Timing, Trigger};
pub use catalog::{MotionName, MotionSpec};
pub use config::Config;
pub use document::{Document, MemoryDocument, NodeSpec, Rect};
pub use ease::Ease;
pub use engine::{AttachmentEngine, ScanReport};
pub use error::MotionError;
pub use ids::{ElementId, TriggerId, TweenId};
pub use markers::Marker;
pub use outputs::{AttrWrite, Change, MotionEvent, Outputs};
pub use scope::MotionScope;
pub use stagger::{stagger_delays, StaggerGroup};
pub use style::{Pose, Prop, Visibility};
pub use tween::{TweenHandle, TweenTable};
pub use viewport::{Region, Threshold, ViewportRange};
pub use watcher::MutationWatcher;
