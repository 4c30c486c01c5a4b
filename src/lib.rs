#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod placement;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{PlacementConfig, load_config};
pub use ir::{
    BranchCandidate, ImageRectMap, PayloadError, Point, Rect, Scene, ScenePayload, Viewport,
};
pub use placement::{
    Anchor, AnchorKind, Suggestion, merge_ambient_suggestions, place_ambient_suggestions,
    should_schedule_ambient_intent,
};
