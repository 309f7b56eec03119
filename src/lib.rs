#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ingest;
pub mod interaction;
pub mod ir;
pub mod placement;
pub mod projection;
pub mod render;
pub mod scene;
pub mod scene_dump;
pub mod theme;
pub mod view;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, load_config, parse_config};
pub use error::{GlobeError, IngestError};
pub use ingest::parse_keywords;
pub use interaction::{HoverInfo, RotationState};
pub use ir::Keyword;
pub use placement::{PlacedLabel, Placement, place_labels};
pub use projection::{ProjectedLabel, Viewport, project};
pub use render::{render_svg, write_output_svg};
pub use scene::{FrameInput, PointerEvent, Scene, step};
pub use theme::Theme;
pub use view::{GlobeView, HostSurface, SvgSurface};
