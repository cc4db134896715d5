pub mod config;
pub mod effect;
pub mod error;
pub mod render;

pub use effect::{Graphic, MaterialCache, OutlineEffect};
pub use error::OutlineError;
pub use render::outline::{expand, expanded, OutlineParams};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
