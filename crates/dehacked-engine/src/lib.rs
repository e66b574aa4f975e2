pub mod bits;
pub mod classic;
pub mod engine;
pub mod error;
mod finalize;
mod mbf;
pub mod memory;
mod patchers;
pub mod pickup;
pub mod section;
pub mod tables;
pub mod world;

pub use classic::world_from_descriptor;
pub use engine::{MbfParamState, PatchEngine};
pub use error::{DehError, SupportError};
pub use memory::MemoryWorld;
pub use pickup::DehSpriteMap;
pub use section::Section;
pub use world::{StringOverride, SupportResource, World};
