pub mod registry;
pub mod types;

pub use registry::MissionRegistry;
pub use types::Mission;
