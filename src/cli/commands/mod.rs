//! CLI command implementations

pub mod config;
pub mod load;
pub mod resource;
pub mod sources;

pub use config::execute as config;
pub use load::execute as load;
pub use resource::execute as resource;
pub use sources::execute as sources;
