pub mod config;
pub mod dashboard;
pub mod node;
pub mod site;

pub use config::*;
pub use dashboard::*;
pub use node::*;
pub use site::*;
