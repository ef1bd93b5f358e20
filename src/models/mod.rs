pub mod tab;
pub mod messages;
pub mod health;
pub mod stats;
pub mod error;

pub use tab::*;
pub use messages::*;
pub use health::*;
pub use stats::*;
pub use error::*;
