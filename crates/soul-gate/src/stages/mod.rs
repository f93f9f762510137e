//! Built-in gate stages, in evaluation order.

pub mod mode;
pub mod per_source;
pub mod restriction;
pub mod supply;
pub mod window;

pub use mode::ModeStage;
pub use per_source::PerSourceCapStage;
pub use restriction::RestrictionStage;
pub use supply::SupplyStage;
pub use window::WindowStage;
