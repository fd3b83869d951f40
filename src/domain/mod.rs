pub mod button;
pub mod error;
pub mod estimate;
pub mod location;
pub mod session;
