pub mod backup;
pub mod conversion;
pub mod installer;
pub mod locator;
pub mod mod_installer;
pub mod mode;
pub mod sandbox;
pub mod session;
pub mod transaction;

pub use session::Session;
