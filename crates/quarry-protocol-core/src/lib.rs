pub mod catalog;
pub mod codec;
pub mod packets;
pub mod state;
pub mod variant;
pub mod version;

pub use catalog::*;
pub use codec::*;
pub use packets::*;
pub use state::*;
pub use variant::*;
pub use version::*;
