pub mod channel;

pub use channel::{Catalog, Channel, PlaybackTarget};
