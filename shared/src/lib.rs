mod api;
pub mod util;

pub use api::*;
pub use util::Compass;
