pub mod gps;
pub mod stop;
pub mod track;

pub use gps::*;
pub use stop::*;
pub use track::*;
