mod enums;
mod ghost;
mod judge;

pub use enums::*;
pub use ghost::*;
pub use judge::*;
