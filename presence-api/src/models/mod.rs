mod alarm;
mod presence;

pub use alarm::*;
pub use presence::*;
