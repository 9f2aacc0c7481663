mod presence_handle;

pub use presence_handle::*;
