mod action_handle;
mod sse_handle;
mod status_handle;
mod style_handle;

pub use action_handle::*;
pub use sse_handle::*;
pub use status_handle::*;
pub use style_handle::*;
