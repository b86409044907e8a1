pub mod buttons;
pub mod forms;
pub mod status;

pub use buttons::*;
pub use forms::*;
pub use status::*;
