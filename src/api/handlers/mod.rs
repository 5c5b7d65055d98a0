pub mod system;
pub mod wait_time;

pub use system::*;
pub use wait_time::*;
