mod progress;
mod reminder;
mod subscription;
mod task;

pub use progress::*;
pub use reminder::*;
pub use subscription::*;
pub use task::*;
