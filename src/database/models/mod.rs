pub mod role;
pub mod status;
pub mod task;
pub mod user;

pub use role::Role;
pub use status::Status;
pub use task::{Task, TaskRow};
pub use user::{User, UserRow};
