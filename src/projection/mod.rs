//! Point-in-time status projection over built routes.

mod status;

pub use status::project_status;
