pub mod engagement;
pub mod job_post;
pub mod post;
pub mod resume;
pub mod user;
