//! Uploaded resumes and saved cover letters. File bytes live in blob
//! storage; the database keeps one row per document pointing at its key.

pub mod handlers;
pub mod resumes;
pub mod storage;
