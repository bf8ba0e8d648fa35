//! Revision-log API client
//!
//! Talks to the study-assistant server that owns the activity log:
//! - `GET /revision-logs/{student_id}`: the whole log
//! - `POST /revision-logs`: log a session or a login marker
//! - `PUT /revision-logs/{id}`: change fields of a session
//! - `DELETE /revision-logs/{id}`: remove a session
//!
//! Configure it in `~/.config/studystreak/config.toml`:
//!
//! ```toml
//! [api]
//! server_url = "http://localhost:5000/api"
//! student_id = "your-student-id"
//! token = "jwt-from-login"
//! ```

mod blocking;
mod client;

pub use blocking::{BlockingRevisionClient, SessionSink};
pub use client::{
    split_topics, NewSession, RevisionClient, SessionUpdate, LOGIN_NOTES, LOGIN_TOPIC,
};
