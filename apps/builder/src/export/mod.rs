//! Export requesters: PDF download, PDF import, job analysis and cover letters.
//!
//! The session drives the network calls; this module holds the pieces that
//! don't need the session: busy controls, file naming, mail composition.

pub mod busy;
pub mod cover_letter;
pub mod pdf;
