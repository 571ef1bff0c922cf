//! Site pages.
//!
//! The real pages are rendered elsewhere; these handlers exist so the session
//! guard has something to protect and redirects have somewhere to land.

pub mod pages;
