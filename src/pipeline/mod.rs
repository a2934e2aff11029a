//! Pipeline stages for Scrapbox-to-esa migration.
//!
//! Each submodule implements exactly one step.
//!
//! ## Data Flow
//!
//! ```text
//! export ──▶ transliterate ──▶ assemble ──▶ publish
//! (JSON)      (per line)        (per page)   (HTTP POST)
//! ```
//!
//! 1. [`export`]        — read the export file and decode its pages; any
//!    failure here is fatal
//! 2. [`transliterate`] — ordered rewrite rules turning one Scrapbox line into
//!    one esa Markdown line
//! 3. [`assemble`]      — join a page's lines into a document body and wrap it
//!    in a post payload
//! 4. [`publish`]       — send the payload to esa; the only stage with network
//!    I/O

pub mod assemble;
pub mod export;
pub mod publish;
pub mod transliterate;
