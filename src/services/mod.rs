//! Services built on top of the lyrics, TOC and render layers.
//!
//! `assembler` produces the PDF documents of a songbook edition, `links`
//! looks up recording links for the QR codes.

pub mod assembler;
pub mod links;

pub use assembler::{collect_book_pages, merge_final, BatchFailure, BatchSummary, DocumentAssembler};
pub use links::{find_link, find_links_for_songs, write_links, VideoCandidate, VideoSearch, YoutubeApiSearch};
