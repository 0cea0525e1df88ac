//! Run orchestration for tgcatalog.
//!
//! This crate ties together listing crawl, detail extraction, and table
//! export into one end-to-end run (see [`pipeline::run_category`]).

pub mod pipeline;
