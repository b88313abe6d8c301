//! Terminal adapters hosting a [`PageRuntime`](super::PageRuntime).

pub mod cli;
