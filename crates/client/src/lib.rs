//! Client code for amble.
//!
//! This crate provides the Modrinth API client and the metadata fetcher
//! that renders cached or freshly retrieved project metadata into display
//! targets.

pub mod meta;
pub mod modrinth;

#[cfg(test)]
mod test_server;

pub use meta::{
    DisplayState, HttpIconLoader, IconLoader, IconOutcome, MetadataFetcher, MetadataSource, Pacing, Renderer,
    Resolution, Target, ViewModel,
};

pub use modrinth::{ModrinthClient, ModrinthConfig, ModrinthError};
