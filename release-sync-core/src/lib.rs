#![doc = "release-sync-core: core pipeline for release-sync."]

//! This crate fetches a repository's GitHub releases and regenerates three derived
//! artifacts from them: a month-grouped changelog, the per-day preferred download
//! links, and the cumulative size line of a README.
//!
//! # Usage
//! Build a [`config::SynchroniseConfig`], pick a [`contract::ReleaseSource`]
//! (normally [`fetch::GitHubReleaseSource`]) and call [`synchronise::synchronise`].

pub mod aggregate;
pub mod artifacts;
pub mod config;
pub mod contract;
pub mod fetch;
pub mod links;
pub mod release_name;
pub mod render;
pub mod synchronise;
