//! Influencer Analyzer - engagement metrics for public Instagram profiles.
//!
//! # Overview
//!
//! A username is looked up through a [`provider::ProfileProvider`], the newest
//! posts (at most twelve) are sampled, and the results are summarised as
//! average likes, average comments and an engagement rate. A single page
//! shows the outcome as a dashboard.
//!
//! # Modules
//!
//! - [`model`]: Profile, post and search state types
//! - [`error`]: Provider errors and user-facing error messages
//! - [`provider`]: Provider trait, lazy post stream and the Instagram client
//! - [`format`]: Abbreviated counts ("12.3K")
//! - [`analysis`]: Sampling and engagement metrics
//! - [`controller`]: Search state transitions and background lookups
//! - [`view`]: HTML rendering
//! - [`api`]: HTTP API handlers

pub mod analysis;
pub mod api;
pub mod controller;
pub mod error;
pub mod format;
pub mod model;
pub mod provider;
pub mod view;
