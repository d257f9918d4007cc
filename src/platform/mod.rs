//! Platform module for relay provisioning backend integration
//!
//! This module provides the API client and the backend seam used by the
//! deployment wizard.

pub mod api;
