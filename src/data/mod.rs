//! Data module for retrieving lunar ephemerides
//!
//! This module fetches observer tables from JPL Horizons and caches them
//! on disk so repeated runs over the same nights stay offline.

pub mod horizons;

pub use horizons::{
    ensure_cache_dir, fetch_ephemeris, fetch_ephemeris_cached, get_cache_dir, open_remote,
    split_periods, HorizonsQuery,
};
