//! The stages of a NEB setup.
//!
//! Each task is a free function over borrowed inputs. They run in the order
//! [`site_ranking`], [`placement_search`] (which calls [`overlap`] for every
//! trial position) and [`path_sampling`].

pub mod overlap;
pub mod path_sampling;
pub mod placement_search;
pub mod site_ranking;
