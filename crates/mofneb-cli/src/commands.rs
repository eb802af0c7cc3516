pub mod input;
pub mod neb;
pub mod sites;
