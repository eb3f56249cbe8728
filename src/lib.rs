pub mod config;
pub mod dashboard;
pub mod facets;
pub mod filter;
pub mod gate;
pub mod model;
pub mod pager;
pub mod store;
pub mod view;
