pub mod config;
pub mod consts;
pub mod error;
pub mod io;
pub mod lightcurve;
pub mod period;
pub mod phase;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod store;
