pub mod audit;
pub mod participant;
pub mod setup;
pub mod stats;
pub mod weigh_in;
pub mod week;
