pub mod clean;
pub mod seed;
pub mod serve;
