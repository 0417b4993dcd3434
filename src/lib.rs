pub mod games;
pub mod ismcts;
pub mod utils;
