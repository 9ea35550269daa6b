pub mod ids;
pub mod rank;
pub mod role;
pub mod roster;
pub mod stats;
