pub mod all_time;
pub mod diagnostics;
pub mod owners;
pub mod reload;
pub mod seasons;
