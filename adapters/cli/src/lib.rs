#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame loop and start-up helpers behind the `duskfall` binary.

mod loading;
mod simulation;

pub use loading::{load_config, load_level};
pub use simulation::{Simulation, Summary};
