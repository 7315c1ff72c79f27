//! Native entry point for the voxel game.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release
//! ```

fn main() {
    voxel_game::run();
}
