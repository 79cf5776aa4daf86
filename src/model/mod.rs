pub use biotope_core::NetworkLogic;
pub mod brain {
    pub use biotope_core::brain::*;
}
pub mod config {
    pub use biotope_core::config::*;
}
pub mod spatial_grid {
    pub use biotope_core::spatial_grid::*;
}
pub mod lifecycle {
    pub use biotope_core::lifecycle::*;
}
pub mod step {
    pub use biotope_core::step::*;
}
pub mod persistence {
    pub use biotope_io::*;
}
pub mod state {
    pub use biotope_data::*;
}

pub mod host;
