pub mod control;
pub mod decision;
pub mod distance_map;
pub mod frame;
pub mod frame_window;
pub mod smoothing;
