pub mod note;
pub mod output;
pub mod pitch;
pub mod render;
pub mod score;
pub mod synth;
pub mod wave;

// Utility modules
pub mod rational;
pub mod util;
