pub mod channels;
pub mod mesh;
pub mod outline;
