pub mod bitmap;
pub mod ring;
