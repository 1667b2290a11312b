pub mod synthetic_volume;
