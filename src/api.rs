pub mod semo;
