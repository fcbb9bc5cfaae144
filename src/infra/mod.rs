pub mod camp;
