pub mod image_reader;
pub mod image_store;
pub mod image_writer;
