pub mod file;

pub use file::FileAuthRepository;
