pub mod instagram;

pub use instagram::InstagramSource;
