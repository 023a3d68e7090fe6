pub mod compress;
pub mod info;
pub mod interactive;
pub mod merge;
pub mod split;
