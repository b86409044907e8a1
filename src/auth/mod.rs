pub mod keychain;

pub use keychain::*;
