//! Reference native surfaces for headless use

pub mod display_list;
pub mod software;

pub use display_list::{DisplayCommand, DisplayList, DisplayListProvider};
pub use software::{SoftwareContext, SoftwareProvider};
