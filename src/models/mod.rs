//! Data models for the portfolio backend.
//!
//! Wire shapes use camelCase to match the site frontend; request structs carry
//! their validation rules via `validator` derives.

mod blog_post;
mod case_study;
mod contact;
mod image;
mod profile;
mod user;

pub use blog_post::*;
pub use case_study::*;
pub use contact::*;
pub use image::*;
pub use profile::*;
pub use user::*;
