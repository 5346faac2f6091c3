//! Terminal image gallery.
//!
//! Images come from an [`source::ImageSource`], are loaded on a background
//! task ([`tasks`]), and are shown one page at a time through the pure
//! filter → sort → paginate pipeline in [`gallery`].

pub mod app;
pub mod config;
pub mod gallery;
pub mod logging;
pub mod model;
pub mod source;
pub mod tasks;
pub mod ui;
