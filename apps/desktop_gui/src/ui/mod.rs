//! UI layer: app shell, views, and form rendering.

pub mod app;

pub use app::BlogdeskApp;
