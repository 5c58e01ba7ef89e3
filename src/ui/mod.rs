//! User interface module.
//!
//! helm-release never prompts; it only reports what it did. Styling lives in
//! `formatter`.

pub mod formatter;

pub use formatter::{
    display_error, display_success, display_version_change, display_warning,
    format_version_change,
};
