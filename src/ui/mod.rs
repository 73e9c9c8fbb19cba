//! User interface module.
//!
//! tag-bump runs unattended in CI, so there are no prompts; this module only
//! renders status lines and warnings.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_manual_push_instruction,
    display_proposed_tag, display_status, display_success, display_tag_message,
    format_proposed_tag, format_tag_message,
};
