//! UI module - handles all TUI rendering
//!
//! Structure:
//! - `draw.rs` - Main draw functions, one per route
//! - `theme.rs` - Color themes and presets
//! - `table.rs` - Data table widget
//! - `forms.rs` - Text input, select and checklist widgets

mod draw;
pub mod forms;
pub mod table;
pub mod theme;

pub use draw::draw;
pub use theme::Theme;
