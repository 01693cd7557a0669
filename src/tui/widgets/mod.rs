pub mod filter_panel;
pub mod keybindings_modal;
pub mod logs;
pub mod range_slider;
pub mod results;
pub mod search_bar;
pub mod status_bar;
