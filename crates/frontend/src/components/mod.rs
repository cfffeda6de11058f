pub mod claim_popup;
pub mod drawing_panel;
pub mod filter_panel;
pub mod header;
pub mod layer_control;
pub mod legend;
pub mod map_view;
pub mod search_panel;
