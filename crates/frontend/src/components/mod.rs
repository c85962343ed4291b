pub mod filter_panel;
pub mod listing_card;
pub mod map_view;
