pub mod course_select;
pub mod filter_buttons;
pub mod map_view;
pub mod school_popup;
pub mod search_box;
pub mod zone_select;
