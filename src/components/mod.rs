pub mod add_city_overlay;
pub mod city_board;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use add_city_overlay::{AddCityOverlay, AddCityOverlayProps};
pub use city_board::{CityBoard, CityBoardProps};
