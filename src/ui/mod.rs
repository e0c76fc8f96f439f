pub mod celebration_ui;
pub mod controls_ui;
pub mod difficulty_picker_ui;
pub mod game_info_ui;
pub mod leaderboard_ui;
pub mod play_area_ui;
pub mod result_ui;
pub mod window;
