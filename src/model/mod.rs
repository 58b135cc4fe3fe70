pub mod game_detail;
pub mod owned_game;
