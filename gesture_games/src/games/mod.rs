//! The five games and the factory that builds a session for each.

pub mod balloon_pop;
pub mod catch_droplets;
pub mod color_match;
pub mod connect_dots;
pub mod shape_drawing;

use rand::rngs::StdRng;

use crate::config::Config;
use crate::menu::GameId;
use crate::session::{ArcadeSession, Arena, Game};
use crate::sketch::DrawingSession;

pub use balloon_pop::BalloonPop;
pub use catch_droplets::CatchDroplets;
pub use color_match::ColorMatch;
pub use connect_dots::ConnectDots;
pub use shape_drawing::ShapeDrawing;

/// A fresh session of `game` for the configured player.
pub fn new_session(game: GameId, config: &Config, rng: StdRng) -> Box<dyn Game> {
    let arena = Arena::new(config.window.width, config.window.height);
    let palette = config.palette.clone();
    let player = config.player.name.as_str();
    let games = &config.games;

    match game {
        GameId::BalloonPop => Box::new(ArcadeSession::new(
            BalloonPop::new(&games.balloon_pop, &palette),
            arena,
            palette,
            player,
            rng,
        )),
        GameId::CatchDroplets => Box::new(ArcadeSession::new(
            CatchDroplets::new(&games.catch_droplets, &palette),
            arena,
            palette,
            player,
            rng,
        )),
        GameId::ColorMatch => Box::new(ColorMatch::new(&games.color_match, arena, palette, player, rng)),
        GameId::ConnectDots => Box::new(DrawingSession::new(
            ConnectDots::new(&games.connect_dots),
            arena,
            palette,
            player,
            rng,
        )),
        GameId::ShapeDrawing => Box::new(DrawingSession::new(
            ShapeDrawing::new(&games.shape_drawing),
            arena,
            palette,
            player,
            rng,
        )),
    }
}
