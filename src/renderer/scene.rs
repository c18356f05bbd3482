//! Game state to triangle list
//!
//! Pure functions of simulation state: no GPU, no DOM. Every game draws in
//! its own world pixels; [`Scene::world`] tells the pipeline how large that
//! world is.

use glam::Vec2;

use super::shapes::{
    circle, convex_polygon, line, rect, rect_outline, ring, rotated_rect,
};
use super::vertex::{Vertex, colors};
use crate::profile::Theme;
use crate::sim::lawn::{self, PlantKind};
use crate::sim::platformer::{self, ActorKind};
use crate::sim::track::TrackShape;
use crate::sim::{
    AnyGame, GuessGame, LawnGame, Obstacle, PlatformerGame, PlayerSlot, RaceGame, Rect,
    RedLightGame, Signal, SnakeGame, TanksGame, TicTacToeGame, red_light, snake, tanks,
    tictactoe,
};

const SEGMENTS: u32 = 24;

pub struct Scene {
    pub vertices: Vec<Vertex>,
    /// World extent in pixels, origin top-left, y down
    pub world: Vec2,
}

fn player_color(slot: PlayerSlot) -> [f32; 4] {
    match slot {
        PlayerSlot::One => colors::PLAYER1,
        PlayerSlot::Two => colors::PLAYER2,
    }
}

fn arena_color(theme: Theme) -> [f32; 4] {
    match theme {
        Theme::Light => colors::ARENA_LIGHT,
        Theme::Dark => colors::ARENA_DARK,
    }
}

/// Color the canvas is cleared to outside the world rect
pub fn clear_color(theme: Theme) -> [f32; 4] {
    match theme {
        Theme::Light => colors::BACKGROUND_LIGHT,
        Theme::Dark => colors::BACKGROUND_DARK,
    }
}

pub fn build_scene(game: &AnyGame, theme: Theme) -> Scene {
    let mut out = Vec::with_capacity(2048);
    let world = match game {
        AnyGame::Tanks(g) => draw_tanks(&mut out, g, theme),
        AnyGame::Race(g) => draw_race(&mut out, g),
        AnyGame::RedLight(g) => draw_red_light(&mut out, g, theme),
        AnyGame::Lawn(g) => draw_lawn(&mut out, g),
        AnyGame::Platformer(g) => draw_platformer(&mut out, g),
        AnyGame::Snake(g) => draw_snake(&mut out, g, theme),
        AnyGame::TicTacToe(g) => draw_tictactoe(&mut out, g, theme),
        AnyGame::Guess(g) => draw_guess(&mut out, g, theme),
    };
    Scene {
        vertices: out,
        world,
    }
}

fn draw_obstacle(out: &mut Vec<Vertex>, obstacle: &Obstacle, color: [f32; 4]) {
    match *obstacle {
        Obstacle::Circle { x, y, r } => circle(out, Vec2::new(x, y), r, color, SEGMENTS),
        Obstacle::Rect { x, y, w, h } => rect(out, &Rect::new(x, y, w, h), color),
    }
}

fn draw_tanks(out: &mut Vec<Vertex>, game: &TanksGame, theme: Theme) -> Vec2 {
    let arena = game.arena();
    rect(out, &Rect::new(0.0, 0.0, arena.width, arena.height), arena_color(theme));
    rect_outline(
        out,
        &Rect::new(0.0, 0.0, arena.width, arena.height),
        2.0,
        colors::WALL,
    );

    for slot in PlayerSlot::BOTH {
        let tank = game.tank(slot);
        if tank.hp == 0 {
            continue;
        }
        let body = &tank.body;
        rotated_rect(out, body.pos, Vec2::new(15.0, 11.0), body.heading, player_color(slot));
        line(out, body.pos, body.pos + body.forward() * 22.0, 4.0, colors::BARREL);

        // hp pips above the hull
        for i in 0..tank.hp {
            let x = body.pos.x - (tanks::MAX_HP as f32 * 3.0) + i as f32 * 6.0;
            rect(out, &Rect::new(x, body.pos.y - 26.0, 4.0, 3.0), player_color(slot));
        }
    }

    for shell in &game.shells {
        circle(out, shell.pos, 3.0, colors::SHELL, 8);
    }
    Vec2::new(arena.width, arena.height)
}

fn draw_race(out: &mut Vec<Vertex>, game: &RaceGame) -> Vec2 {
    let track = game.track();
    let arena = &track.arena;
    rect(out, &Rect::new(0.0, 0.0, arena.width, arena.height), colors::GRASS);

    match &track.shape {
        TrackShape::Ring {
            center,
            inner_radius,
            outer_radius,
            ..
        } => ring(out, *center, *inner_radius, *outer_radius, colors::ASPHALT, 64),
        TrackShape::Polygon { outer, inner, .. } => {
            convex_polygon(out, outer, colors::ASPHALT);
            convex_polygon(out, inner, colors::GRASS);
        }
    }

    let (a, b) = track.finish_segment();
    line(out, a, b, track.finish_width.max(4.0), colors::FINISH);

    for wall in &track.walls {
        draw_obstacle(out, wall, colors::WALL);
    }

    let radius = game.params().radius;
    for slot in PlayerSlot::BOTH {
        let body = &game.car(slot).body;
        rotated_rect(
            out,
            body.pos,
            Vec2::new(radius * 1.4, radius * 0.8),
            body.heading,
            player_color(slot),
        );
        circle(out, body.pos + body.forward() * radius, 3.0, colors::FINISH, 8);
    }
    Vec2::new(arena.width, arena.height)
}

fn grid_lines(out: &mut Vec<Vertex>, cols: i32, rows: i32, cell: f32) {
    let (w, h) = (cols as f32 * cell, rows as f32 * cell);
    for c in 1..cols {
        let x = c as f32 * cell;
        line(out, Vec2::new(x, 0.0), Vec2::new(x, h), 1.0, colors::GRID);
    }
    for r in 1..rows {
        let y = r as f32 * cell;
        line(out, Vec2::new(0.0, y), Vec2::new(w, y), 1.0, colors::GRID);
    }
}

fn draw_red_light(out: &mut Vec<Vertex>, game: &RedLightGame, theme: Theme) -> Vec2 {
    let cell = red_light::CELL;
    let world = Vec2::new(red_light::COLS as f32 * cell, red_light::ROWS as f32 * cell);
    rect(out, &Rect::new(0.0, 0.0, world.x, world.y), arena_color(theme));
    rect(
        out,
        &Rect::new(0.0, red_light::FINISH_ROW as f32 * cell, world.x, cell),
        colors::FINISH_ROW,
    );
    grid_lines(out, red_light::COLS, red_light::ROWS, cell);

    for slot in PlayerSlot::BOTH {
        let p = game.player(slot);
        let center = Vec2::new(p.x as f32 + 0.5, p.y as f32 + 0.5) * cell;
        circle(out, center, cell * 0.45, player_color(slot), 16);
    }

    let signal = match game.signal() {
        Signal::Red => colors::SIGNAL_RED,
        Signal::Green => colors::SIGNAL_GREEN,
    };
    circle(out, Vec2::new(world.x - cell * 1.5, cell * 1.5), cell, signal, SEGMENTS);
    world
}

fn plant_color(kind: PlantKind) -> [f32; 4] {
    match kind {
        PlantKind::Peashooter => colors::PEASHOOTER,
        PlantKind::Sunflower => colors::SUNFLOWER,
        PlantKind::Wallnut => colors::WALLNUT,
        PlantKind::CherryBomb => colors::CHERRY,
    }
}

fn draw_lawn(out: &mut Vec<Vertex>, game: &LawnGame) -> Vec2 {
    rect(out, &Rect::new(0.0, 0.0, lawn::WIDTH, lawn::HEIGHT), colors::SKY);
    rect(
        out,
        &Rect::new(0.0, lawn::MARGIN_TOP, lawn::HOUSE_W, lawn::ROWS as f32 * lawn::TILE_H),
        colors::HOUSE,
    );
    rect(
        out,
        &Rect::new(
            lawn::WIDTH - lawn::STREET_W,
            lawn::MARGIN_TOP,
            lawn::STREET_W,
            lawn::ROWS as f32 * lawn::TILE_H,
        ),
        colors::STREET,
    );

    for row in 0..lawn::ROWS {
        for col in 0..lawn::COLS {
            let shade = if (row + col) % 2 == 0 {
                colors::LAWN_LIGHT
            } else {
                colors::LAWN_DARK
            };
            rect(out, &lawn::cell_rect(row, col), shade);
        }
    }

    for (row, col, plant) in game.plants() {
        let r = lawn::cell_rect(row, col);
        let center = Vec2::new(r.x + r.w * 0.5, r.y + r.h * 0.5);
        let health = (plant.hp / plant.kind.max_hp()).clamp(0.0, 1.0);
        circle(out, center, 28.0, plant_color(plant.kind), SEGMENTS);
        rect(
            out,
            &Rect::new(r.x + 10.0, r.bottom() - 10.0, (r.w - 20.0) * health, 4.0),
            colors::HOUSE,
        );
    }

    for (row, mower) in game.mowers.iter().enumerate() {
        if mower.used && !mower.active {
            continue;
        }
        let y = lawn::cell_rect(row, 0).y + lawn::TILE_H * 0.5;
        rect(out, &Rect::new(mower.x - 20.0, y - 15.0, 40.0, 30.0), colors::MOWER);
    }

    for zombie in &game.zombies {
        let color = if zombie.eating {
            [colors::ZOMBIE[0] * 0.8, colors::ZOMBIE[1] * 0.8, colors::ZOMBIE[2] * 0.8, 1.0]
        } else {
            colors::ZOMBIE
        };
        rect(out, &Rect::new(zombie.x, zombie.y() - 40.0, 40.0, 80.0), color);
    }

    for pea in &game.peas {
        circle(out, pea.pos, 8.0, colors::PEA, 10);
    }
    for sun in &game.suns {
        circle(out, sun.pos, 20.0, colors::SUN, SEGMENTS);
    }

    // seed-packet bar along the top
    for (i, kind) in PlantKind::ALL.into_iter().enumerate() {
        let slot = Rect::new(lawn::HOUSE_W + i as f32 * 70.0, 10.0, 60.0, 60.0);
        rect(out, &slot, plant_color(kind));
        if game.selected == Some(kind) {
            rect_outline(out, &slot, 3.0, colors::FINISH);
        }
    }
    Vec2::new(lawn::WIDTH, lawn::HEIGHT)
}

fn draw_platformer(out: &mut Vec<Vertex>, game: &PlatformerGame) -> Vec2 {
    let view = Vec2::new(platformer::VIEW_WIDTH, platformer::VIEW_HEIGHT);
    rect(out, &Rect::new(0.0, 0.0, view.x, view.y), colors::SKY);
    let shift = Vec2::new(-game.camera_x, 0.0);

    for actor in &game.actors {
        let r = actor.body.rect();
        let r = Rect::new(r.x + shift.x, r.y, r.w, r.h);
        if r.right() < 0.0 || r.x > view.x {
            continue;
        }
        match actor.kind {
            ActorKind::Ground => rect(out, &r, colors::GROUND),
            ActorKind::Crate => {
                rect(out, &r, colors::CRATE);
                rect_outline(out, &r, 3.0, colors::WALLNUT);
            }
            ActorKind::Enemy { alive, .. } => {
                if alive {
                    rect(out, &r, colors::ENEMY);
                }
            }
            ActorKind::Flag => {
                rect(out, &Rect::new(r.x, r.y, 5.0, r.h), colors::WALL);
                rect(out, &Rect::new(r.x + 5.0, r.y, r.w - 5.0, r.h * 0.3), colors::FLAG);
            }
        }
    }

    let ball = &game.ball;
    // blink while invulnerable
    let visible = ball.invulnerable <= 0.0 || (ball.invulnerable as u32 / 5) % 2 == 0;
    if visible {
        let center = ball.pos + shift;
        circle(out, center, platformer::BALL_RADIUS, colors::BALL, SEGMENTS);
        let spoke = Vec2::from_angle(ball.rotation) * platformer::BALL_RADIUS * 0.7;
        line(out, center - spoke, center + spoke, 3.0, colors::FINISH);
    }

    for i in 0..ball.hp {
        circle(out, Vec2::new(20.0 + i as f32 * 24.0, 20.0), 8.0, colors::BALL, 12);
    }
    view
}

fn draw_snake(out: &mut Vec<Vertex>, game: &SnakeGame, theme: Theme) -> Vec2 {
    let cell = snake::CELL;
    let world = Vec2::new(snake::COLS as f32 * cell, snake::ROWS as f32 * cell);
    rect(out, &Rect::new(0.0, 0.0, world.x, world.y), arena_color(theme));
    grid_lines(out, snake::COLS, snake::ROWS, cell);

    let apple = game.apple;
    circle(
        out,
        Vec2::new(apple.x as f32 + 0.5, apple.y as f32 + 0.5) * cell,
        cell * 0.4,
        colors::APPLE,
        16,
    );

    for slot in PlayerSlot::BOTH {
        let color = player_color(slot);
        for (i, c) in game.snake(slot).body.iter().enumerate() {
            let inset = if i == 0 { 0.0 } else { 2.0 };
            rect(
                out,
                &Rect::new(
                    c.x as f32 * cell + inset,
                    c.y as f32 * cell + inset,
                    cell - 2.0 * inset,
                    cell - 2.0 * inset,
                ),
                color,
            );
        }
    }
    world
}

fn draw_tictactoe(out: &mut Vec<Vertex>, game: &TicTacToeGame, theme: Theme) -> Vec2 {
    let size = tictactoe::BOARD_SIZE;
    let cell = tictactoe::CELL;
    rect(out, &Rect::new(0.0, 0.0, size, size), arena_color(theme));
    for i in 1..3 {
        let at = i as f32 * cell;
        line(out, Vec2::new(at, 0.0), Vec2::new(at, size), 4.0, colors::BOARD_LINE);
        line(out, Vec2::new(0.0, at), Vec2::new(size, at), 4.0, colors::BOARD_LINE);
    }

    for (idx, mark) in game.board.iter().enumerate() {
        let Some(slot) = mark else { continue };
        let center = Vec2::new((idx % 3) as f32 + 0.5, (idx / 3) as f32 + 0.5) * cell;
        let reach = cell * 0.3;
        match slot {
            PlayerSlot::One => {
                line(out, center - Vec2::splat(reach), center + Vec2::splat(reach), 8.0, colors::PLAYER1);
                line(
                    out,
                    center + Vec2::new(-reach, reach),
                    center + Vec2::new(reach, -reach),
                    8.0,
                    colors::PLAYER1,
                );
            }
            PlayerSlot::Two => ring(out, center, reach - 4.0, reach + 4.0, colors::PLAYER2, 32),
        }
    }
    Vec2::splat(size)
}

/// Guessing is played in the page form; the canvas only shows the backdrop
fn draw_guess(out: &mut Vec<Vertex>, _game: &GuessGame, theme: Theme) -> Vec2 {
    let world = Vec2::new(400.0, 200.0);
    rect(out, &Rect::new(0.0, 0.0, world.x, world.y), arena_color(theme));
    world
}
