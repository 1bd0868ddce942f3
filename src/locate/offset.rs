//! Points relative to a located anchor.

use crate::types::Point;
use crate::util::ScreenMatchError;
use std::fmt;
use std::str::FromStr;

/// Cardinal direction on screen; y grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl FromStr for Direction {
    type Err = ScreenMatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(ScreenMatchError::InvalidDirection {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

/// Moves `point` by `pixels` in `direction`, leaving the other axis alone.
pub fn offset(point: Point, direction: Direction, pixels: i32) -> Point {
    let d = f64::from(pixels);
    match direction {
        Direction::Up => Point::new(point.x, point.y - d),
        Direction::Down => Point::new(point.x, point.y + d),
        Direction::Left => Point::new(point.x - d, point.y),
        Direction::Right => Point::new(point.x + d, point.y),
    }
}
