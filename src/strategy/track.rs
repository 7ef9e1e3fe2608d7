//! Trains running over a fixed track graph.
//!
//! The figure's pixels are cut into track segments joined at their
//! endpoints. Each train holds every segment between its tail and its head
//! exclusively, so trains never overlap. A train whose head finds every
//! onward segment occupied waits, and after [`REVERSE_AFTER_STUCK_STEPS`]
//! consecutive stuck steps turns around.

use heapless::{Deque, Vec};

use super::{Strategy, TRAIN_FRAME_DELAY_MS};
use crate::color::{PixelExt, Rgb, WHITE};
use crate::frame::Frame;
use crate::rng::Rng64;

/// Most connections per segment endpoint.
pub const MAX_CONNECTIONS: usize = 3;
/// Most segments in a graph.
pub const MAX_TRACKS: usize = 32;
/// Most trains in one simulation.
pub const MAX_TRAINS: usize = 4;
/// Longest chain of segments one train may span.
pub const MAX_SPANNED: usize = 16;

/// Consecutive stuck steps after which a train reverses.
pub const REVERSE_AFTER_STUCK_STEPS: u16 = 60;

const TAIL_BRIGHTNESS: u16 = 64;
const BRIGHTNESS_STEP: u16 = 16;
const HEAD_WHITE_BLEND: u8 = 128;

/// Link from a segment endpoint onto another segment.
///
/// `start` is true when the train enters the target at its start index and
/// travels toward its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub track: u8,
    pub start: bool,
}

impl Connection {
    pub const fn to_start(track: u8) -> Self {
        Self { track, start: true }
    }

    pub const fn to_end(track: u8) -> Self {
        Self { track, start: false }
    }
}

pub type Links = [Option<Connection>; MAX_CONNECTIONS];

/// One segment, covering pixel indices `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    pub start: u16,
    pub end: u16,
    pub start_links: Links,
    pub end_links: Links,
}

impl Track {
    pub const fn new(start: u16, end: u16, start_links: Links, end_links: Links) -> Self {
        Self {
            start,
            end,
            start_links,
            end_links,
        }
    }

    /// Whether a cursor at `position` moving in `direction` has run out of track.
    pub const fn is_at_end(&self, position: u16, direction: i8) -> bool {
        if direction > 0 {
            position >= self.end
        } else {
            position <= self.start
        }
    }

    /// Links leaving the endpoint a cursor moving in `direction` arrives at.
    pub fn exits(&self, direction: i8) -> impl Iterator<Item = Connection> + '_ {
        let links = if direction > 0 {
            &self.end_links
        } else {
            &self.start_links
        };
        links.iter().flatten().copied()
    }

    /// Where a train entering through `connection` starts on this track.
    pub const fn entry(&self, connection: Connection) -> Cursor {
        if connection.start {
            Cursor {
                track: connection.track,
                position: self.start,
                direction: 1,
            }
        } else {
            Cursor {
                track: connection.track,
                position: self.end,
                direction: -1,
            }
        }
    }
}

const fn one(a: Connection) -> Links {
    [Some(a), None, None]
}

const fn two(a: Connection, b: Connection) -> Links {
    [Some(a), Some(b), None]
}

/// Default graph for the figure: a twelve segment loop with three chords.
pub static FIGURE_TRACKS: [Track; 12] = [
    Track::new(0, 27, two(Connection::to_end(11), Connection::to_start(6)), one(Connection::to_start(1))),
    Track::new(28, 55, one(Connection::to_end(0)), one(Connection::to_start(2))),
    Track::new(56, 83, one(Connection::to_end(1)), two(Connection::to_start(3), Connection::to_start(8))),
    Track::new(84, 111, one(Connection::to_end(2)), one(Connection::to_start(4))),
    Track::new(112, 139, one(Connection::to_end(3)), one(Connection::to_start(5))),
    Track::new(140, 167, one(Connection::to_end(4)), two(Connection::to_start(6), Connection::to_start(11))),
    Track::new(168, 195, two(Connection::to_end(5), Connection::to_start(0)), one(Connection::to_start(7))),
    Track::new(196, 223, one(Connection::to_end(6)), one(Connection::to_start(8))),
    Track::new(224, 251, two(Connection::to_end(7), Connection::to_end(2)), one(Connection::to_start(9))),
    Track::new(252, 279, one(Connection::to_end(8)), one(Connection::to_start(10))),
    Track::new(280, 303, one(Connection::to_end(9)), one(Connection::to_start(11))),
    Track::new(304, 328, two(Connection::to_end(10), Connection::to_end(5)), one(Connection::to_start(0))),
];

/// Where a train starts and how it looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainSpec {
    pub start_track: u8,
    pub max_length: u16,
    pub color: Rgb,
}

/// Trains the figure ships with.
pub const FIGURE_TRAINS: [TrainSpec; 3] = [
    TrainSpec {
        start_track: 0,
        max_length: 18,
        color: Rgb { r: 128, g: 0, b: 128 },
    },
    TrainSpec {
        start_track: 5,
        max_length: 12,
        color: Rgb { r: 0, g: 128, b: 128 },
    },
    TrainSpec {
        start_track: 10,
        max_length: 8,
        color: Rgb { r: 128, g: 128, b: 0 },
    },
];

/// A position on the graph plus the direction of travel (+1 or -1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub track: u8,
    pub position: u16,
    pub direction: i8,
}

impl Cursor {
    fn advance(&mut self) {
        self.position = self.position.wrapping_add_signed(i16::from(self.direction));
    }
}

#[derive(Debug, Clone)]
pub struct Train {
    color: Rgb,
    head: Cursor,
    tail: Cursor,
    /// Segments after the tail's one, up to and including the head's.
    spanned: Deque<Connection, MAX_SPANNED>,
    length: u16,
    max_length: u16,
    stuck_steps: u16,
}

impl Train {
    pub fn head(&self) -> Cursor {
        self.head
    }

    pub fn tail(&self) -> Cursor {
        self.tail
    }

    pub fn length(&self) -> u16 {
        self.length
    }

    pub fn stuck_steps(&self) -> u16 {
        self.stuck_steps
    }

    pub fn spanned(&self) -> impl Iterator<Item = &Connection> {
        self.spanned.iter()
    }

    fn is_growing(&self) -> bool {
        self.length < self.max_length
    }

    /// Swap head and tail and head back the way the train came.
    fn reverse(&mut self) {
        log::debug!(
            "trains: reversing at track {} position {}",
            self.head.track,
            self.head.position
        );
        core::mem::swap(&mut self.head, &mut self.tail);
        self.head.direction = -self.head.direction;
        self.tail.direction = -self.tail.direction;

        if self.spanned.is_empty() {
            return;
        }
        // The old head segment is now the tail's, the old tail segment is the
        // new head's.
        let mut reversed: Deque<Connection, MAX_SPANNED> = Deque::new();
        while let Some(connection) = self.spanned.pop_back() {
            let _ = reversed.push_back(Connection {
                track: connection.track,
                start: !connection.start,
            });
        }
        let _ = reversed.pop_front();
        let _ = reversed.push_back(Connection {
            track: self.head.track,
            start: self.head.direction > 0,
        });
        self.spanned = reversed;
    }
}

/// Multi-train simulation over a [`Track`] graph.
#[derive(Debug, Clone)]
pub struct TrackSimulation<'a> {
    tracks: &'a [Track],
    occupied: Vec<bool, MAX_TRACKS>,
    trains: Vec<Train, MAX_TRAINS>,
    rng: Rng64,
}

impl<'a> TrackSimulation<'a> {
    /// Place trains at the start of their start segments.
    ///
    /// Trains whose start segment is missing or already taken are left out.
    pub fn new(tracks: &'a [Track], specs: &[TrainSpec], seed: u64) -> Self {
        let mut occupied = Vec::new();
        for _ in tracks.iter().take(MAX_TRACKS) {
            let _ = occupied.push(false);
        }
        let mut simulation = Self {
            tracks,
            occupied,
            trains: Vec::new(),
            rng: Rng64::new(seed),
        };
        for spec in specs {
            simulation.add_train(spec);
        }
        simulation
    }

    fn add_train(&mut self, spec: &TrainSpec) {
        let index = usize::from(spec.start_track);
        let Some(track) = self.tracks.get(index) else {
            log::debug!("trains: no track {index}");
            return;
        };
        if self.is_occupied(spec.start_track) {
            log::debug!("trains: track {index} already taken");
            return;
        }
        let cursor = track.entry(Connection::to_start(spec.start_track));
        let train = Train {
            color: spec.color,
            head: cursor,
            tail: cursor,
            spanned: Deque::new(),
            length: 0,
            max_length: spec.max_length,
            stuck_steps: 0,
        };
        if self.trains.push(train).is_ok() {
            self.set_occupied(spec.start_track, true);
        }
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn is_occupied(&self, track: u8) -> bool {
        self.occupied.get(usize::from(track)).copied().unwrap_or(true)
    }

    fn set_occupied(&mut self, track: u8, value: bool) {
        if let Some(flag) = self.occupied.get_mut(usize::from(track)) {
            *flag = value;
        }
    }

    fn track(&self, index: u8) -> Option<&Track> {
        self.tracks.get(usize::from(index))
    }

    /// Advance every train by one step.
    pub fn step(&mut self) {
        for index in 0..self.trains.len() {
            self.drive(index);
        }
    }

    fn drive(&mut self, index: usize) {
        let head = self.trains[index].head;
        let Some(track) = self.track(head.track).copied() else {
            return;
        };

        if track.is_at_end(head.position, head.direction) {
            if let Some(connection) = self.pick_exit(&track, head.direction) {
                self.enter(index, connection);
            } else {
                let train = &mut self.trains[index];
                train.stuck_steps += 1;
                if train.stuck_steps >= REVERSE_AFTER_STUCK_STEPS {
                    train.reverse();
                    train.stuck_steps = 0;
                }
                return;
            }
        } else {
            let train = &mut self.trains[index];
            train.head.advance();
            train.stuck_steps = 0;
        }

        if self.trains[index].is_growing() {
            self.trains[index].length += 1;
        } else {
            self.advance_tail(index);
        }
    }

    fn pick_exit(&mut self, track: &Track, direction: i8) -> Option<Connection> {
        let free: Vec<Connection, MAX_CONNECTIONS> = track
            .exits(direction)
            .filter(|connection| !self.is_occupied(connection.track))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.below(free.len())])
    }

    fn enter(&mut self, index: usize, connection: Connection) {
        let Some(target) = self.track(connection.track).copied() else {
            return;
        };
        let train = &mut self.trains[index];
        if train.spanned.push_back(connection).is_err() {
            log::warn!("trains: train {index} spans too many segments");
            return;
        }
        train.head = target.entry(connection);
        train.stuck_steps = 0;
        self.set_occupied(connection.track, true);
    }

    fn advance_tail(&mut self, index: usize) {
        let tail = self.trains[index].tail;
        let Some(track) = self.track(tail.track).copied() else {
            return;
        };
        if !track.is_at_end(tail.position, tail.direction) {
            self.trains[index].tail.advance();
            return;
        }

        let Some(next) = self.trains[index].spanned.pop_front() else {
            return;
        };
        let Some(target) = self.track(next.track).copied() else {
            return;
        };
        self.set_occupied(tail.track, false);
        self.trains[index].tail = target.entry(next);
    }

    /// Draw from the tail up to and including the head pixel.
    fn draw_train(&self, train: &Train, frame: &mut Frame<'_>) {
        let mut cursor = train.tail;
        let mut spanned = train.spanned.iter();
        let mut brightness = TAIL_BRIGHTNESS;
        let mut remaining = u32::from(train.length) + 1;

        loop {
            #[allow(clippy::cast_possible_truncation)]
            let mut color = train.color.fade(brightness.min(255) as u8);
            if remaining == 1 {
                color = color.blend(WHITE, HEAD_WHITE_BLEND);
            }
            frame.set(usize::from(cursor.position), color.gamma_corrected());
            brightness = (brightness + BRIGHTNESS_STEP).min(255);

            remaining -= 1;
            if remaining == 0 {
                break;
            }
            let Some(track) = self.track(cursor.track) else {
                break;
            };
            if track.is_at_end(cursor.position, cursor.direction) {
                let Some(next) = spanned.next() else {
                    break;
                };
                let Some(target) = self.track(next.track) else {
                    break;
                };
                cursor = target.entry(*next);
            } else {
                cursor.advance();
            }
        }
    }
}

impl Strategy for TrackSimulation<'_> {
    fn draw_frame(&mut self, frame: &mut Frame<'_>, _frame_counter: u32) -> u32 {
        frame.clear();
        self.step();
        for train in &self.trains {
            self.draw_train(train, frame);
        }
        TRAIN_FRAME_DELAY_MS
    }
}
