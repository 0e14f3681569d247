//! Core of birthday-board.
//!
//! - [`csv`] and [`sheet`] turn a published sheet export into records
//! - [`birthday`] matches records against a reference date
//! - [`layout`] and [`display`] turn matches into a [`display::RenderPlan`]
//! - [`surface`] is the contract for whatever draws the plan
//! - [`board`] and [`scheduler`] run the fetch/render cycle on a timer

pub mod birthday;
pub mod board;
pub mod clock;
pub mod config;
pub mod csv;
pub mod display;
pub mod effects;
pub mod error;
pub mod layout;
pub mod scheduler;
pub mod sheet;
pub mod source;
pub mod surface;

pub use birthday::{BirthdayEntry, MatchSets, Row, select_birthdays};
pub use board::{Board, Cycle};
pub use error::{BoardError, BoardResult};
pub use sheet::Sheet;
