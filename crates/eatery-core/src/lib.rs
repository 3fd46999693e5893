//! Core domain logic for campus dining.
//!
//! This crate contains the pure, synchronous parts of the engine:
//! - Calendar days pinned to campus local time
//! - Open/closed status at an instant
//! - Nearest-neighbour wait-time sampling
//! - Consolidation of daily hours into weekly ranges
//! - Composable predicates for filtering eateries

pub mod clock;
pub mod day;
pub mod eatery;
pub mod event;
pub mod filter;
pub mod format;
pub mod location;
pub mod schedule;
pub mod status;
mod types;
pub mod wait_time;

pub use clock::{Clock, ManualClock, SystemClock};
pub use day::{CAMPUS_TZ, Day};
pub use eatery::{Eatery, EateryMetadata, MetadataLookup};
pub use event::{Event, Menu, MenuCategory, MenuItem, Schedule};
pub use filter::{EateryFilter, EateryPredicate, filter_eateries};
pub use format::{format_status, format_time};
pub use location::Location;
pub use schedule::{ScheduleRange, consolidate, expand, range_label, range_labels, weekly_hours};
pub use status::{Status, status};
pub use types::{EateryId, PaymentMethod, SessionId, ValidationError};
pub use wait_time::{SamplingMethod, WaitTimeBucket, WaitTimeSample, WaitTimes};
