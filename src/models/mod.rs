pub mod clock_event;
pub mod coords;
pub mod daily_total;
pub mod event_kind;
pub mod location;
pub mod session_state;
pub mod user;
