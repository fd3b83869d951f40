pub mod button_loop;
pub mod location_poller;
pub mod poll_once;
pub mod request_coordinator;
pub mod trigger_control;
