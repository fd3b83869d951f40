use crate::{
    app::location_poller::PollUpdate, domain::button::ControlAction, ports::ClockPort,
    ui::tui::ButtonModel,
};

pub(super) fn apply_action<K>(action: ControlAction, model: &mut ButtonModel, clock: &K)
where
    K: ClockPort,
{
    match action {
        ControlAction::Poll => {
            model.status_line = "polling".to_string();
            model.poll_started_at = Some(clock.now());
            model.cars_available = None;
            model.spinner_tick = 0;
        }
        ControlAction::Cancel => {
            model.status_line = "cancelled".to_string();
            model.poll_started_at = None;
        }
    }
}

pub(super) fn apply_poll_update<K>(update: Option<PollUpdate>, model: &mut ButtonModel, clock: &K)
where
    K: ClockPort,
{
    model.poll_started_at = None;
    model.last_finished_at = Some(clock.now());

    match update {
        Some(PollUpdate::Finished { available, body }) => {
            model.cars_available = Some(available);
            model.status_line = "ok".to_string();
            model.last_body = Some(body);
        }
        Some(PollUpdate::Failed { message }) => {
            model.failure_count += 1;
            model.status_line = format!("poll failed: {message}");
        }
        None => {
            model.status_line = "poll session ended".to_string();
        }
    }
}
