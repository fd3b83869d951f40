use std::{sync::Arc, time::Duration};

use anyhow::Result;
use futures_util::StreamExt;
use tokio::time::MissedTickBehavior;

use crate::{
    app::{location_poller::LocationPoller, trigger_control::TriggerControl},
    config::Config,
    domain::session::ControlState,
    infra::alert::ChannelAlert,
    ports::{ClockPort, GeolocationPort, TransportPort},
    ui::tui::{ButtonModel, TerminalUi},
};

mod poll_result;
mod stream_controller;

use poll_result::{apply_action, apply_poll_update};
use stream_controller::{handle_stream_event, LoopControl};

const SPINNER_REDRAW_INTERVAL_MS: u64 = 120;

/// Runs the interactive button until the user quits. Quitting tears the
/// control down, which cancels any session still in flight.
pub async fn run_button<G, T, K>(
    config: &Config,
    geolocation: Arc<G>,
    transport: Arc<T>,
    clock: &K,
) -> Result<()>
where
    G: GeolocationPort + 'static,
    T: TransportPort + 'static,
    K: ClockPort,
{
    let (alerts, mut alert_rx) = ChannelAlert::new();
    let poller = LocationPoller::new(geolocation, transport, alerts, config.poller_settings());
    let mut control = TriggerControl::new(
        poller,
        config.button.states(),
        config.button.transition_duration_ms,
    );

    let mut ui = TerminalUi::new()?;
    let mut model = ButtonModel::new();
    model.status_line = "ready".to_string();
    ui.draw(&control.button_props(), &model)?;

    let mut spinner_interval =
        tokio::time::interval(Duration::from_millis(SPINNER_REDRAW_INTERVAL_MS));
    spinner_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    spinner_interval.tick().await;
    let mut reader = crossterm::event::EventStream::new();

    loop {
        let polling = control.state() == ControlState::Polling;

        tokio::select! {
            _ = spinner_interval.tick(), if polling => {
                model.spinner_tick = model.spinner_tick.wrapping_add(1);
                ui.draw(&control.button_props(), &model)?;
            }
            update = control.poller_mut().next_update(), if polling => {
                control.settle();
                apply_poll_update(update, &mut model, clock);
                ui.draw(&control.button_props(), &model)?;
            }
            Some(message) = alert_rx.recv() => {
                model.show_alert(message);
                ui.draw(&control.button_props(), &model)?;
            }
            maybe_event = reader.next() => {
                let terminal_area = ui.terminal_area().unwrap_or_default();
                match handle_stream_event(maybe_event, &mut model, clock, terminal_area) {
                    LoopControl::Quit => break,
                    LoopControl::Activate => {
                        let action = control.activate();
                        apply_action(action, &mut model, clock);
                        ui.draw(&control.button_props(), &model)?;
                    }
                    LoopControl::Redraw => {
                        ui.draw(&control.button_props(), &model)?;
                    }
                    LoopControl::Continue => {}
                }
            }
        }
    }

    control.teardown();
    Ok(())
}
