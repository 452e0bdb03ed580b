// Command handlers
use anyhow::Context;
use std::path::Path;

use crate::application::event_view::EventDetailsView;
use crate::application::resources::{
    AuxDataAccessor, AuxSensorsAccessor, EventDownloadAccessor, EventParams, SensorEventsAccessor,
    SensorEventsParams, SensorsAccessor,
};
use crate::domain::event::EventDetails;
use crate::infrastructure::csv_export::save_event_csv;
use crate::presentation::app_state::AppState;
use crate::presentation::cli::Command;
use crate::presentation::views::{
    render_aux_data, render_event_details, render_events, render_sensor_table,
};

pub async fn run(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Sensors => list_sensors(state).await,
        Command::Events { sensor_id, last } => list_events(state, sensor_id, last).await,
        Command::Event {
            sensor_id,
            event_id,
            all,
            watch,
        } => {
            let params = EventParams {
                sensor_id,
                event_id,
                hidden: !all,
            };
            show_event(state, params, watch).await
        }
        Command::Download {
            sensor_id,
            event_id,
            all,
            out,
        } => {
            let params = EventParams {
                sensor_id,
                event_id,
                hidden: !all,
            };
            let dir = out.as_deref().unwrap_or(state.output_dir.as_path());
            download_event(state, params, dir).await
        }
        Command::AuxSensors => list_aux_sensors(state).await,
        Command::AuxData { sensor_id } => show_aux_data(state, sensor_id).await,
    }
}

async fn list_sensors(state: &AppState) -> anyhow::Result<()> {
    let sensors = SensorsAccessor::mount(state.http.clone(), state.endpoints.clone(), ()).await;
    print!("{}", render_sensor_table(&sensors.value()));
    Ok(())
}

async fn list_events(state: &AppState, sensor_id: String, last: Option<u32>) -> anyhow::Result<()> {
    let params = SensorEventsParams {
        sensor_id: sensor_id.clone(),
        last,
    };
    let events =
        SensorEventsAccessor::mount(state.http.clone(), state.endpoints.clone(), params).await;
    print!("{}", render_events(&sensor_id, &events.value()));
    Ok(())
}

async fn show_event(state: &AppState, params: EventParams, watch: bool) -> anyhow::Result<()> {
    let events_params = SensorEventsParams {
        sensor_id: params.sensor_id.clone(),
        last: None,
    };
    let (mut view, events, sensors) = tokio::join!(
        EventDetailsView::mount(
            state.http.clone(),
            state.endpoints.clone(),
            params.clone(),
            state.poll_interval,
        ),
        SensorEventsAccessor::mount(state.http.clone(), state.endpoints.clone(), events_params),
        SensorsAccessor::mount(state.http.clone(), state.endpoints.clone(), ()),
    );

    let event_number = params.event_id.parse::<i64>().ok();
    let timestamp = event_number
        .and_then(|id| events.with_value(|e| e.timestamp_of(id).map(str::to_string)))
        .unwrap_or_else(|| "N/A".to_string());

    let render = |details: &EventDetails| -> anyhow::Result<()> {
        let page = render_event_details(&params.sensor_id, &params.event_id, &timestamp, details)?;
        print!("{}", page);
        Ok(())
    };

    if let Err(e) = render(&view.details()) {
        view.teardown().await;
        return Err(e);
    }

    if let Some(current) = event_number {
        let sensor = sensors.with_value(|all| {
            all.iter()
                .find(|s| s.id.to_string() == params.sensor_id)
                .cloned()
        });
        if let Some(sensor) = sensor {
            let prev = sensor.prev_event(current).map_or("-".to_string(), |id| id.to_string());
            let next = sensor.next_event(current).map_or("-".to_string(), |id| id.to_string());
            println!("\nPrev: {}  Next: {}", prev, next);
        }
    }

    let result = if watch {
        watch_event(&mut view, render).await
    } else {
        Ok(())
    };

    view.teardown().await;
    result
}

/// Re-render on every replacement until streaming ends or Ctrl-C
async fn watch_event(
    view: &mut EventDetailsView,
    render: impl Fn(&EventDetails) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let mut updates = view.subscribe();
    updates.mark_unchanged();

    while view.is_polling() {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let details = updates.borrow_and_update().clone();
                println!();
                render(&details)?;
                view.sync_polling();
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping live poll");
                break;
            }
        }
    }
    Ok(())
}

async fn download_event(state: &AppState, params: EventParams, dir: &Path) -> anyhow::Result<()> {
    let download =
        EventDownloadAccessor::mount(state.http.clone(), state.endpoints.clone(), params.clone())
            .await;

    let path = save_event_csv(dir, &params.sensor_id, &params.event_id, download.value().as_ref())
        .await
        .with_context(|| format!("Downloading event {} of sensor {}", params.event_id, params.sensor_id))?;

    println!("{}", path.display());
    Ok(())
}

async fn list_aux_sensors(state: &AppState) -> anyhow::Result<()> {
    let sensors = AuxSensorsAccessor::mount(state.http.clone(), state.endpoints.clone(), ()).await;
    print!("{}", render_sensor_table(&sensors.value()));
    Ok(())
}

async fn show_aux_data(state: &AppState, sensor_id: String) -> anyhow::Result<()> {
    let data =
        AuxDataAccessor::mount(state.http.clone(), state.endpoints.clone(), sensor_id.clone())
            .await;
    print!("{}", render_aux_data(&sensor_id, &data.value()));
    Ok(())
}
