//! Mirrors every bus notice into the structured log.

use desk_telemetry::log_event;
use shared_bus::{DeskEvent, EventFilter, EventTopic, InMemoryEventBus};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

/// Subscribe before spawning so no event published after this call is missed.
pub fn spawn_event_logger(bus: &InMemoryEventBus) -> JoinHandle<()> {
    let mut stream = bus.event_stream(EventFilter::all());
    tokio::spawn(async move {
        while let Some(event) = stream.next().await {
            log_desk_event(&event);
        }
    })
}

pub fn log_desk_event(event: &DeskEvent) {
    let message = event.message();
    let record = event.record().map(|r| r.0);
    match event {
        DeskEvent::OperationFailed { source, failure } => log_event!(
            warn,
            source.as_str(),
            "Operation failed",
            kind = %failure.kind,
            record_id = ?record,
            detail = %message
        ),
        _ if event.topic() == EventTopic::Session => log_event!(
            info,
            "cr-05",
            "Session changed",
            detail = %message
        ),
        _ => log_event!(
            info,
            "cr-03",
            "Desk notice",
            topic = ?event.topic(),
            record_id = ?record,
            detail = %message
        ),
    }
}
