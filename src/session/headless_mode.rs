//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::events::DashboardMessage;
use crate::logging::init_headless_logger;
use crate::ui::dashboard::DashboardState;
use crate::ui::dashboard::utils::format_number;
use crate::ui::router::ViewRouter;
use log::info;
use std::error::Error;

/// Runs the dashboard without a terminal UI
///
/// Activity is written through the logger and every fresh results snapshot
/// is printed as a one-line summary until Ctrl+C.
pub async fn run_headless_mode(
    mut data: SessionData,
    candidate_limit: u32,
) -> Result<(), Box<dyn Error>> {
    init_headless_logger();
    let region = data.session.region().to_string();
    print_session_starting("headless", &region, &data.environment.to_string());

    // Trigger shutdown on Ctrl+C
    let shutdown_sender_clone = data.shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_sender_clone.send(());
        }
    });
    let mut shutdown_receiver = data.shutdown_sender.subscribe();

    let mut state = DashboardState::new(
        data.environment.clone(),
        region,
        ViewRouter::new(candidate_limit),
        false,
    );
    state.start(&mut data.session);

    loop {
        tokio::select! {
            Some(message) = data.message_receiver.recv() => {
                if let DashboardMessage::Activity(event) = &message {
                    event.log();
                }
                let previous_update = state.last_update.clone();
                state.handle_message(&mut data.session, message);
                if state.last_update != previous_update {
                    log_results_summary(&state);
                }
            }
            _ = shutdown_receiver.recv() => {
                break;
            }
        }
    }

    data.session.shutdown();

    // Wait for workers to finish
    print_session_shutdown();
    for handle in data.join_handles {
        let _ = handle.await;
    }
    print_session_exit_success();

    Ok(())
}

fn log_results_summary(state: &DashboardState) {
    let counted = state
        .progress
        .as_ref()
        .map(|p| format!("{:.2}%", p.percentage_counted))
        .unwrap_or_else(|| "n/a".to_string());
    let leader = state
        .results
        .leader()
        .map(|row| format!("{} {:.2}%", row.party_name, row.percentage))
        .unwrap_or_else(|| "none".to_string());
    info!(
        "[{}] counted {}, {} votes, leading: {}",
        state.region_name(),
        counted,
        format_number(state.results.total_votes()),
        leader
    );
    for row in state.results.rows().iter().take(5) {
        info!(
            "  {:>2}. {:<32} {:>6.2}% {}",
            row.rank,
            row.party_name,
            row.percentage,
            row.trend.symbol()
        );
    }
}
