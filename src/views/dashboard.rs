use crate::api::{QueryStat, RemoteGateway};
use dioxus::prelude::*;
use std::time::Duration;

const ANALYTICS_LIMIT: usize = 20;
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Read-only polling display of the backend's top queries.
#[component]
pub fn DashboardView() -> Element {
    let gateway = use_context::<RemoteGateway>();
    let mut rows = use_signal(Vec::<QueryStat>::new);

    use_future(move || {
        let gateway = gateway.clone();
        async move {
            loop {
                match gateway.top_queries(ANALYTICS_LIMIT).await {
                    Ok(stats) => rows.set(stats),
                    Err(err) => tracing::warn!(error = %err, "analytics poll failed"),
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
    });

    let rows_snapshot = rows();

    rsx! {
        div { class: "main-container",
            h2 { class: "section-title", "Analytics Dashboard" }
            h3 { class: "section-subtitle", "Top Queries" }
            ul { class: "stat-list",
                for row in rows_snapshot.iter() {
                    li { class: "stat-row",
                        span { class: "stat-question", "{row.question}" }
                        span { class: "stat-count", "{row.count}" }
                    }
                }
            }
        }
    }
}
