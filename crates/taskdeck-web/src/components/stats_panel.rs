use taskdeck_shared::Stats;
use yew::{Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct StatsPanelProps {
    pub stats: Option<Stats>,
}

#[function_component(StatsPanel)]
pub fn stats_panel(props: &StatsPanelProps) -> Html {
    let Some(stats) = &props.stats else {
        return html! {
            <div id="statsPanel" class="stats-panel">
                <p class="stats-unavailable">{ "Statistics unavailable" }</p>
            </div>
        };
    };

    let stat = |id: &'static str, label: &'static str, value: String| {
        html! {
            <div class="stat-card">
                <span class="stat-label">{ label }</span>
                <span id={id} class="stat-value">{ value }</span>
            </div>
        }
    };

    html! {
        <div id="statsPanel" class="stats-panel">
            <div class="stats-grid">
                { stat("totalTasks", "Total Tasks", stats.total.to_string()) }
                { stat("completedTasks", "Completed", stats.completed.to_string()) }
                { stat("pendingTasks", "Pending", stats.pending.to_string()) }
                { stat("completionRate", "Completion Rate", format!("{}%", stats.completion_rate)) }
            </div>
            {
                if stats.category_stats.is_empty() {
                    html! {}
                } else {
                    html! {
                        <ul class="stats-breakdown">
                            {
                                for stats.category_stats.iter().map(|(category, count)| html! {
                                    <li>{ format!("{category}: {count}") }</li>
                                })
                            }
                        </ul>
                    }
                }
            }
        </div>
    }
}
