mod confirm_modal;
mod filter_bar;
mod stats_panel;
mod task_board;
mod task_card;
mod task_modal;
mod toast_stack;

pub use confirm_modal::ConfirmModal;
pub use filter_bar::FilterBar;
pub use stats_panel::StatsPanel;
pub use task_board::TaskBoard;
pub use task_card::TaskCardView;
pub use task_modal::TaskModal;
pub use toast_stack::ToastStack;

use yew::{AttrValue, Html};

/// Splice already-escaped text into the DOM.
fn markup(text: &str) -> Html {
    Html::from_html_unchecked(AttrValue::from(text.to_string()))
}

fn stop_propagation(event: web_sys::MouseEvent) {
    event.stop_propagation();
}
