use taskdeck_core::render::{EMPTY_BOARD, TaskView};
use taskdeck_shared::TaskId;
use yew::{Callback, Html, Properties, function_component, html};

use super::TaskCardView;

#[derive(Properties, PartialEq)]
pub struct TaskBoardProps {
    /// `None` until the first load lands.
    pub view: Option<TaskView>,
    pub loading: bool,
    pub busy: bool,
    pub on_toggle: Callback<(TaskId, bool)>,
    pub on_edit: Callback<TaskId>,
    pub on_delete: Callback<TaskId>,
}

#[function_component(TaskBoard)]
pub fn task_board(props: &TaskBoardProps) -> Html {
    let loading = html! {
        <div class="loading">
            <i class="fas fa-spinner fa-spin"></i>
            { " Loading tasks..." }
        </div>
    };

    let body = match &props.view {
        None => loading,
        Some(TaskView::Empty) if props.loading => loading,
        Some(TaskView::Empty) => html! {
            <div class="empty-state">
                <i class="fas fa-clipboard-list"></i>
                <h3>{ EMPTY_BOARD }</h3>
                <p>{ "Create your first task to get started!" }</p>
            </div>
        },
        Some(TaskView::Cards(cards)) => html! {
            <>
                {
                    for cards.iter().map(|card| html! {
                        <TaskCardView
                            key={card.id.to_string()}
                            card={card.clone()}
                            busy={props.busy}
                            on_toggle={props.on_toggle.clone()}
                            on_edit={props.on_edit.clone()}
                            on_delete={props.on_delete.clone()}
                        />
                    })
                }
            </>
        },
    };

    html! {
        <div id="tasksGrid" class="tasks-grid">{ body }</div>
    }
}
