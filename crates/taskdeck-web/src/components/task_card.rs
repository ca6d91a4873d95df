use taskdeck_core::render::TaskCard;
use taskdeck_shared::TaskId;
use yew::{Callback, Html, Properties, classes, function_component, html};

use super::markup;

#[derive(Properties, PartialEq)]
pub struct TaskCardProps {
    pub card: TaskCard,
    pub busy: bool,
    pub on_toggle: Callback<(TaskId, bool)>,
    pub on_edit: Callback<TaskId>,
    pub on_delete: Callback<TaskId>,
}

#[function_component(TaskCardView)]
pub fn task_card_view(props: &TaskCardProps) -> Html {
    let card = &props.card;
    let id = card.id;
    let toggle = card.toggle;

    let on_toggle = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_| on_toggle.emit((id, toggle.set_completed)))
    };
    let on_edit = {
        let on_edit = props.on_edit.clone();
        Callback::from(move |_| on_edit.emit(id))
    };
    let on_delete = {
        let on_delete = props.on_delete.clone();
        Callback::from(move |_| on_delete.emit(id))
    };

    html! {
        <div class={card.card_class()} data-id={id.to_string()}>
            <div class="task-header">
                <h3 class="task-title">{ markup(card.title.markup()) }</h3>
                <span class={card.priority_class()}>{ card.priority.as_str() }</span>
            </div>
            <div class={classes!("task-description", (!card.has_description).then_some("empty"))}>
                { markup(card.description.markup()) }
            </div>
            <div class="task-meta">
                <span class="task-category">
                    <i class="fas fa-tag"></i>
                    { " " }
                    { markup(card.category.markup()) }
                </span>
                <span class={card.due_class()}>
                    <i class="fas fa-calendar"></i>
                    { " " }
                    { &card.due_label }
                </span>
            </div>
            <div class="task-actions">
                <button
                    class={classes!("btn", "btn-sm", toggle.button_class)}
                    disabled={props.busy}
                    onclick={on_toggle}
                >
                    <i class={format!("fas fa-{}", toggle.icon)}></i>
                    { " " }
                    { toggle.label }
                </button>
                <button class="btn btn-sm btn-secondary" disabled={props.busy} onclick={on_edit}>
                    <i class="fas fa-edit"></i>
                    { " Edit" }
                </button>
                <button class="btn btn-sm btn-danger" disabled={props.busy} onclick={on_delete}>
                    <i class="fas fa-trash"></i>
                    { " Delete" }
                </button>
            </div>
        </div>
    }
}
