use taskdeck_core::modal::{CloseReason, FormField, TaskForm};
use taskdeck_shared::Priority;
use web_sys::{Event, HtmlInputElement, InputEvent, MouseEvent, SubmitEvent};
use yew::{
    Callback, Html, Properties, TargetCast, function_component, html, use_effect_with, use_node_ref,
};

use super::stop_propagation;

#[derive(Properties, PartialEq)]
pub struct TaskModalProps {
    pub heading: &'static str,
    pub form: TaskForm,
    pub categories: Vec<String>,
    pub busy: bool,
    pub on_input: Callback<(FormField, String)>,
    pub on_submit: Callback<()>,
    pub on_close: Callback<CloseReason>,
}

#[function_component(TaskModal)]
pub fn task_modal(props: &TaskModalProps) -> Html {
    let title_ref = use_node_ref();

    {
        let title_ref = title_ref.clone();
        use_effect_with((), move |_| {
            if let Some(input) = title_ref.cast::<HtmlInputElement>() {
                let _ = input.focus();
            }
            || ()
        });
    }

    let field_input = |field: FormField| {
        let on_input = props.on_input.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            on_input.emit((field, input.value()));
        })
    };

    let on_priority_change = {
        let on_input = props.on_input.clone();
        Callback::from(move |event: Event| {
            let select: web_sys::HtmlSelectElement = event.target_unchecked_into();
            on_input.emit((FormField::Priority, select.value()));
        })
    };

    let on_description_input = {
        let on_input = props.on_input.clone();
        Callback::from(move |event: InputEvent| {
            let area: web_sys::HtmlTextAreaElement = event.target_unchecked_into();
            on_input.emit((FormField::Description, area.value()));
        })
    };

    let onsubmit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            on_submit.emit(());
        })
    };

    let close = |reason: CloseReason| {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(reason))
    };

    let form = &props.form;

    html! {
        <div id="taskModal" class="modal" onclick={close(CloseReason::Backdrop)}>
            <div class="modal-content" onclick={stop_propagation}>
                <div class="modal-header">
                    <h2 id="modalTitle">{ props.heading }</h2>
                    <button class="close" onclick={close(CloseReason::Dismissed)}>{ "×" }</button>
                </div>
                <form id="taskForm" {onsubmit}>
                    <div class="form-group">
                        <label for="taskTitle">{ "Title *" }</label>
                        <input
                            id="taskTitle"
                            type="text"
                            ref={title_ref}
                            value={form.title.clone()}
                            oninput={field_input(FormField::Title)}
                        />
                    </div>
                    <div class="form-group">
                        <label for="taskDescription">{ "Description" }</label>
                        <textarea
                            id="taskDescription"
                            rows="3"
                            value={form.description.clone()}
                            oninput={on_description_input}
                        />
                    </div>
                    <div class="form-row">
                        <div class="form-group">
                            <label for="taskCategory">{ "Category" }</label>
                            <input
                                id="taskCategory"
                                type="text"
                                list="categoryList"
                                placeholder="General"
                                value={form.category.clone()}
                                oninput={field_input(FormField::Category)}
                            />
                            <datalist id="categoryList">
                                {
                                    for props.categories.iter().map(|category| html! {
                                        <option value={category.clone()} />
                                    })
                                }
                            </datalist>
                        </div>
                        <div class="form-group">
                            <label for="taskPriority">{ "Priority" }</label>
                            <select id="taskPriority" onchange={on_priority_change}>
                                {
                                    for Priority::ALL.iter().map(|priority| html! {
                                        <option
                                            value={priority.as_str()}
                                            selected={form.priority == *priority}
                                        >
                                            { priority.as_str() }
                                        </option>
                                    })
                                }
                            </select>
                        </div>
                    </div>
                    <div class="form-group">
                        <label for="taskDueDate">{ "Due Date" }</label>
                        <input
                            id="taskDueDate"
                            type="datetime-local"
                            value={form.due_date.clone()}
                            oninput={field_input(FormField::DueDate)}
                        />
                    </div>
                    <div class="modal-actions">
                        <button type="button" class="btn btn-secondary" onclick={close(CloseReason::Dismissed)}>
                            { "Cancel" }
                        </button>
                        <button type="submit" class="btn btn-primary" disabled={props.busy}>
                            { "Save Task" }
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
