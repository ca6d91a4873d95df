use taskdeck_core::filter::{FilterSet, StatusFilter};
use taskdeck_shared::Priority;
use web_sys::{Event, HtmlSelectElement, MouseEvent};
use yew::{Callback, Html, Properties, TargetCast, function_component, html};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Selector {
    Status,
    Priority,
    Category,
}

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
    pub filters: FilterSet,
    pub categories: Vec<String>,
    pub on_change: Callback<FilterSet>,
    pub on_clear: Callback<MouseEvent>,
}

#[function_component(FilterBar)]
pub fn filter_bar(props: &FilterBarProps) -> Html {
    let status_value = props.filters.status.as_str().to_string();
    let priority_value = props
        .filters
        .priority
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    let category_value = props.filters.category.clone().unwrap_or_default();

    let on_select = |selector: Selector| {
        let on_change = props.on_change.clone();
        let (status, priority, category) = (
            status_value.clone(),
            priority_value.clone(),
            category_value.clone(),
        );
        Callback::from(move |event: Event| {
            let value = event.target_unchecked_into::<HtmlSelectElement>().value();
            let filters = match selector {
                Selector::Status => FilterSet::from_form(&value, &priority, &category),
                Selector::Priority => FilterSet::from_form(&status, &value, &category),
                Selector::Category => FilterSet::from_form(&status, &priority, &value),
            };
            on_change.emit(filters);
        })
    };

    html! {
        <div class="filters">
            <select
                id="statusFilter"
                value={status_value.clone()}
                onchange={on_select(Selector::Status)}
            >
                {
                    for StatusFilter::ALL.iter().map(|status| {
                        let label = match status {
                            StatusFilter::All => "All Tasks",
                            StatusFilter::Completed => "Completed",
                            StatusFilter::Pending => "Pending",
                        };
                        html! {
                            <option value={status.as_str()} selected={status_value == status.as_str()}>
                                { label }
                            </option>
                        }
                    })
                }
            </select>
            <select
                id="priorityFilter"
                value={priority_value.clone()}
                onchange={on_select(Selector::Priority)}
            >
                <option value="" selected={priority_value.is_empty()}>{ "All Priorities" }</option>
                {
                    for Priority::ALL.iter().map(|priority| html! {
                        <option value={priority.as_str()} selected={priority_value == priority.as_str()}>
                            { priority.as_str() }
                        </option>
                    })
                }
            </select>
            <select
                id="categoryFilter"
                value={category_value.clone()}
                onchange={on_select(Selector::Category)}
            >
                <option value="" selected={category_value.is_empty()}>{ "All" }</option>
                {
                    for props.categories.iter().map(|category| html! {
                        <option value={category.clone()} selected={&category_value == category}>
                            { category }
                        </option>
                    })
                }
            </select>
            <button class="btn btn-secondary" onclick={props.on_clear.clone()}>
                <i class="fas fa-times"></i>
                { " Clear Filters" }
            </button>
        </div>
    }
}
