use taskdeck_core::notify::Toast;
use yew::{Callback, Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct ToastStackProps {
    pub toasts: Vec<Toast>,
    pub on_dismiss: Callback<u64>,
}

/// Toast text is rendered as plain text, never as markup.
#[function_component(ToastStack)]
pub fn toast_stack(props: &ToastStackProps) -> Html {
    html! {
        <div id="toastContainer" class="toast-container">
            {
                for props.toasts.iter().map(|toast| {
                    let id = toast.id;
                    let on_dismiss = props.on_dismiss.clone();
                    html! {
                        <div key={id.to_string()} class={toast.kind.css_class()}>
                            <div class="toast-content">
                                <i class={format!("fas fa-{}", toast.kind.icon())}></i>
                                <span>{ &toast.message }</span>
                            </div>
                            <button class="toast-close" onclick={move |_| on_dismiss.emit(id)}>
                                <i class="fas fa-times"></i>
                            </button>
                        </div>
                    }
                })
            }
        </div>
    }
}
