use taskdeck_core::modal::CloseReason;
use web_sys::MouseEvent;
use yew::{Callback, Html, Properties, function_component, html};

use super::stop_propagation;

#[derive(Properties, PartialEq)]
pub struct ConfirmModalProps {
    pub message: &'static str,
    pub busy: bool,
    pub on_confirm: Callback<()>,
    pub on_close: Callback<CloseReason>,
}

#[function_component(ConfirmModal)]
pub fn confirm_modal(props: &ConfirmModalProps) -> Html {
    let close = |reason: CloseReason| {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(reason))
    };
    let on_confirm = {
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_: MouseEvent| on_confirm.emit(()))
    };

    html! {
        <div id="confirmModal" class="modal" onclick={close(CloseReason::Backdrop)}>
            <div class="modal-content modal-small" onclick={stop_propagation}>
                <div class="modal-header">
                    <h2>{ "Confirm Action" }</h2>
                </div>
                <p id="confirmMessage">{ props.message }</p>
                <div class="modal-actions">
                    <button class="btn btn-secondary" onclick={close(CloseReason::Dismissed)}>
                        { "Cancel" }
                    </button>
                    <button class="btn btn-danger" disabled={props.busy} onclick={on_confirm}>
                        { "Delete" }
                    </button>
                </div>
            </div>
        </div>
    }
}
