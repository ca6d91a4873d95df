use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use chrono::Utc;
use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Interval;
use taskdeck_core::datetime::{DEFAULT_DISPLAY_FORMAT, ViewerZone};
use taskdeck_core::filter::FilterSet;
use taskdeck_core::modal::{CloseReason, FormField, TaskForm};
use taskdeck_core::notify::Notifier;
use taskdeck_core::render::CardRenderer;
use taskdeck_core::session::{KeyPress, Session};
use taskdeck_shared::{Priority, TaskId};
use wasm_bindgen::JsCast;
use web_sys::{KeyboardEvent, MouseEvent};
use yew::{
    Callback, Html, UseForceUpdateHandle, function_component, html, use_effect_with,
    use_force_update, use_mut_ref, use_state,
};

use crate::api::{FetchTaskApi, base_url};
use crate::components::{
    ConfirmModal, FilterBar, StatsPanel, TaskBoard, TaskModal, ToastStack,
};

type WebSession = Session<FetchTaskApi>;

fn new_session() -> WebSession {
    Session::new(
        FetchTaskApi::new(base_url()),
        CardRenderer::new(ViewerZone::Local, DEFAULT_DISPLAY_FORMAT),
        Notifier::default(),
    )
}

/// The live session and the in-flight flag, shared by every callback and
/// listener so none of them reads a stale copy.
#[derive(Clone)]
struct Board {
    session: Rc<RefCell<WebSession>>,
    busy: Rc<RefCell<bool>>,
    redraw: UseForceUpdateHandle,
}

impl Board {
    fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    fn set_busy(&self, busy: bool) {
        *self.busy.borrow_mut() = busy;
        self.redraw.force_update();
    }

    /// Apply a synchronous change to the session and redraw.
    fn update(&self, change: impl FnOnce(&mut WebSession)) {
        {
            let mut session = self.session.borrow_mut();
            change(&mut session);
            session.notifier_mut().prune(Utc::now());
        }
        self.redraw.force_update();
    }

    /// Run an async flow on a copy of the session, then fold its result
    /// into whatever the session has become meanwhile. One flow at a
    /// time; actions arriving while one is out are dropped.
    fn run_flow<F, Fut>(&self, action: &'static str, flow: F)
    where
        F: FnOnce(WebSession) -> Fut + 'static,
        Fut: Future<Output = WebSession> + 'static,
    {
        if self.is_busy() {
            tracing::debug!(action, "busy; dropping action");
            return;
        }

        self.set_busy(true);
        let board = self.clone();
        let before = self.session.borrow().clone();
        wasm_bindgen_futures::spawn_local(async move {
            let after = flow(before.clone()).await;
            board.update(|session| session.absorb(&before, after));
            board.set_busy(false);
        });
    }
}

fn set_field(form: &mut TaskForm, field: FormField, value: String) {
    match field {
        FormField::Title => form.title = value,
        FormField::Description => form.description = value,
        FormField::Category => form.category = value,
        FormField::Priority => match value.parse::<Priority>() {
            Ok(priority) => form.priority = priority,
            Err(err) => tracing::warn!(error = %err, "ignoring priority selection"),
        },
        FormField::DueDate => form.due_date = value,
    }
}

fn key_press(event: &KeyboardEvent) -> KeyPress {
    KeyPress {
        key: event.key(),
        ctrl: event.ctrl_key(),
        meta: event.meta_key(),
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let board = Board {
        session: use_mut_ref(new_session),
        busy: use_mut_ref(|| false),
        redraw: use_force_update(),
    };
    let now = use_state(Utc::now);

    {
        let board = board.clone();
        use_effect_with((), move |_| {
            tracing::debug!("frontend mounted; loading tasks and categories");
            board.run_flow("initial_load", |mut session| async move {
                let _ = session.refresh().await;
                session
            });
            || ()
        });
    }

    {
        let now = now.clone();
        use_effect_with((), move |_| {
            let ticker = Interval::new(1_000, move || now.set(Utc::now()));
            move || drop(ticker)
        });
    }

    let locked = board.session.borrow().scroll_locked();
    use_effect_with(locked, move |locked| {
        let body = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.body());
        if let Some(body) = body {
            let _ = body.class_list().toggle_with_force("modal-open", *locked);
        }
        || ()
    });

    {
        let board = board.clone();
        use_effect_with((), move |_| {
            let listener = web_sys::window()
                .and_then(|window| window.document())
                .map(|document| {
                    EventListener::new_with_options(
                        &document,
                        "keydown",
                        EventListenerOptions::enable_prevent_default(),
                        move |event| {
                            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                                return;
                            };
                            let key = key_press(event);
                            let Some(command) = key.command() else {
                                return;
                            };
                            event.prevent_default();
                            tracing::debug!(?command, "keyboard shortcut");
                            board.run_flow("shortcut", move |mut session| async move {
                                session.handle_key(&key).await;
                                session
                            });
                        },
                    )
                });
            move || drop(listener)
        });
    }

    let is_busy = board.is_busy();

    let on_new_task = {
        let board = board.clone();
        Callback::from(move |_: MouseEvent| board.update(|s| s.open_add()))
    };

    let on_toggle_stats = {
        let board = board.clone();
        Callback::from(move |_: MouseEvent| {
            board.run_flow("toggle_stats", |mut session| async move {
                session.toggle_stats().await;
                session
            });
        })
    };

    let on_filters = {
        let board = board.clone();
        Callback::from(move |filters: FilterSet| board.update(|s| s.set_filters(filters)))
    };

    let on_clear_filters = {
        let board = board.clone();
        Callback::from(move |_: MouseEvent| board.update(|s| s.clear_filters()))
    };

    let on_toggle = {
        let board = board.clone();
        Callback::from(move |(id, completed): (TaskId, bool)| {
            board.run_flow("toggle_complete", move |mut session| async move {
                let _ = session.toggle_complete(id, completed).await;
                session
            });
        })
    };

    let on_edit = {
        let board = board.clone();
        Callback::from(move |id: TaskId| {
            board.update(|s| {
                s.open_edit(id);
            })
        })
    };

    let on_delete = {
        let board = board.clone();
        Callback::from(move |id: TaskId| board.update(|s| s.request_delete(id)))
    };

    let on_form_input = {
        let board = board.clone();
        Callback::from(move |(field, value): (FormField, String)| {
            board.update(|s| {
                if let Some(form) = s.editor_mut().form_mut() {
                    set_field(form, field, value);
                }
            })
        })
    };

    let on_submit = {
        let board = board.clone();
        Callback::from(move |()| {
            board.run_flow("submit_task", |mut session| async move {
                let _ = session.submit_editor().await;
                session
            });
        })
    };

    let on_editor_close = {
        let board = board.clone();
        Callback::from(move |reason: CloseReason| board.update(|s| s.close_editor(reason)))
    };

    let on_confirm_delete = {
        let board = board.clone();
        Callback::from(move |()| {
            board.run_flow("delete_task", |mut session| async move {
                let _ = session.confirm_delete().await;
                session
            });
        })
    };

    let on_confirm_close = {
        let board = board.clone();
        Callback::from(move |reason: CloseReason| board.update(|s| s.cancel_delete(reason)))
    };

    let on_dismiss_toast = {
        let board = board.clone();
        Callback::from(move |id: u64| {
            board.update(|s| {
                s.notifier_mut().dismiss(id);
            })
        })
    };

    let session = board.session.borrow();

    let task_modal = match (session.editor().heading(), session.editor().form()) {
        (Some(heading), Some(form)) => html! {
            <TaskModal
                heading={heading}
                form={form.clone()}
                categories={session.categories().to_vec()}
                busy={is_busy}
                on_input={on_form_input}
                on_submit={on_submit}
                on_close={on_editor_close}
            />
        },
        _ => html! {},
    };

    let confirm_modal = match session.confirm().message() {
        Some(message) => html! {
            <ConfirmModal
                message={message}
                busy={is_busy}
                on_confirm={on_confirm_delete}
                on_close={on_confirm_close}
            />
        },
        None => html! {},
    };

    let toasts: Vec<_> = session.notifier().active(*now).cloned().collect();

    html! {
        <div class="container">
            <header class="header">
                <h1>
                    <i class="fas fa-tasks"></i>
                    { " Task Manager" }
                </h1>
                <div class="header-actions">
                    <button class="btn btn-secondary" onclick={on_toggle_stats}>
                        <i class="fas fa-chart-bar"></i>
                        { " Stats" }
                    </button>
                    <button class="btn btn-primary" onclick={on_new_task}>
                        <i class="fas fa-plus"></i>
                        { " Add Task" }
                    </button>
                </div>
            </header>
            {
                if session.stats_visible() {
                    html! { <StatsPanel stats={session.stats().cloned()} /> }
                } else {
                    html! {}
                }
            }
            <FilterBar
                filters={session.filters().clone()}
                categories={session.categories().to_vec()}
                on_change={on_filters}
                on_clear={on_clear_filters}
            />
            <TaskBoard
                view={session.board(*now)}
                loading={session.is_loading() || (is_busy && !session.store().is_loaded())}
                busy={is_busy}
                on_toggle={on_toggle}
                on_edit={on_edit}
                on_delete={on_delete}
            />
            { task_modal }
            { confirm_modal }
            <ToastStack toasts={toasts} on_dismiss={on_dismiss_toast} />
        </div>
    }
}
