use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use todo_shared::{CreateTodoRequest, Priority, Todo, UpdateTodoRequest};
use uuid::Uuid;
use web_sys::{console, window};

pub mod api;
pub mod state;

use state::{Filter, TodoCache};

#[derive(Debug, Clone)]
pub enum Msg {
    // Loading
    LoadTodos,
    TodosLoaded(Vec<Todo>),
    LoadFailed(String),
    SetFilter(Filter),

    // Add form
    SetNewTitle(String),
    SetNewDescription(String),
    SetNewPriority(String),
    SubmitNew,
    TodoCreated(Todo),
    CreateFailed(String),

    // Item actions
    ToggleTodo(Uuid),
    EditTodo(Uuid),
    SetEditTitle(String),
    SetEditDescription(String),
    SaveEdit(Uuid),
    CancelEdit,
    TodoUpdated(Todo),
    UpdateFailed(String),
    DeleteTodo(Uuid),
    TodoDeleted(Uuid),
    DeleteFailed(String),
}

#[derive(Debug, Clone, Default)]
struct NewTodoForm {
    title: String,
    description: String,
    priority: Priority,
    submitting: bool,
}

#[derive(Debug, Clone)]
pub struct Model {
    todos: TodoCache,
    loading: bool,
    error: Option<String>,
    filter: Filter,
    form: NewTodoForm,
    editing: Option<Uuid>,
    edit_title: String,
    edit_description: String,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            todos: TodoCache::default(),
            loading: true,
            error: None,
            filter: Filter::All,
            form: NewTodoForm::default(),
            editing: None,
            edit_title: String::new(),
            edit_description: String::new(),
        }
    }
}

fn alert(message: &str) {
    if let Some(window) = window() {
        let _ = window.alert_with_message(message);
    }
}

fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::new(async { Msg::LoadTodos })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::LoadTodos => {
                self.loading = true;
                self.error = None;
                Cmd::new(async {
                    match api::fetch_todos().await {
                        Ok(todos) => Msg::TodosLoaded(todos),
                        Err(e) => Msg::LoadFailed(e.to_string()),
                    }
                })
            }
            Msg::TodosLoaded(todos) => {
                self.todos.replace_all(todos);
                self.error = None;
                self.loading = false;
                Cmd::none()
            }
            Msg::LoadFailed(error) => {
                console::error_1(&format!("Error loading todos: {error}").into());
                self.error = Some("Failed to load todos. Please try again.".to_string());
                self.loading = false;
                Cmd::none()
            }
            Msg::SetFilter(filter) => {
                self.filter = filter;
                Cmd::none()
            }
            Msg::SetNewTitle(new_title) => {
                self.form.title = new_title;
                Cmd::none()
            }
            Msg::SetNewDescription(description) => {
                self.form.description = description;
                Cmd::none()
            }
            Msg::SetNewPriority(priority) => {
                if let Ok(priority) = priority.parse() {
                    self.form.priority = priority;
                }
                Cmd::none()
            }
            Msg::SubmitNew => {
                if self.form.submitting {
                    return Cmd::none();
                }
                let new_title = self.form.title.trim().to_string();
                if new_title.is_empty() {
                    alert("Please enter a title for your todo");
                    return Cmd::none();
                }

                self.form.submitting = true;
                let request = CreateTodoRequest {
                    title: Some(new_title),
                    description: Some(self.form.description.trim().to_string()),
                    priority: Some(self.form.priority.to_string()),
                };
                Cmd::new(async move {
                    match api::create_todo(&request).await {
                        Ok(todo) => Msg::TodoCreated(todo),
                        Err(e) => Msg::CreateFailed(e.to_string()),
                    }
                })
            }
            Msg::TodoCreated(todo) => {
                self.todos.prepend(todo);
                self.form = NewTodoForm::default();
                Cmd::none()
            }
            Msg::CreateFailed(error) => {
                console::error_1(&format!("Error adding todo: {error}").into());
                self.form.submitting = false;
                alert("Failed to add todo. Please try again.");
                Cmd::none()
            }
            Msg::ToggleTodo(id) => match self.todos.toggle_request(id) {
                Some(request) => Cmd::new(async move { update_cmd(id, request).await }),
                None => Cmd::none(),
            },
            Msg::EditTodo(id) => {
                if let Some(todo) = self.todos.get(id) {
                    self.editing = Some(id);
                    self.edit_title = todo.title.clone();
                    self.edit_description = todo.description.clone();
                }
                Cmd::none()
            }
            Msg::SetEditTitle(edited_title) => {
                self.edit_title = edited_title;
                Cmd::none()
            }
            Msg::SetEditDescription(description) => {
                self.edit_description = description;
                Cmd::none()
            }
            Msg::SaveEdit(id) => {
                if self.editing != Some(id) {
                    return Cmd::none();
                }
                let edited_title = self.edit_title.trim().to_string();
                if edited_title.is_empty() {
                    return Cmd::none();
                }

                self.editing = None;
                let request = UpdateTodoRequest {
                    title: Some(edited_title),
                    description: Some(self.edit_description.trim().to_string()),
                    ..Default::default()
                };
                Cmd::new(async move { update_cmd(id, request).await })
            }
            Msg::CancelEdit => {
                self.editing = None;
                self.edit_title.clear();
                self.edit_description.clear();
                Cmd::none()
            }
            Msg::TodoUpdated(todo) => {
                if !self.todos.replace(todo) {
                    console::warn_1(&"updated todo is no longer in the list".into());
                }
                Cmd::none()
            }
            Msg::UpdateFailed(error) => {
                console::error_1(&format!("Error updating todo: {error}").into());
                alert("Failed to update todo. Please try again.");
                Cmd::none()
            }
            Msg::DeleteTodo(id) => {
                if !confirm("Are you sure you want to delete this todo?") {
                    return Cmd::none();
                }
                Cmd::new(async move {
                    match api::delete_todo(id).await {
                        Ok(()) => Msg::TodoDeleted(id),
                        Err(e) => Msg::DeleteFailed(e.to_string()),
                    }
                })
            }
            Msg::TodoDeleted(id) => {
                self.todos.remove(id);
                if self.editing == Some(id) {
                    self.editing = None;
                }
                Cmd::none()
            }
            Msg::DeleteFailed(error) => {
                console::error_1(&format!("Error deleting todo: {error}").into());
                alert("Failed to delete todo. Please try again.");
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        if self.loading {
            return div(
                [class("min-h-screen bg-ctp-base text-ctp-text")],
                [div(
                    [class("text-center py-20 text-ctp-subtext0 italic")],
                    [text("Loading todos...")],
                )],
            );
        }

        div(
            [class("min-h-screen bg-ctp-base text-ctp-text")],
            [
                self.view_header(),
                div(
                    [class("max-w-3xl mx-auto px-6 py-8 space-y-6")],
                    [
                        self.view_create_form(),
                        self.view_stats(),
                        self.view_filters(),
                        self.view_error(),
                        self.view_todo_list(),
                    ],
                ),
            ],
        )
    }
}

async fn update_cmd(id: Uuid, request: UpdateTodoRequest) -> Msg {
    match api::update_todo(id, &request).await {
        Ok(todo) => Msg::TodoUpdated(todo),
        Err(e) => Msg::UpdateFailed(e.to_string()),
    }
}

fn priority_badge_class(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "bg-ctp-red/20 text-ctp-red",
        Priority::Medium => "bg-ctp-peach/20 text-ctp-peach",
        Priority::Low => "bg-ctp-green/20 text-ctp-green",
    }
}

impl Model {
    fn view_header(&self) -> Node<Msg> {
        header([class("bg-ctp-mantle shadow-lg border-b border-ctp-surface0")], [
            div([class("max-w-3xl mx-auto px-6 py-4")], [
                h1([class("text-2xl font-bold text-ctp-text")], [text("Todo App")]),
                p([class("text-ctp-subtext0")], [text("Manage your tasks efficiently")]),
            ]),
        ])
    }

    fn view_create_form(&self) -> Node<Msg> {
        let submitting = self.form.submitting;
        div([class("p-6 bg-ctp-surface0 rounded-lg border border-ctp-surface1")], [
            h2([class("text-xl font-semibold text-ctp-text mb-4 pb-2 border-b border-ctp-surface2")], [text("Add New Todo")]),
            div([class("space-y-4")], [
                input([
                    r#type("text"),
                    placeholder("What needs to be done?"),
                    value(&self.form.title),
                    on_input(|event| Msg::SetNewTitle(event.value())),
                    class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue"),
                ], []),
                textarea([
                    placeholder("Add more details (optional)"),
                    value(&self.form.description),
                    on_input(|event| Msg::SetNewDescription(event.value())),
                    class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue h-20 resize-y"),
                ], []),
                select(
                    [
                        value(self.form.priority.as_str()),
                        on_input(|event| Msg::SetNewPriority(event.value())),
                        class("px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text"),
                    ],
                    Priority::ALL
                        .iter()
                        .map(|priority| {
                            option([value(priority.as_str())], [text(priority.as_str())])
                        })
                        .collect::<Vec<_>>(),
                ),
                button([
                    on_click(|_| Msg::SubmitNew),
                    disabled(submitting),
                    class("bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-6 py-2 rounded-md transition-colors duration-200"),
                ], [text(if submitting { "Adding..." } else { "Add Todo" })]),
            ]),
        ])
    }

    fn view_stats(&self) -> Node<Msg> {
        let counts = self.todos.counts();
        div([class("grid grid-cols-3 gap-4")], [
            stat_card("Active", counts.active),
            stat_card("Completed", counts.completed),
            stat_card("Total", counts.total),
        ])
    }

    fn view_filters(&self) -> Node<Msg> {
        let counts = self.todos.counts();
        div(
            [class("flex gap-2")],
            Filter::ALL
                .iter()
                .map(|&filter| {
                    let active = self.filter == filter;
                    button([
                        on_click(move |_| Msg::SetFilter(filter)),
                        class(if active {
                            "px-4 py-2 rounded-md text-sm font-medium bg-ctp-blue text-ctp-base"
                        } else {
                            "px-4 py-2 rounded-md text-sm font-medium text-ctp-subtext0 hover:bg-ctp-surface0"
                        }),
                    ], [text(&format!("{} ({})", filter.label(), counts.for_filter(filter)))])
                })
                .collect::<Vec<_>>(),
        )
    }

    fn view_error(&self) -> Node<Msg> {
        match &self.error {
            Some(error) => div([class("flex items-center justify-between p-4 rounded-lg bg-ctp-red/20 text-ctp-red")], [
                span([], [text(error)]),
                button([
                    on_click(|_| Msg::LoadTodos),
                    class("px-3 py-1 rounded-md bg-ctp-red text-ctp-base text-sm font-medium"),
                ], [text("Retry")]),
            ]),
            None => span([], []),
        }
    }

    fn view_todo_list(&self) -> Node<Msg> {
        let visible: Vec<&Todo> = self.todos.filtered(self.filter).collect();
        if visible.is_empty() {
            let (heading, hint) = self.filter.empty_state();
            return div([class("text-center py-12")], [
                h3([class("text-lg font-medium text-ctp-text mb-2")], [text(heading)]),
                p([class("text-ctp-subtext0")], [text(hint)]),
            ]);
        }

        div(
            [class("space-y-4")],
            visible.into_iter().map(|todo| self.view_todo(todo)).collect::<Vec<_>>(),
        )
    }

    fn view_todo(&self, todo: &Todo) -> Node<Msg> {
        let todo_id = todo.id;
        let container = class(if todo.completed {
            "border rounded-xl p-6 bg-ctp-surface0 border-ctp-green bg-ctp-green/10"
        } else {
            "border rounded-xl p-6 bg-ctp-surface0 border-ctp-surface1 hover:border-ctp-blue"
        });

        if self.editing == Some(todo_id) {
            return div([key(todo_id.to_string()), container], [
                div([class("space-y-3")], [
                    input([
                        r#type("text"),
                        placeholder("Todo title"),
                        value(&self.edit_title),
                        on_input(|event| Msg::SetEditTitle(event.value())),
                        class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text"),
                    ], []),
                    textarea([
                        placeholder("Description (optional)"),
                        value(&self.edit_description),
                        on_input(|event| Msg::SetEditDescription(event.value())),
                        class("w-full px-3 py-2 bg-ctp-surface1 border border-ctp-surface2 rounded-md text-ctp-text h-20 resize-y"),
                    ], []),
                    div([class("flex gap-2")], [
                        button([
                            on_click(move |_| Msg::SaveEdit(todo_id)),
                            class("bg-ctp-green hover:bg-ctp-teal text-ctp-base font-medium px-4 py-2 rounded-md"),
                        ], [text("Save")]),
                        button([
                            on_click(|_| Msg::CancelEdit),
                            class("bg-ctp-overlay0 hover:bg-ctp-overlay1 text-ctp-text font-medium px-4 py-2 rounded-md"),
                        ], [text("Cancel")]),
                    ]),
                ]),
            ]);
        }

        div([key(todo_id.to_string()), container], [
            div([class("flex items-start gap-4")], [
                input([
                    r#type("checkbox"),
                    checked(todo.completed),
                    id(&format!("checkbox-{todo_id}")),
                    // The box only changes once the server confirms; it is
                    // re-rendered from the model on success.
                    on_click(move |event| {
                        event.prevent_default();
                        Msg::ToggleTodo(todo_id)
                    }),
                    class("mt-1 w-5 h-5"),
                ], []),
                div([class("flex-1 min-w-0")], [
                    h3([class(if todo.completed {
                        "text-lg font-semibold mb-1 line-through text-ctp-overlay1"
                    } else {
                        "text-lg font-semibold mb-1 text-ctp-text"
                    })], [text(&todo.title)]),
                    if todo.description.is_empty() {
                        span([], [])
                    } else {
                        p([class("text-sm text-ctp-subtext1 break-words")], [text(&todo.description)])
                    },
                    div([class("mt-3 flex items-center gap-3 text-xs")], [
                        span([class(&format!(
                            "px-2 py-1 rounded-full font-medium {}",
                            priority_badge_class(todo.priority)
                        ))], [text(todo.priority.as_str())]),
                        span([class("text-ctp-subtext0")], [text(todo.created_at.format("%Y-%m-%d").to_string())]),
                    ]),
                ]),
                div([class("flex flex-col gap-2")], [
                    button([
                        on_click(move |_| Msg::EditTodo(todo_id)),
                        r#type("button"),
                        class("w-8 h-8 rounded-lg bg-ctp-blue/20 text-ctp-blue hover:bg-ctp-blue/30"),
                    ], [text("✏️")]),
                    button([
                        on_click(move |_| Msg::DeleteTodo(todo_id)),
                        r#type("button"),
                        class("w-8 h-8 rounded-lg bg-ctp-red/20 text-ctp-red hover:bg-ctp-red/30"),
                    ], [text("🗑️")]),
                ]),
            ]),
        ])
    }
}

fn stat_card(caption: &str, count: usize) -> Node<Msg> {
    div([class("bg-ctp-surface0 rounded-lg p-4 text-center border border-ctp-surface1")], [
        p([class("text-2xl font-bold text-ctp-text")], [text(count)]),
        p([class("text-sm text-ctp-subtext0")], [text(caption)]),
    ])
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    Program::mount_to_body(Model::default());
}
