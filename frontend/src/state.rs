//! Client-side copy of the todo list.
//!
//! The server stays authoritative: every mutation here is the reconciliation
//! of a successful response, never a guess ahead of one.

use todo_shared::{Todo, UpdateTodoRequest};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    /// Heading and hint shown when nothing matches.
    pub fn empty_state(self) -> (&'static str, &'static str) {
        match self {
            Filter::All => ("No todos yet", "Add your first todo above to get started!"),
            Filter::Active => ("No active todos", "All caught up! 🎉"),
            Filter::Completed => ("No completed todos", "Complete some todos to see them here!"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub active: usize,
    pub completed: usize,
    pub total: usize,
}

impl Counts {
    pub fn for_filter(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.total,
            Filter::Active => self.active,
            Filter::Completed => self.completed,
        }
    }
}

/// Todos in server order: newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoCache {
    todos: Vec<Todo>,
}

impl TodoCache {
    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
    }

    /// A freshly created todo is the newest, so it goes to the front.
    pub fn prepend(&mut self, todo: Todo) {
        self.todos.insert(0, todo);
    }

    /// Swaps in the server's version of a record. Returns false if the
    /// record is no longer cached.
    pub fn replace(&mut self, todo: Todo) -> bool {
        match self.todos.iter_mut().find(|t| t.id == todo.id) {
            Some(slot) => {
                *slot = todo;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != id);
        self.todos.len() != before
    }

    pub fn get(&self, id: Uuid) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Patch flipping a record's completion. The cache is left alone until
    /// the server answers.
    pub fn toggle_request(&self, id: Uuid) -> Option<UpdateTodoRequest> {
        self.get(id).map(|todo| UpdateTodoRequest {
            completed: Some(!todo.completed),
            ..Default::default()
        })
    }

    pub fn filtered(&self, filter: Filter) -> impl Iterator<Item = &Todo> + '_ {
        self.todos.iter().filter(move |t| filter.matches(t))
    }

    pub fn counts(&self) -> Counts {
        let completed = self.todos.iter().filter(|t| t.completed).count();
        Counts {
            active: self.todos.len() - completed,
            completed,
            total: self.todos.len(),
        }
    }
}
