// Tracker Infrastructure - In-Memory Adapter
// Implements: ProjectRepository, TaskRepository

mod store;

pub use store::InMemoryStore;
