//! Scoped push/pop resources
//!
//! Host UI state such as a pushed font must be popped on every exit path of a
//! draw call. [`ResourceScope`] pushes on construction and pops on drop.

/// A resource pushed onto and popped off a host stack
pub trait ScopedResource {
    fn push(&self);
    fn pop(&self);
}

/// Keeps a resource pushed for its lifetime
#[must_use = "the resource is popped as soon as the scope is dropped"]
pub struct ResourceScope<'a> {
    resource: Option<&'a dyn ScopedResource>,
}

impl<'a> ResourceScope<'a> {
    /// Push `resource` if there is one. An empty scope does nothing.
    pub fn enter(resource: Option<&'a dyn ScopedResource>) -> Self {
        if let Some(resource) = resource {
            resource.push();
        }
        Self { resource }
    }

    pub fn is_active(&self) -> bool {
        self.resource.is_some()
    }
}

impl Drop for ResourceScope<'_> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            resource.pop();
        }
    }
}
