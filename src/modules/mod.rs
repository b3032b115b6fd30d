pub mod auth;
pub mod bookmarks;
pub mod pages;

use markhub_kernel::ModuleRegistry;

use crate::state::AppState;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, state: &AppState) {
    registry.register(bookmarks::create_module(state.clone()));
    registry.register(auth::create_module(state.clone()));
    registry.register(pages::create_module(state.clone()));
}
