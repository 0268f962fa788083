// Marktables services
// Stateless building blocks used by the bookmark manager, plus settings persistence.

pub mod bookmark_id;
pub mod filters;
pub mod folder_tree;
pub mod key_sets;
pub mod settings_engine;
