//! # To-do Views Crate
//!
//! Pure functions that turn to-do items into HTML fragments for the htmx front end.
//! Nothing here touches the database or the network: every function takes typed
//! data and returns a `String`.
//!
//! Fragments carry their own htmx directives (`hx-post`, `hx-target`, `hx-swap`),
//! so the server decides which element each response replaces.

pub mod escape;
pub mod fragments;

pub use escape::escape_html;
pub use fragments::{
    render_clicked, render_form, render_index, render_item, render_list, render_shell,
};
