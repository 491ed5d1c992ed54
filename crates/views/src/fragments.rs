use crate::escape::escape_html;
use core_types::ToDo;

// --- Document head ---
// Client libraries are loaded from their CDNs; the server never serves assets.
const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">

<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>THE BETH STACK</title>
  <script src="https://unpkg.com/htmx.org@1.9.6" integrity="sha384-FhXw7b6AlE/jyjlZH5iHa/tTe9EpJ1Y55RjcgPbjeWMskSxZt1v9qkxLJWNJaGni" crossorigin="anonymous"></script>
  <script src="https://cdn.tailwindcss.com"></script>
  <script src="https://unpkg.com/hyperscript.org@0.9.11"></script>
</head>
"#;

/// Wraps `children` in the fixed document envelope.
pub fn render_shell(children: &str) -> String {
    format!("{HEAD}\n{children}\n")
}

/// The full page served at `/`. The body loads the list as soon as it is on screen.
pub fn render_index() -> String {
    render_shell(
        r#"<body class="flex w-full h-screen justify-center items-center" hx-get="/todos" hx-trigger="load" hx-swap="innerHTML"></body>"#,
    )
}

/// A single row: content, a checkbox that toggles the item, and a delete button.
///
/// Both controls target the enclosing `div`, so the row replaces itself with
/// whatever the server sends back (the updated row, or nothing after a delete).
pub fn render_item(todo: &ToDo) -> String {
    let checked = if todo.completed { " checked" } else { "" };
    format!(
        concat!(
            r#"<div class="flex flex-row space-x-3">"#,
            "<p>{content}</p>",
            r#"<input type="checkbox"{checked} hx-post="/todos/toggle/{id}" hx-target="closest div" hx-swap="outerHTML">"#,
            r#"<button type="button" class="text-red-500" hx-delete="/todos/{id}" hx-target="closest div" hx-swap="outerHTML">X</button>"#,
            "</div>",
        ),
        content = escape_html(&todo.content),
        checked = checked,
        id = todo.id,
    )
}

/// The creation form. New rows are inserted just before it, and it clears itself on submit.
pub fn render_form() -> String {
    concat!(
        r#"<form class="flex flex-row space-x-3" hx-post="/todos" hx-swap="beforebegin" _="on submit target.reset()">"#,
        r#"<input type="text" name="content" class="border border-black">"#,
        r#"<button type="submit">Add</button>"#,
        "</form>",
    )
    .to_string()
}

/// All rows in the given order, followed by the creation form.
pub fn render_list(todos: &[ToDo]) -> String {
    let mut html = String::from("<div>");
    for todo in todos {
        html.push_str(&render_item(todo));
    }
    html.push_str(&render_form());
    html.push_str("</div>");
    html
}

pub fn render_clicked() -> String {
    r#"<div class="text-blue-600">I'm from the server</div>"#.to_string()
}
