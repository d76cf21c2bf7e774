//! Server-rendered HTML for the upload form and the result page.

use crate::extraction::ResumeRecord;

const NOT_FOUND: &str = "Not found";

const STYLE: &str = "body{font-family:sans-serif;max-width:720px;margin:2rem auto;padding:0 1rem}\
    .error{color:#b00020}th{text-align:left;vertical-align:top;padding-right:1rem}\
    pre{white-space:pre-wrap;margin:0}";

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
         <title>{title}</title><style>{STYLE}</style></head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

/// Upload form, with an optional error message above it.
pub fn render_index(error: Option<&str>) -> String {
    let message = error
        .map(|e| format!("<p class=\"error\">{}</p>\n", escape_html(e)))
        .unwrap_or_default();

    page(
        "Resume Parser",
        &format!(
            "<h1>Upload a resume</h1>\n{message}\
             <form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n\
             <input type=\"file\" name=\"file\" accept=\".pdf,.docx\">\n\
             <button type=\"submit\">Extract</button>\n</form>"
        ),
    )
}

fn optional(value: &Option<String>) -> String {
    escape_html(value.as_deref().unwrap_or(NOT_FOUND))
}

pub fn render_result(file_name: &str, record: &ResumeRecord) -> String {
    let skills = if record.skills.is_empty() {
        NOT_FOUND.to_string()
    } else {
        let items: String = record
            .skills
            .iter()
            .map(|s| format!("<li>{}</li>", escape_html(s)))
            .collect();
        format!("<ul>{items}</ul>")
    };

    let education = if record.education.is_empty() {
        NOT_FOUND.to_string()
    } else {
        format!("<pre>{}</pre>", escape_html(&record.education))
    };

    page(
        "Extracted Resume Information",
        &format!(
            "<h1>Extracted Information</h1>\n<p>{file}</p>\n<table>\n\
             <tr><th>Name</th><td>{name}</td></tr>\n\
             <tr><th>Phone</th><td>{phone}</td></tr>\n\
             <tr><th>Email</th><td>{email}</td></tr>\n\
             <tr><th>LinkedIn</th><td>{linkedin}</td></tr>\n\
             <tr><th>Skills</th><td>{skills}</td></tr>\n\
             <tr><th>Education</th><td>{education}</td></tr>\n\
             </table>\n<p><a href=\"/\">Upload another resume</a></p>",
            file = escape_html(file_name),
            name = optional(&record.name),
            phone = optional(&record.phone),
            email = optional(&record.email),
            linkedin = optional(&record.linkedin),
        ),
    )
}
